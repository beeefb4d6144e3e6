//! Text shown on overlay badges.

use crate::route::RouteSegmentMeta;

const SEPARATOR: &str = " · ";

/// Badge text for one route segment, most specific data first.
///
/// Walk/drive minutes win over a generic mode + duration pair. Segments with
/// neither produce no badge.
pub fn duration_label(meta: &RouteSegmentMeta) -> Option<String> {
    let walk = meta.walk_minutes.and_then(minutes);
    let drive = meta.drive_minutes.and_then(minutes);
    if walk.is_some() || drive.is_some() {
        let parts: Vec<String> = [("walk", walk), ("drive", drive)]
            .into_iter()
            .filter_map(|(mode, m)| m.map(|m| format!("{mode} {m}m")))
            .collect();
        return Some(parts.join(SEPARATOR));
    }

    let mode = meta.transport_mode.as_deref().map(str::trim).filter(|m| !m.is_empty())?;
    let duration = meta.duration_minutes.and_then(minutes)?;
    Some(format!("{mode} {duration}m"))
}

/// 1-based ordinal shown on a pin's label badge.
pub fn pin_label(index: usize) -> String {
    (index + 1).to_string()
}

fn minutes(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.round() as u64)
}
