//! Device location subscription.
//!
//! Position updates arrive asynchronously at an OS-governed cadence,
//! independent of the render loop. Errors never surface to the user.

use foundation::math::LngLat;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("location error {code}: {message}")]
pub struct LocationError {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    Position(LngLat),
    Error(LocationError),
}

/// Platform geolocation service (e.g. a browser's `watchPosition`).
pub trait LocationSource {
    fn watch(&mut self) -> WatchId;
    fn clear_watch(&mut self, id: WatchId);
}

/// Holds the long-lived subscription and the last good fix.
#[derive(Debug, Default)]
pub struct LocationTracker {
    watch: Option<WatchId>,
    current: Option<LngLat>,
}

impl LocationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes once; repeated calls keep the existing watch.
    pub fn start(&mut self, source: &mut dyn LocationSource) {
        if self.watch.is_none() {
            let id = source.watch();
            debug!(watch = id.0, "location watch started");
            self.watch = Some(id);
        }
    }

    pub fn stop(&mut self, source: &mut dyn LocationSource) {
        if let Some(id) = self.watch.take() {
            source.clear_watch(id);
            debug!(watch = id.0, "location watch cleared");
        }
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// Applies one update. Returns `true` when the current location changed.
    pub fn on_event(&mut self, event: LocationEvent) -> bool {
        match event {
            LocationEvent::Position(p) if p.is_valid() => {
                let changed = self.current != Some(p);
                self.current = Some(p);
                changed
            }
            LocationEvent::Position(p) => {
                trace!(?p, "dropping invalid location fix");
                false
            }
            LocationEvent::Error(err) => {
                trace!(%err, "dropping location error");
                false
            }
        }
    }

    pub fn current(&self) -> Option<LngLat> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::{LocationError, LocationEvent, LocationSource, LocationTracker, WatchId};
    use foundation::math::LngLat;

    #[derive(Default)]
    struct FakeSource {
        next: u64,
        active: Vec<WatchId>,
    }

    impl LocationSource for FakeSource {
        fn watch(&mut self) -> WatchId {
            self.next += 1;
            let id = WatchId(self.next);
            self.active.push(id);
            id
        }

        fn clear_watch(&mut self, id: WatchId) {
            self.active.retain(|w| *w != id);
        }
    }

    #[test]
    fn start_is_idempotent_and_stop_unsubscribes() {
        let mut source = FakeSource::default();
        let mut tracker = LocationTracker::new();
        tracker.start(&mut source);
        tracker.start(&mut source);
        assert_eq!(source.active.len(), 1);
        tracker.stop(&mut source);
        assert!(source.active.is_empty());
        assert!(!tracker.is_watching());
    }

    #[test]
    fn errors_are_dropped_and_keep_last_fix() {
        let mut tracker = LocationTracker::new();
        let fix = LngLat::new(127.38, 36.35);
        assert!(tracker.on_event(LocationEvent::Position(fix)));
        assert!(!tracker.on_event(LocationEvent::Error(LocationError {
            code: 1,
            message: "denied".to_string(),
        })));
        assert_eq!(tracker.current(), Some(fix));
    }

    #[test]
    fn error_before_any_fix_leaves_no_location() {
        let mut tracker = LocationTracker::new();
        tracker.on_event(LocationEvent::Error(LocationError {
            code: 3,
            message: "timeout".to_string(),
        }));
        assert_eq!(tracker.current(), None);
    }
}
