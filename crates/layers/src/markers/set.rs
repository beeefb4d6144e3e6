use tracing::debug;

use crate::host::{MapHost, MarkerId, MarkerKind, MarkerSpec};

/// One overlay set. Every update removes all of its markers before adding the new ones.
#[derive(Debug, Clone)]
pub struct MarkerGroup {
    kind: MarkerKind,
    markers: Vec<MarkerId>,
}

impl MarkerGroup {
    pub fn new(kind: MarkerKind) -> Self {
        Self {
            kind,
            markers: Vec::new(),
        }
    }

    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    pub fn ids(&self) -> &[MarkerId] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn contains(&self, id: MarkerId) -> bool {
        self.markers.contains(&id)
    }

    pub fn clear(&mut self, host: &mut dyn MapHost) {
        for id in self.markers.drain(..) {
            host.remove_marker(id);
        }
    }

    /// Replaces the whole set. Returns the new ids in input order.
    pub fn rebuild(
        &mut self,
        host: &mut dyn MapHost,
        specs: impl IntoIterator<Item = MarkerSpec>,
    ) -> &[MarkerId] {
        self.clear(host);
        for spec in specs {
            debug_assert_eq!(spec.element.kind, self.kind);
            self.markers.push(host.add_marker(spec));
        }
        debug!(kind = ?self.kind, count = self.markers.len(), "marker set rebuilt");
        &self.markers
    }
}
