//! Tracking the plugin element currently selected in the editor.

use parking_lot::RwLock;

use crate::app::messages::HostEvent;
use crate::domain::model::SelectedElementDescriptor;

/// Holds at most one selected element descriptor for an editor session.
///
/// Only the host event entry points mutate the tracker; everything else reads a snapshot.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    current: RwLock<Option<SelectedElementDescriptor>>,
}

impl SelectionTracker {
    /// Create a tracker with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current selection.
    pub(crate) fn select(&self, descriptor: SelectedElementDescriptor) {
        *self.current.write() = Some(descriptor);
    }

    /// Forget the current selection, whatever it was.
    pub(crate) fn deselect(&self) {
        self.current.write().take();
    }

    /// Apply a decoded host event.
    pub(crate) fn apply(&self, event: HostEvent) {
        match event {
            HostEvent::PluginElementClicked(descriptor) => self.select(descriptor),
            HostEvent::PluginElementDeselected => self.deselect(),
        }
    }

    /// Snapshot of the current selection.
    pub fn current(&self) -> Option<SelectedElementDescriptor> {
        self.current.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str) -> SelectedElementDescriptor {
        SelectedElementDescriptor {
            dom_id: format!("asset-{id}"),
            article_scoped_id: Some(id.into()),
            external_id: None,
            is_digital_asset: false,
        }
    }

    #[test]
    fn starts_empty() {
        let tracker = SelectionTracker::new();
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn select_replaces_previous_descriptor() {
        let tracker = SelectionTracker::new();
        tracker.select(descriptor("1"));
        tracker.select(descriptor("2"));
        assert_eq!(tracker.current(), Some(descriptor("2")));
    }

    #[test]
    fn deselect_clears_regardless_of_state() {
        let tracker = SelectionTracker::new();
        tracker.deselect();
        assert_eq!(tracker.current(), None);

        tracker.select(descriptor("1"));
        tracker.deselect();
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn apply_follows_event_kind() {
        let tracker = SelectionTracker::new();
        tracker.apply(HostEvent::PluginElementClicked(descriptor("3")));
        assert_eq!(tracker.current(), Some(descriptor("3")));
        tracker.apply(HostEvent::PluginElementDeselected);
        assert_eq!(tracker.current(), None);
    }
}
