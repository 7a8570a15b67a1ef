//! Registry of active backends.
//!
//! [`SourceManager`] owns one [`DeviceSource`] per backend family, routes host
//! events to the backend that consumes them, and resolves the source for a
//! [`SourceKind`]. Backend selection is a runtime lookup done once per channel
//! when the input module initializes.

use crate::backends::default_sources;
use crate::device::{DeviceSource, SourceKind};
use crate::event::RawEvent;

#[derive(Default)]
pub struct SourceManager {
    sources: Vec<Box<dyn DeviceSource>>,
}

impl SourceManager {
    /// Empty registry; add backends with [`add_source`](Self::add_source).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding one of every built-in backend.
    pub fn with_defaults() -> Self {
        let mut manager = Self::new();
        for source in default_sources() {
            manager.add_boxed(source);
        }
        log::info!("Registered {} input backend(s)", manager.sources.len());
        manager
    }

    pub fn add_source<S: DeviceSource + 'static>(&mut self, source: S) {
        self.add_boxed(Box::new(source));
    }

    /// Register a backend. Backends already serving any of its kinds are replaced.
    pub fn add_boxed(&mut self, source: Box<dyn DeviceSource>) {
        let kinds = source.kinds().to_vec();
        self.sources.retain(|existing| {
            let overlaps = existing.kinds().iter().any(|k| kinds.contains(k));
            if overlaps {
                log::debug!(
                    "Backend '{}' replaced by '{}'",
                    existing.name(),
                    source.name()
                );
            }
            !overlaps
        });
        self.sources.push(source);
    }

    /// Index of the backend serving `kind`. Stable until the next `add_*` call.
    pub fn index_of(&self, kind: SourceKind) -> Option<usize> {
        self.sources.iter().position(|s| s.kinds().contains(&kind))
    }

    pub fn source(&self, kind: SourceKind) -> Option<&dyn DeviceSource> {
        self.index_of(kind).map(|i| self.sources[i].as_ref())
    }

    pub fn source_mut(&mut self, kind: SourceKind) -> Option<&mut (dyn DeviceSource + 'static)> {
        let index = self.index_of(kind)?;
        Some(self.sources[index].as_mut())
    }

    pub(crate) fn get(&self, index: usize) -> Option<&dyn DeviceSource> {
        self.sources.get(index).map(|s| s.as_ref())
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut (dyn DeviceSource + 'static)> {
        self.sources.get_mut(index).map(|s| s.as_mut())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Route one host event. Returns `false` if no backend consumed it.
    pub fn dispatch(&mut self, event: &RawEvent) -> bool {
        match self.source_mut(event.source_kind()) {
            Some(source) => source.apply(event),
            None => false,
        }
    }

    pub fn dispatch_all(&mut self, events: &[RawEvent]) {
        for event in events {
            self.dispatch(event);
        }
    }

    /// Clear per-tick deltas on every backend.
    pub fn end_frame(&mut self) {
        for source in self.sources.iter_mut() {
            source.end_frame();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{KeyboardMouse, VrRig};
    use crate::device::{HandRole, RawId};

    #[test]
    fn defaults_cover_every_kind() {
        let manager = SourceManager::with_defaults();
        for kind in [
            SourceKind::KeyboardMouse,
            SourceKind::LegacyAxis,
            SourceKind::ActionBinding,
            SourceKind::VrControllerAxis,
            SourceKind::VrControllerButton,
            SourceKind::VrPose,
            SourceKind::RemappedAction,
        ] {
            assert!(manager.source(kind).is_some(), "{kind:?}");
        }
        assert_eq!(manager.len(), 5);
    }

    #[test]
    fn dispatch_routes_by_kind() {
        let mut manager = SourceManager::new();
        manager.add_source(KeyboardMouse::new());
        assert!(manager.dispatch(&RawEvent::KeyDown { code: "E".into() }));
        assert!(!manager.dispatch(&RawEvent::AxisChanged {
            name: "Horizontal".into(),
            value: 1.0
        }));

        let kb = manager.source(SourceKind::KeyboardMouse).expect("keyboard");
        assert_eq!(kb.read_button(&RawId::key("E")), Some(true));
    }

    #[test]
    fn vr_events_reach_one_rig() {
        let mut manager = SourceManager::new();
        manager.add_source(VrRig::new());
        manager.dispatch_all(&[
            RawEvent::ControllerConnected {
                role: HandRole::Left,
                connected: true,
            },
            RawEvent::ControllerButton {
                role: HandRole::Left,
                control: "trigger".into(),
                pressed: true,
            },
        ]);
        let rig = manager.source(SourceKind::VrControllerButton).expect("rig");
        let id = RawId::ControllerButton {
            role: HandRole::Left,
            control: "trigger".into(),
        };
        assert_eq!(rig.read_button(&id), Some(true));
    }

    #[test]
    fn adding_a_backend_replaces_overlapping_one() {
        let mut manager = SourceManager::with_defaults();
        manager.add_source(KeyboardMouse::new());
        assert_eq!(manager.len(), 5);
    }
}
