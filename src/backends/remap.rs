//! Third-party remapping layer.
//!
//! Some hosts route devices through a remapping plugin that exposes per-player
//! named actions. The plugin initializes on its own schedule, so this backend
//! reports unavailable until the host sends `RemapperReady { ready: true }`.

use crate::device::{DeviceSource, RawId, SourceKind};
use crate::event::RawEvent;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Remapper {
    ready: bool,
    values: HashMap<(u32, String), f32>,
}

impl Remapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn value(&self, player: u32, action: &str) -> Option<f32> {
        self.values.get(&(player, action.to_string())).copied()
    }
}

impl DeviceSource for Remapper {
    fn name(&self) -> &str {
        "remapper"
    }

    fn kinds(&self) -> &[SourceKind] {
        &[SourceKind::RemappedAction]
    }

    fn read_axis(&self, id: &RawId) -> Option<f32> {
        let RawId::Remapped { player, action } = id else {
            return None;
        };
        if !self.ready {
            return Some(0.0);
        }
        self.value(*player, action)
    }

    fn read_button(&self, id: &RawId) -> Option<bool> {
        self.read_axis(id).map(|v| v.abs() > 0.5)
    }

    fn apply(&mut self, event: &RawEvent) -> bool {
        match event {
            RawEvent::RemapperReady { ready } => {
                self.ready = *ready;
                if !ready {
                    self.values.clear();
                }
            }
            RawEvent::RemappedChanged {
                player,
                action,
                value,
            } => {
                self.values.insert((*player, action.clone()), *value);
            }
            _ => return false,
        }
        true
    }

    fn is_available(&self) -> bool {
        self.ready
    }

    fn needs_probe(&self) -> bool {
        true
    }
}
