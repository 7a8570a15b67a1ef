//! Classic named-axis backend.
//!
//! Mirrors an "input manager" style configuration where the host exposes
//! joystick axes and buttons by name (`"Horizontal"`, `"Fire1"`).
//!
//! Until the host reports its first value or declares a name, the backend has no
//! name table and every name reads neutral. After that only reported or declared
//! names resolve; anything else is unresolved so the module can warn about a typo
//! in the profile. Hosts that report lazily should declare the names a profile
//! uses up front.

use crate::device::{DeviceSource, RawId, SourceKind};
use crate::event::RawEvent;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct LegacyAxes {
    axes: HashMap<String, f32>,
    buttons: HashMap<String, bool>,
    populated: bool,
}

impl LegacyAxes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `name` resolvable before the host reports a value for it.
    pub fn declare_axis(&mut self, name: &str) {
        self.axes.entry(name.to_string()).or_insert(0.0);
        self.populated = true;
    }

    pub fn declare_button(&mut self, name: &str) {
        self.buttons.entry(name.to_string()).or_insert(false);
        self.populated = true;
    }

    pub fn get_axis(&self, name: &str) -> Option<f32> {
        self.axes.get(name).copied()
    }

    pub fn get_button(&self, name: &str) -> Option<bool> {
        self.buttons.get(name).copied()
    }

    fn axis_value(&self, name: &str) -> Option<f32> {
        self.get_axis(name)
            .or_else(|| (!self.populated).then_some(0.0))
    }

    fn button_value(&self, name: &str) -> Option<bool> {
        self.get_button(name)
            .or_else(|| (!self.populated).then_some(false))
    }
}

impl DeviceSource for LegacyAxes {
    fn name(&self) -> &str {
        "legacy axes"
    }

    fn kinds(&self) -> &[SourceKind] {
        &[SourceKind::LegacyAxis]
    }

    fn read_axis(&self, id: &RawId) -> Option<f32> {
        match id {
            RawId::Axis { name } => self.axis_value(name),
            // A named button used on an axis reads as 0/1.
            RawId::Button { name } => self.button_value(name).map(|b| if b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    fn read_button(&self, id: &RawId) -> Option<bool> {
        match id {
            RawId::Button { name } => self.button_value(name),
            RawId::Axis { name } => self.axis_value(name).map(|v| v.abs() > 0.5),
            _ => None,
        }
    }

    fn apply(&mut self, event: &RawEvent) -> bool {
        match event {
            RawEvent::AxisChanged { name, value } => {
                self.axes.insert(name.clone(), *value);
            }
            RawEvent::ButtonChanged { name, pressed } => {
                self.buttons.insert(name.clone(), *pressed);
            }
            _ => return false,
        }
        self.populated = true;
        true
    }
}
