//! Action-binding backend.
//!
//! Actions are named controls whose value type depends on how the host bound
//! them: a trigger is a scalar, a stick a 2-vector, a tracked position a
//! 3-vector, a tracked rotation a quaternion. Channels pick one component with
//! [`Component`]; a quaternion can also be read as an angle through a pose
//! mapping on the binding.

use crate::device::{Component, DeviceSource, RawId, SourceKind};
use crate::event::RawEvent;
use glam::{Quat, Vec2, Vec3};
use std::collections::HashMap;

/// Scalars at or above this read as pressed.
pub const PRESS_POINT: f32 = 0.5;

/// Current value of one action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActionValue {
    Scalar(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Quat(Quat),
}

impl ActionValue {
    /// Component of the value. Components the value does not have read `0`.
    pub fn component(&self, component: Component) -> f32 {
        match (self, component) {
            (ActionValue::Scalar(v), Component::X) => *v,
            (ActionValue::Vec2(v), Component::X) => v.x,
            (ActionValue::Vec2(v), Component::Y) => v.y,
            (ActionValue::Vec3(v), Component::X) => v.x,
            (ActionValue::Vec3(v), Component::Y) => v.y,
            (ActionValue::Vec3(v), Component::Z) => v.z,
            (ActionValue::Quat(q), Component::X) => q.x,
            (ActionValue::Quat(q), Component::Y) => q.y,
            (ActionValue::Quat(q), Component::Z) => q.z,
            (ActionValue::Quat(q), Component::W) => q.w,
            _ => 0.0,
        }
    }

    fn neutral_like(&self) -> Self {
        match self {
            ActionValue::Scalar(_) => ActionValue::Scalar(0.0),
            ActionValue::Vec2(_) => ActionValue::Vec2(Vec2::ZERO),
            ActionValue::Vec3(_) => ActionValue::Vec3(Vec3::ZERO),
            ActionValue::Quat(_) => ActionValue::Quat(Quat::IDENTITY),
        }
    }
}

#[derive(Debug)]
pub struct ActionMap {
    actions: HashMap<String, ActionValue>,
    enabled: bool,
}

impl Default for ActionMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionMap {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            enabled: true,
        }
    }

    /// Register an action with its neutral value so it resolves before first use.
    pub fn declare(&mut self, id: &str, neutral: ActionValue) {
        self.actions.insert(id.to_string(), neutral.neutral_like());
    }

    pub fn set(&mut self, id: &str, value: ActionValue) {
        self.actions.insert(id.to_string(), value);
    }

    pub fn get(&self, id: &str) -> Option<&ActionValue> {
        self.actions.get(id)
    }

    /// A disabled action map resolves every id but reads neutral.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl DeviceSource for ActionMap {
    fn name(&self) -> &str {
        "action map"
    }

    fn kinds(&self) -> &[SourceKind] {
        &[SourceKind::ActionBinding]
    }

    fn read_axis(&self, id: &RawId) -> Option<f32> {
        let RawId::Action { id, component } = id else {
            return None;
        };
        let value = self.get(id)?;
        Some(if self.enabled {
            value.component(*component)
        } else {
            0.0
        })
    }

    fn read_button(&self, id: &RawId) -> Option<bool> {
        let value = self.read_axis(id)?;
        Some(value.abs() >= PRESS_POINT)
    }

    fn read_pose(&self, id: &RawId) -> Option<Quat> {
        let RawId::Action { id, .. } = id else {
            return None;
        };
        match self.get(id)? {
            ActionValue::Quat(q) if self.enabled => Some(*q),
            ActionValue::Quat(_) => Some(Quat::IDENTITY),
            _ => None,
        }
    }

    fn apply(&mut self, event: &RawEvent) -> bool {
        match event {
            RawEvent::ActionChanged { id, value } => {
                self.set(id, *value);
                true
            }
            _ => false,
        }
    }
}
