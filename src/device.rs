//! Device sources and raw identifiers.
//!
//! A [`DeviceSource`] is one backend family (keyboard/mouse, legacy named axes,
//! action bindings, VR rig, remapping layer) holding host-fed state. Channels
//! address a value inside a source through a [`RawId`].
//!
//! Sources never fail loudly: a lookup that cannot be resolved returns `None`
//! and the generic read routines in [`crate::binding`] turn that into a neutral
//! value.

use crate::event::RawEvent;
use glam::Quat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend family a channel reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    KeyboardMouse,
    LegacyAxis,
    ActionBinding,
    VrControllerAxis,
    VrControllerButton,
    VrPose,
    RemappedAction,
}

impl SourceKind {
    /// Pose-derived channels are evaluated in the late pass.
    pub fn is_pose(self) -> bool {
        matches!(self, SourceKind::VrPose)
    }
}

/// Relative mouse channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseAxis {
    X,
    Y,
    ScrollWheel,
}

/// Which hand a VR controller is held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandRole {
    Left,
    Right,
}

/// Tracked device whose orientation can drive a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedRole {
    Head,
    LeftHand,
    RightHand,
}

/// Component selector for multi-component action values.
///
/// Scalars only have `X`. Quaternions expose their raw `x/y/z/w`; to read an
/// orientation as an angle, configure a pose mapping on the binding instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    #[default]
    X,
    Y,
    Z,
    W,
}

/// Backend-specific address of a single raw value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawId {
    /// Keyboard key or mouse button, by name (`"A"`, `"LeftShift"`, `"Mouse0"`).
    Key { code: String },
    MouseAxis { axis: MouseAxis },
    /// Named axis in the classic input-manager style.
    Axis { name: String },
    /// Named button in the classic input-manager style.
    Button { name: String },
    Action {
        id: String,
        #[serde(default)]
        component: Component,
    },
    ControllerAxis { role: HandRole, control: String },
    ControllerButton { role: HandRole, control: String },
    Pose { role: TrackedRole },
    Remapped { player: u32, action: String },
}

impl RawId {
    pub fn key(code: impl Into<String>) -> Self {
        RawId::Key { code: code.into() }
    }

    pub fn axis(name: impl Into<String>) -> Self {
        RawId::Axis { name: name.into() }
    }

    pub fn action(id: impl Into<String>, component: Component) -> Self {
        RawId::Action {
            id: id.into(),
            component,
        }
    }

    /// The backend family this identifier can only be resolved by.
    pub fn source_kind(&self) -> SourceKind {
        match self {
            RawId::Key { .. } | RawId::MouseAxis { .. } => SourceKind::KeyboardMouse,
            RawId::Axis { .. } | RawId::Button { .. } => SourceKind::LegacyAxis,
            RawId::Action { .. } => SourceKind::ActionBinding,
            RawId::ControllerAxis { .. } => SourceKind::VrControllerAxis,
            RawId::ControllerButton { .. } => SourceKind::VrControllerButton,
            RawId::Pose { .. } => SourceKind::VrPose,
            RawId::Remapped { .. } => SourceKind::RemappedAction,
        }
    }
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Key { code } => write!(f, "key:{code}"),
            RawId::MouseAxis { axis } => write!(f, "mouse:{axis:?}"),
            RawId::Axis { name } => write!(f, "axis:{name}"),
            RawId::Button { name } => write!(f, "button:{name}"),
            RawId::Action { id, component } => write!(f, "action:{id}.{component:?}"),
            RawId::ControllerAxis { role, control } => write!(f, "vr:{role:?}/{control}"),
            RawId::ControllerButton { role, control } => write!(f, "vr:{role:?}/{control}"),
            RawId::Pose { role } => write!(f, "pose:{role:?}"),
            RawId::Remapped { player, action } => write!(f, "remap:{player}/{action}"),
        }
    }
}

/// A backend family that holds host-fed raw input state.
pub trait DeviceSource {
    /// Human-readable backend name, used in log lines.
    fn name(&self) -> &str;

    /// Source kinds this backend resolves. A VR rig serves several.
    fn kinds(&self) -> &[SourceKind];

    /// Current value of an analog control. `None` if `id` is unknown here.
    fn read_axis(&self, id: &RawId) -> Option<f32>;

    /// Current pressed state of a digital control. `None` if `id` is unknown here.
    fn read_button(&self, id: &RawId) -> Option<bool>;

    /// Current orientation of a tracked control, if `id` names one.
    fn read_pose(&self, _id: &RawId) -> Option<Quat> {
        None
    }

    /// Apply a host event. Returns `false` if the event is not for this backend.
    fn apply(&mut self, event: &RawEvent) -> bool;

    /// Called once at the end of every tick; clears per-tick deltas.
    fn end_frame(&mut self) {}

    /// Whether the backend can currently serve reads.
    fn is_available(&self) -> bool {
        true
    }

    /// Backends that locate hardware at startup are polled through an
    /// [`AvailabilityProbe`](crate::discovery::AvailabilityProbe) before use.
    fn needs_probe(&self) -> bool {
        false
    }

    /// One probe attempt. Defaults to the current availability.
    fn probe(&mut self) -> bool {
        self.is_available()
    }
}
