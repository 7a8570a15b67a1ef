//! Host-side raw input events.
//!
//! The host (game loop, XR runtime, remapping plugin) pushes raw changes into the
//! backends through [`RawEvent`]s, routed by
//! [`SourceManager::dispatch`](crate::manager::SourceManager::dispatch).
//!
//! ## Value conventions
//! - **Analog axes** (legacy, controller, remapped) are expected in `[-1.0, 1.0]`;
//!   out-of-range values are clamped when read into a channel.
//! - **Mouse deltas** are accumulated per tick and cleared at the end of the tick.
//! - **Buttons** are level states; edge detection happens in the input module.

use crate::backends::action::ActionValue;
use crate::device::{HandRole, SourceKind, TrackedRole};
use glam::Quat;

#[derive(Clone, Debug, PartialEq)]
pub enum RawEvent {
    KeyDown { code: String },
    KeyUp { code: String },
    /// Relative mouse motion for this tick, already scaled by the host.
    MouseMoved { dx: f32, dy: f32 },
    MouseScrolled { delta: f32 },

    AxisChanged { name: String, value: f32 },
    ButtonChanged { name: String, pressed: bool },

    ActionChanged { id: String, value: ActionValue },

    HeadsetConnected { connected: bool },
    ControllerConnected { role: HandRole, connected: bool },
    ControllerAxis { role: HandRole, control: String, value: f32 },
    ControllerButton { role: HandRole, control: String, pressed: bool },
    PoseChanged { role: TrackedRole, rotation: Quat },

    /// The remapping layer finished (or lost) its own initialization.
    RemapperReady { ready: bool },
    RemappedChanged { player: u32, action: String, value: f32 },
}

impl RawEvent {
    /// Backend family that consumes this event.
    pub fn source_kind(&self) -> SourceKind {
        match self {
            RawEvent::KeyDown { .. }
            | RawEvent::KeyUp { .. }
            | RawEvent::MouseMoved { .. }
            | RawEvent::MouseScrolled { .. } => SourceKind::KeyboardMouse,
            RawEvent::AxisChanged { .. } | RawEvent::ButtonChanged { .. } => {
                SourceKind::LegacyAxis
            }
            RawEvent::ActionChanged { .. } => SourceKind::ActionBinding,
            RawEvent::ControllerAxis { .. } => SourceKind::VrControllerAxis,
            RawEvent::ControllerButton { .. } => SourceKind::VrControllerButton,
            RawEvent::HeadsetConnected { .. }
            | RawEvent::ControllerConnected { .. }
            | RawEvent::PoseChanged { .. } => SourceKind::VrPose,
            RawEvent::RemapperReady { .. } | RawEvent::RemappedChanged { .. } => {
                SourceKind::RemappedAction
            }
        }
    }
}
