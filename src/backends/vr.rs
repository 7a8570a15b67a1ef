//! VR rig backend: headset plus left/right hand controllers.
//!
//! One backend serves three source kinds: controller axes, controller buttons
//! and tracked poses. The rig is only usable once the host reports a connected
//! headset, which can take several frames after startup, so the module polls it
//! through an availability probe instead of assuming it is there.
//!
//! Disconnected controllers keep their control names resolvable but read
//! neutral, so a controller dropping out mid-session degrades to "no input".

use crate::device::{DeviceSource, HandRole, RawId, SourceKind, TrackedRole};
use crate::event::RawEvent;
use glam::Quat;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Controller {
    connected: bool,
    axes: HashMap<String, f32>,
    buttons: HashMap<String, bool>,
    pose: Quat,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            connected: false,
            axes: HashMap::new(),
            buttons: HashMap::new(),
            pose: Quat::IDENTITY,
        }
    }
}

#[derive(Debug, Default)]
pub struct VrRig {
    headset_connected: bool,
    head: Quat,
    left: Controller,
    right: Controller,
    probes: u32,
}

impl VrRig {
    pub fn new() -> Self {
        Self {
            head: Quat::IDENTITY,
            ..Self::default()
        }
    }

    fn controller(&self, role: HandRole) -> &Controller {
        match role {
            HandRole::Left => &self.left,
            HandRole::Right => &self.right,
        }
    }

    fn controller_mut(&mut self, role: HandRole) -> &mut Controller {
        match role {
            HandRole::Left => &mut self.left,
            HandRole::Right => &mut self.right,
        }
    }

    pub fn is_controller_connected(&self, role: HandRole) -> bool {
        self.controller(role).connected
    }

    /// Number of probe attempts made so far.
    pub fn probe_count(&self) -> u32 {
        self.probes
    }

    pub fn pose(&self, role: TrackedRole) -> Option<Quat> {
        match role {
            TrackedRole::Head if self.headset_connected => Some(self.head),
            TrackedRole::Head => None,
            TrackedRole::LeftHand => self.left.connected.then_some(self.left.pose),
            TrackedRole::RightHand => self.right.connected.then_some(self.right.pose),
        }
    }
}

impl DeviceSource for VrRig {
    fn name(&self) -> &str {
        "vr rig"
    }

    fn kinds(&self) -> &[SourceKind] {
        &[
            SourceKind::VrControllerAxis,
            SourceKind::VrControllerButton,
            SourceKind::VrPose,
        ]
    }

    fn read_axis(&self, id: &RawId) -> Option<f32> {
        match id {
            RawId::ControllerAxis { role, control } => {
                let c = self.controller(*role);
                let value = c.axes.get(control).copied()?;
                Some(if c.connected { value } else { 0.0 })
            }
            RawId::ControllerButton { role, control } => {
                let c = self.controller(*role);
                let pressed = c.buttons.get(control).copied()?;
                Some(if c.connected && pressed { 1.0 } else { 0.0 })
            }
            // Pose channels without a mapping have nothing scalar to offer.
            RawId::Pose { .. } => Some(0.0),
            _ => None,
        }
    }

    fn read_button(&self, id: &RawId) -> Option<bool> {
        match id {
            RawId::ControllerButton { role, control } => {
                let c = self.controller(*role);
                let pressed = c.buttons.get(control).copied()?;
                Some(c.connected && pressed)
            }
            RawId::ControllerAxis { .. } => self.read_axis(id).map(|v| v.abs() > 0.5),
            _ => None,
        }
    }

    fn read_pose(&self, id: &RawId) -> Option<Quat> {
        match id {
            // A missing device reads as a level pose.
            RawId::Pose { role } => Some(self.pose(*role).unwrap_or(Quat::IDENTITY)),
            _ => None,
        }
    }

    fn apply(&mut self, event: &RawEvent) -> bool {
        match event {
            RawEvent::HeadsetConnected { connected } => {
                self.headset_connected = *connected;
                if !connected {
                    self.head = Quat::IDENTITY;
                }
            }
            RawEvent::ControllerConnected { role, connected } => {
                self.controller_mut(*role).connected = *connected;
            }
            RawEvent::ControllerAxis {
                role,
                control,
                value,
            } => {
                self.controller_mut(*role)
                    .axes
                    .insert(control.clone(), *value);
            }
            RawEvent::ControllerButton {
                role,
                control,
                pressed,
            } => {
                self.controller_mut(*role)
                    .buttons
                    .insert(control.clone(), *pressed);
            }
            RawEvent::PoseChanged { role, rotation } => match role {
                TrackedRole::Head => self.head = *rotation,
                TrackedRole::LeftHand => self.left.pose = *rotation,
                TrackedRole::RightHand => self.right.pose = *rotation,
            },
            _ => return false,
        }
        true
    }

    fn is_available(&self) -> bool {
        self.headset_connected
    }

    fn needs_probe(&self) -> bool {
        true
    }

    fn probe(&mut self) -> bool {
        self.probes += 1;
        self.headset_connected
    }
}
