//! Custom player inputs.
//!
//! Free-form named controls that sit outside the vehicle/character schema
//! ("toggle headlights", "zoom"). They are evaluated every tick the module is
//! enabled *or* disabled-custom-only, and their results go to the
//! [`CustomInputBus`](crate::eventbus::CustomInputBus) instead of the frame.
//!
//! Emission rules:
//! - buttons emit `Button(true)` whenever they fire (every held tick, or once per
//!   press when edge-triggered);
//! - axes emit while non-zero, plus one `Axis(0.0)` when they return to rest.

use crate::binding::{AxisBinding, ButtonBinding};
use crate::device::{DeviceSource, SourceKind};
use crate::error::Result;
use crate::smoother::AxisState;
use crate::trigger::ButtonLatch;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomControl {
    Button(ButtonBinding),
    Axis(AxisBinding),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomBinding {
    pub name: String,
    pub control: CustomControl,
}

impl CustomBinding {
    pub fn button(name: impl Into<String>, binding: ButtonBinding) -> Self {
        Self {
            name: name.into(),
            control: CustomControl::Button(binding),
        }
    }

    pub fn axis(name: impl Into<String>, binding: AxisBinding) -> Self {
        Self {
            name: name.into(),
            control: CustomControl::Axis(binding),
        }
    }

    pub fn source(&self) -> SourceKind {
        match &self.control {
            CustomControl::Button(b) => b.source,
            CustomControl::Axis(a) => a.source,
        }
    }

    pub fn is_configured(&self) -> bool {
        match &self.control {
            CustomControl::Button(b) => b.is_configured(),
            CustomControl::Axis(a) => a.is_configured(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let channel = format!("custom:{}", self.name);
        match &self.control {
            CustomControl::Button(b) => b.validate(&channel),
            CustomControl::Axis(a) => a.validate(&channel),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CustomValue {
    Button(bool),
    Axis(f32),
}

/// One custom input result, delivered to the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomInputEvent {
    pub name: String,
    pub value: CustomValue,
}

impl CustomInputEvent {
    pub fn is_axis(&self) -> bool {
        matches!(self.value, CustomValue::Axis(_))
    }

    pub fn is_button(&self) -> bool {
        matches!(self.value, CustomValue::Button(_))
    }
}

/// Runtime state of one custom binding.
#[derive(Debug, Clone)]
pub(crate) struct CustomChannel {
    pub binding: CustomBinding,
    latch: ButtonLatch,
    axis: AxisState,
    last_emitted: f32,
}

/// Result of evaluating a custom channel for one tick.
pub(crate) struct CustomRead {
    pub event: Option<CustomInputEvent>,
    pub resolved: bool,
}

impl CustomChannel {
    pub fn new(binding: CustomBinding) -> Self {
        Self {
            binding,
            latch: ButtonLatch::default(),
            axis: AxisState::default(),
            last_emitted: 0.0,
        }
    }

    /// Zero the axis memory and seed the button latch from `source`, so a
    /// button held across the reset does not fire again.
    pub fn reset(&mut self, source: Option<&dyn DeviceSource>) {
        let held = match &self.binding.control {
            CustomControl::Button(binding) => source.is_some_and(|s| binding.read(s)),
            CustomControl::Axis(_) => false,
        };
        self.latch.seed(held);
        self.axis.reset();
        self.last_emitted = 0.0;
    }

    /// `source` is `None` when the backend is missing or not ready; the channel then
    /// reads neutral.
    pub fn evaluate(&mut self, source: Option<&dyn DeviceSource>, dt: f32) -> CustomRead {
        let name = &self.binding.name;
        match &self.binding.control {
            CustomControl::Button(binding) => {
                let raw = source.map(|s| binding.try_read(s)).unwrap_or(Some(false));
                let fired = self
                    .latch
                    .update(raw.unwrap_or(false), binding.can_be_held);
                CustomRead {
                    event: fired.then(|| CustomInputEvent {
                        name: name.clone(),
                        value: CustomValue::Button(true),
                    }),
                    resolved: raw.is_some(),
                }
            }
            CustomControl::Axis(binding) => {
                let raw = source.map(|s| binding.try_read(s)).unwrap_or(Some(0.0));
                let target = raw.unwrap_or(0.0);
                let value = if binding.smooths() {
                    self.axis
                        .advance(target, binding.sensitivity, binding.gravity, dt)
                } else {
                    self.axis.set(target)
                };
                let emit = value != 0.0 || self.last_emitted != 0.0;
                self.last_emitted = value;
                CustomRead {
                    event: emit.then(|| CustomInputEvent {
                        name: name.clone(),
                        value: CustomValue::Axis(value),
                    }),
                    resolved: raw.is_some(),
                }
            }
        }
    }
}
