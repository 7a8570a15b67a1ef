//! Canonical per-tick control frame.
//!
//! [`InputFrame`] is what consumers see: six continuous channels in `[-1, 1]`,
//! five discrete channels, and an enable flag per channel.
//!
//! # Enable flags
//! A disabled channel is **untouched**, not zero: the consumer keeps whatever it
//! was doing on that channel (e.g. an autopilot drives yaw while the player
//! keeps throttle). The module writes neutral values there, but consumers must
//! check [`InputFrame::is_axis_enabled`] / [`InputFrame::is_button_enabled`]
//! before reading.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Continuous channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisChannel {
    Horizontal,
    Vertical,
    Longitudinal,
    Pitch,
    Yaw,
    Roll,
}

impl AxisChannel {
    pub const ALL: [AxisChannel; 6] = [
        AxisChannel::Horizontal,
        AxisChannel::Vertical,
        AxisChannel::Longitudinal,
        AxisChannel::Pitch,
        AxisChannel::Yaw,
        AxisChannel::Roll,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            AxisChannel::Horizontal => "horizontal",
            AxisChannel::Vertical => "vertical",
            AxisChannel::Longitudinal => "longitudinal",
            AxisChannel::Pitch => "pitch",
            AxisChannel::Yaw => "yaw",
            AxisChannel::Roll => "roll",
        }
    }
}

impl fmt::Display for AxisChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Discrete channels. Which ones matter depends on the consumer
/// (a ship docks, a character jumps and crouches).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonChannel {
    PrimaryFire,
    SecondaryFire,
    Dock,
    Jump,
    Crouch,
}

impl ButtonChannel {
    pub const ALL: [ButtonChannel; 5] = [
        ButtonChannel::PrimaryFire,
        ButtonChannel::SecondaryFire,
        ButtonChannel::Dock,
        ButtonChannel::Jump,
        ButtonChannel::Crouch,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ButtonChannel::PrimaryFire => "primary_fire",
            ButtonChannel::SecondaryFire => "secondary_fire",
            ButtonChannel::Dock => "dock",
            ButtonChannel::Jump => "jump",
            ButtonChannel::Crouch => "crouch",
        }
    }
}

impl fmt::Display for ButtonChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One tick worth of normalized control input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    axes: [f32; 6],
    buttons: [bool; 5],
    axis_enabled: [bool; 6],
    button_enabled: [bool; 5],
}

impl Default for InputFrame {
    fn default() -> Self {
        Self {
            axes: [0.0; 6],
            buttons: [false; 5],
            axis_enabled: [true; 6],
            button_enabled: [true; 5],
        }
    }
}

impl InputFrame {
    #[inline]
    pub fn axis(&self, channel: AxisChannel) -> f32 {
        self.axes[channel.index()]
    }

    #[inline]
    pub fn button(&self, channel: ButtonChannel) -> bool {
        self.buttons[channel.index()]
    }

    #[inline]
    pub fn is_axis_enabled(&self, channel: AxisChannel) -> bool {
        self.axis_enabled[channel.index()]
    }

    #[inline]
    pub fn is_button_enabled(&self, channel: ButtonChannel) -> bool {
        self.button_enabled[channel.index()]
    }

    /// Value of `channel` if enabled, `None` if the consumer should leave it alone.
    pub fn enabled_axis(&self, channel: AxisChannel) -> Option<f32> {
        self.is_axis_enabled(channel).then(|| self.axis(channel))
    }

    pub fn enabled_button(&self, channel: ButtonChannel) -> Option<bool> {
        self.is_button_enabled(channel).then(|| self.button(channel))
    }

    pub fn horizontal(&self) -> f32 {
        self.axis(AxisChannel::Horizontal)
    }

    pub fn vertical(&self) -> f32 {
        self.axis(AxisChannel::Vertical)
    }

    pub fn longitudinal(&self) -> f32 {
        self.axis(AxisChannel::Longitudinal)
    }

    pub fn pitch(&self) -> f32 {
        self.axis(AxisChannel::Pitch)
    }

    pub fn yaw(&self) -> f32 {
        self.axis(AxisChannel::Yaw)
    }

    pub fn roll(&self) -> f32 {
        self.axis(AxisChannel::Roll)
    }

    pub fn primary_fire(&self) -> bool {
        self.button(ButtonChannel::PrimaryFire)
    }

    pub fn secondary_fire(&self) -> bool {
        self.button(ButtonChannel::SecondaryFire)
    }

    pub fn dock(&self) -> bool {
        self.button(ButtonChannel::Dock)
    }

    pub fn jump(&self) -> bool {
        self.button(ButtonChannel::Jump)
    }

    pub fn crouch(&self) -> bool {
        self.button(ButtonChannel::Crouch)
    }

    /// Write a continuous channel, clamped to `[-1, 1]`. Non-finite values write `0`.
    pub(crate) fn set_axis(&mut self, channel: AxisChannel, value: f32) {
        self.axes[channel.index()] = if value.is_finite() {
            value.clamp(-1.0, 1.0)
        } else {
            0.0
        };
    }

    pub(crate) fn set_button(&mut self, channel: ButtonChannel, pressed: bool) {
        self.buttons[channel.index()] = pressed;
    }

    pub(crate) fn set_axis_enabled(&mut self, channel: AxisChannel, enabled: bool) {
        self.axis_enabled[channel.index()] = enabled;
    }

    pub(crate) fn set_button_enabled(&mut self, channel: ButtonChannel, enabled: bool) {
        self.button_enabled[channel.index()] = enabled;
    }

    /// Zero every continuous channel and release every button. Enable flags are kept.
    pub fn reset(&mut self) {
        self.axes = [0.0; 6];
        self.buttons = [false; 5];
    }

    /// `true` if every channel reads neutral.
    pub fn is_neutral(&self) -> bool {
        self.axes.iter().all(|v| *v == 0.0) && self.buttons.iter().all(|b| !*b)
    }
}
