//! Channel bindings and binding profiles.
//!
//! A [`BindingProfile`] says, per frame channel, which backend to read, which raw
//! identifiers to combine and how to shape the result. Profiles are plain serde
//! data and load from TOML or JSON.
//!
//! ```toml
//! name = "ship-keyboard"
//!
//! [axes.horizontal]
//! source = "keyboard_mouse"
//! mode = "combined_axis"
//! positive = { kind = "key", code = "D" }
//! negative = { kind = "key", code = "A" }
//! sensitivity_enabled = true
//!
//! [buttons.dock]
//! source = "keyboard_mouse"
//! id = { kind = "key", code = "G" }
//! can_be_held = false
//! ```

use crate::custom::CustomBinding;
use crate::device::{DeviceSource, RawId, SourceKind};
use crate::error::{InputError, Result};
use crate::frame::{AxisChannel, ButtonChannel};
use crate::pose::{quat_to_axis, PoseMapping};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a continuous channel combines its raw identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisMode {
    /// Channel always reads `0`.
    NoInput,
    /// `positive` alone.
    #[default]
    SingleAxis,
    /// `positive - negative`.
    CombinedAxis,
}

fn default_rate() -> f32 {
    3.0
}

fn default_true() -> bool {
    true
}

/// Binding of one continuous channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisBinding {
    pub source: SourceKind,
    #[serde(default)]
    pub mode: AxisMode,
    #[serde(default)]
    pub positive: Option<RawId>,
    #[serde(default)]
    pub negative: Option<RawId>,
    #[serde(default)]
    pub invert: bool,
    /// Magnitudes below this read as `0`.
    #[serde(default)]
    pub deadzone: f32,
    /// Ramp raw values through the axis smoother.
    #[serde(default)]
    pub sensitivity_enabled: bool,
    /// Units per second toward a non-zero target.
    #[serde(default = "default_rate")]
    pub sensitivity: f32,
    /// Units per second back toward zero.
    #[serde(default = "default_rate")]
    pub gravity: f32,
    /// Consumer ignores this channel (the frame flags it disabled).
    #[serde(default)]
    pub discard: bool,
    /// Reduce an orientation to this channel's value.
    #[serde(default)]
    pub pose: Option<PoseMapping>,
}

impl AxisBinding {
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            mode: AxisMode::SingleAxis,
            positive: None,
            negative: None,
            invert: false,
            deadzone: 0.0,
            sensitivity_enabled: false,
            sensitivity: default_rate(),
            gravity: default_rate(),
            discard: false,
            pose: None,
        }
    }

    pub fn single(source: SourceKind, id: RawId) -> Self {
        Self {
            positive: Some(id),
            ..Self::new(source)
        }
    }

    pub fn combined(source: SourceKind, positive: RawId, negative: RawId) -> Self {
        Self {
            mode: AxisMode::CombinedAxis,
            positive: Some(positive),
            negative: Some(negative),
            ..Self::new(source)
        }
    }

    pub fn pose(id: RawId, mapping: PoseMapping) -> Self {
        Self {
            positive: Some(id),
            pose: Some(mapping),
            ..Self::new(SourceKind::VrPose)
        }
    }

    pub fn with_smoothing(mut self, sensitivity: f32, gravity: f32) -> Self {
        self.sensitivity_enabled = true;
        self.sensitivity = sensitivity;
        self.gravity = gravity;
        self
    }

    pub fn with_deadzone(mut self, deadzone: f32) -> Self {
        self.deadzone = deadzone;
        self
    }

    pub fn inverted(mut self) -> Self {
        self.invert = !self.invert;
        self
    }

    pub fn discarded(mut self) -> Self {
        self.discard = true;
        self
    }

    /// Whether there is anything to read at all.
    pub fn is_configured(&self) -> bool {
        self.mode != AxisMode::NoInput && self.positive.is_some()
    }

    /// Whether this channel is evaluated in the late (pose) pass.
    pub fn is_pose(&self) -> bool {
        self.source.is_pose()
    }

    /// Whether the smoother applies to this channel.
    pub fn smooths(&self) -> bool {
        self.sensitivity_enabled && !self.discard
    }

    /// Read the shaped raw value.
    ///
    /// Unconfigured bindings read `Some(0.0)`. `None` means an identifier could not
    /// be resolved by `source`.
    pub fn try_read(&self, source: &dyn DeviceSource) -> Option<f32> {
        let positive = match (&self.positive, self.mode) {
            (Some(id), AxisMode::SingleAxis | AxisMode::CombinedAxis) => id,
            _ => return Some(0.0),
        };

        let mut value = self.read_raw(source, positive)?;
        if let (AxisMode::CombinedAxis, Some(negative)) = (self.mode, &self.negative) {
            value -= self.read_raw(source, negative)?;
        }

        if !value.is_finite() {
            return Some(0.0);
        }
        if self.invert {
            value = -value;
        }
        if value.abs() < self.deadzone {
            value = 0.0;
        }
        Some(value.clamp(-1.0, 1.0))
    }

    /// Like [`try_read`](Self::try_read) but unresolvable identifiers read `0`.
    pub fn read(&self, source: &dyn DeviceSource) -> f32 {
        self.try_read(source).unwrap_or(0.0)
    }

    fn read_raw(&self, source: &dyn DeviceSource, id: &RawId) -> Option<f32> {
        if let Some(mapping) = &self.pose {
            if let Some(rotation) = source.read_pose(id) {
                return Some(quat_to_axis(rotation, mapping));
            }
        }
        source.read_axis(id)
    }

    pub(crate) fn validate(&self, channel: &str) -> Result<()> {
        if !self.sensitivity.is_finite() || self.sensitivity < 0.0 {
            return Err(InputError::range(
                channel,
                "sensitivity",
                self.sensitivity,
                "finite and >= 0",
            ));
        }
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(InputError::range(
                channel,
                "gravity",
                self.gravity,
                "finite and >= 0",
            ));
        }
        if !(0.0..1.0).contains(&self.deadzone) {
            return Err(InputError::range(
                channel,
                "deadzone",
                self.deadzone,
                "in [0, 1)",
            ));
        }
        if let Some(mapping) = &self.pose {
            if !(mapping.max_angle_deg > 0.0 && mapping.max_angle_deg <= 180.0) {
                return Err(InputError::range(
                    channel,
                    "max_angle_deg",
                    mapping.max_angle_deg,
                    "in (0, 180]",
                ));
            }
        }
        for id in self.positive.iter().chain(self.negative.iter()) {
            check_source(channel, self.source, id)?;
        }
        Ok(())
    }
}

/// Binding of one discrete channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonBinding {
    pub source: SourceKind,
    #[serde(default)]
    pub id: Option<RawId>,
    /// Level-triggered when `true`; fires once per press when `false`.
    #[serde(default = "default_true")]
    pub can_be_held: bool,
    #[serde(default)]
    pub discard: bool,
}

impl ButtonBinding {
    pub fn new(source: SourceKind, id: RawId) -> Self {
        Self {
            source,
            id: Some(id),
            can_be_held: true,
            discard: false,
        }
    }

    /// Fire once per press instead of every tick while held.
    pub fn edge_triggered(mut self) -> Self {
        self.can_be_held = false;
        self
    }

    pub fn discarded(mut self) -> Self {
        self.discard = true;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.id.is_some()
    }

    /// Raw pressed state. Unconfigured bindings read `Some(false)`.
    pub fn try_read(&self, source: &dyn DeviceSource) -> Option<bool> {
        match &self.id {
            Some(id) => source.read_button(id),
            None => Some(false),
        }
    }

    pub fn read(&self, source: &dyn DeviceSource) -> bool {
        self.try_read(source).unwrap_or(false)
    }

    pub(crate) fn validate(&self, channel: &str) -> Result<()> {
        if let Some(id) = &self.id {
            check_source(channel, self.source, id)?;
        }
        Ok(())
    }
}

fn check_source(channel: &str, expected: SourceKind, id: &RawId) -> Result<()> {
    let found = id.source_kind();
    if found == expected {
        return Ok(());
    }
    Err(InputError::SourceMismatch {
        channel: channel.to_string(),
        expected,
        found,
    })
}

/// Bindings for the six continuous channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisBindings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<AxisBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<AxisBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitudinal: Option<AxisBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<AxisBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw: Option<AxisBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<AxisBinding>,
}

impl AxisBindings {
    pub fn get(&self, channel: AxisChannel) -> Option<&AxisBinding> {
        self.slot(channel).as_ref()
    }

    pub fn set(&mut self, channel: AxisChannel, binding: Option<AxisBinding>) {
        *self.slot_mut(channel) = binding;
    }

    fn slot(&self, channel: AxisChannel) -> &Option<AxisBinding> {
        match channel {
            AxisChannel::Horizontal => &self.horizontal,
            AxisChannel::Vertical => &self.vertical,
            AxisChannel::Longitudinal => &self.longitudinal,
            AxisChannel::Pitch => &self.pitch,
            AxisChannel::Yaw => &self.yaw,
            AxisChannel::Roll => &self.roll,
        }
    }

    fn slot_mut(&mut self, channel: AxisChannel) -> &mut Option<AxisBinding> {
        match channel {
            AxisChannel::Horizontal => &mut self.horizontal,
            AxisChannel::Vertical => &mut self.vertical,
            AxisChannel::Longitudinal => &mut self.longitudinal,
            AxisChannel::Pitch => &mut self.pitch,
            AxisChannel::Yaw => &mut self.yaw,
            AxisChannel::Roll => &mut self.roll,
        }
    }
}

/// Bindings for the discrete channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonBindings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_fire: Option<ButtonBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_fire: Option<ButtonBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dock: Option<ButtonBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jump: Option<ButtonBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crouch: Option<ButtonBinding>,
}

impl ButtonBindings {
    pub fn get(&self, channel: ButtonChannel) -> Option<&ButtonBinding> {
        self.slot(channel).as_ref()
    }

    pub fn set(&mut self, channel: ButtonChannel, binding: Option<ButtonBinding>) {
        *self.slot_mut(channel) = binding;
    }

    fn slot(&self, channel: ButtonChannel) -> &Option<ButtonBinding> {
        match channel {
            ButtonChannel::PrimaryFire => &self.primary_fire,
            ButtonChannel::SecondaryFire => &self.secondary_fire,
            ButtonChannel::Dock => &self.dock,
            ButtonChannel::Jump => &self.jump,
            ButtonChannel::Crouch => &self.crouch,
        }
    }

    fn slot_mut(&mut self, channel: ButtonChannel) -> &mut Option<ButtonBinding> {
        match channel {
            ButtonChannel::PrimaryFire => &mut self.primary_fire,
            ButtonChannel::SecondaryFire => &mut self.secondary_fire,
            ButtonChannel::Dock => &mut self.dock,
            ButtonChannel::Jump => &mut self.jump,
            ButtonChannel::Crouch => &mut self.crouch,
        }
    }
}

/// State the module enters after `initialize()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartState {
    #[default]
    Enabled,
    /// Only custom inputs run until `enable_input()`.
    CustomOnly,
}

fn default_probe_interval() -> f32 {
    0.1
}

fn default_probe_attempts() -> u32 {
    30
}

/// Module-level settings carried with a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSettings {
    #[serde(default)]
    pub start_state: StartState,
    /// Seconds between availability probes of backends that locate hardware.
    #[serde(default = "default_probe_interval")]
    pub probe_interval_secs: f32,
    /// Probe attempts before a backend is given up on.
    #[serde(default = "default_probe_attempts")]
    pub probe_attempts: u32,
}

impl Default for ModuleSettings {
    fn default() -> Self {
        Self {
            start_state: StartState::Enabled,
            probe_interval_secs: default_probe_interval(),
            probe_attempts: default_probe_attempts(),
        }
    }
}

/// Serializable set of bindings for one consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub settings: ModuleSettings,
    #[serde(default)]
    pub axes: AxisBindings,
    #[serde(default)]
    pub buttons: ButtonBindings,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom: Vec<CustomBinding>,
}

impl BindingProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            settings: ModuleSettings::default(),
            axes: AxisBindings::default(),
            buttons: ButtonBindings::default(),
            custom: Vec::new(),
        }
    }

    pub fn with_axis(mut self, channel: AxisChannel, binding: AxisBinding) -> Self {
        self.axes.set(channel, Some(binding));
        self
    }

    pub fn with_button(mut self, channel: ButtonChannel, binding: ButtonBinding) -> Self {
        self.buttons.set(channel, Some(binding));
        self
    }

    pub fn with_custom(mut self, binding: CustomBinding) -> Self {
        self.custom.push(binding);
        self
    }

    /// Reject bindings the module cannot run with.
    pub fn validate(&self) -> Result<()> {
        for channel in AxisChannel::ALL {
            if let Some(binding) = self.axes.get(channel) {
                binding.validate(channel.name())?;
            }
        }
        for channel in ButtonChannel::ALL {
            if let Some(binding) = self.buttons.get(channel) {
                binding.validate(channel.name())?;
            }
        }
        for custom in &self.custom {
            custom.validate()?;
        }
        if !(self.settings.probe_interval_secs.is_finite() && self.settings.probe_interval_secs > 0.0)
        {
            return Err(InputError::range(
                "settings",
                "probe_interval_secs",
                self.settings.probe_interval_secs,
                "finite and > 0",
            ));
        }
        Ok(())
    }

    /// Backend kinds referenced anywhere in the profile.
    pub fn source_kinds(&self) -> Vec<SourceKind> {
        let mut kinds: Vec<SourceKind> = AxisChannel::ALL
            .iter()
            .filter_map(|c| self.axes.get(*c).map(|b| b.source))
            .chain(
                ButtonChannel::ALL
                    .iter()
                    .filter_map(|c| self.buttons.get(*c).map(|b| b.source)),
            )
            .chain(self.custom.iter().map(|c| c.source()))
            .collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a profile; `.json` files are read as JSON, everything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&text)?,
            _ => Self::from_toml_str(&text)?,
        };
        log::info!("Loaded binding profile '{}' from {}", profile.name, path.display());
        Ok(profile)
    }
}
