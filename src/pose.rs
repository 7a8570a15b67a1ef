//! Orientation → bipolar axis mapping.
//!
//! A tracked orientation (head, hand) is reduced to one Euler angle in degrees,
//! normalized into `[0, 360)`, and mapped to `[-1, 1]`:
//!
//! - `[0, 180)` moves linearly from `0` toward the configured sign.
//! - `[180, 360)` comes linearly back to `0` from the opposite sign
//!   ([`WrapMode::Bipolar`]) or from the same sign ([`WrapMode::Mirrored`]).
//!
//! So `0°` and `360°` both read `0`, there is no jump at the wrap point, and
//! `180°` is the extreme. In bipolar mode the only discontinuity is at 180°,
//! where the value flips from one extreme to the other.
//!
//! Different axes were tuned with different conventions, so the mapping is
//! per-binding configuration rather than one fixed formula.

use glam::{EulerRot, Quat};
use serde::{Deserialize, Serialize};

/// Euler component to sample (Unity-style Y-X-Z decomposition).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EulerAxis {
    /// Rotation about X (nodding).
    #[default]
    X,
    /// Rotation about Y (turning).
    Y,
    /// Rotation about Z (tilting).
    Z,
}

/// Sign of the output for small positive angles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSign {
    #[default]
    Positive,
    Negative,
}

impl AxisSign {
    #[inline]
    fn factor(self) -> f32 {
        match self {
            AxisSign::Positive => 1.0,
            AxisSign::Negative => -1.0,
        }
    }
}

/// How the upper half of the circle is signed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    /// Upper half takes the opposite sign of the lower half.
    #[default]
    Bipolar,
    /// Both halves share a sign.
    Mirrored,
}

fn default_max_angle() -> f32 {
    180.0
}

/// Per-binding pose mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseMapping {
    #[serde(default)]
    pub euler: EulerAxis,
    #[serde(default)]
    pub sign: AxisSign,
    #[serde(default)]
    pub wrap: WrapMode,
    /// Deflection in degrees that reads as full scale. Must be in `(0, 180]`.
    #[serde(default = "default_max_angle")]
    pub max_angle_deg: f32,
}

impl Default for PoseMapping {
    fn default() -> Self {
        Self {
            euler: EulerAxis::X,
            sign: AxisSign::Positive,
            wrap: WrapMode::Bipolar,
            max_angle_deg: default_max_angle(),
        }
    }
}

impl PoseMapping {
    pub fn new(euler: EulerAxis, sign: AxisSign, wrap: WrapMode) -> Self {
        Self {
            euler,
            sign,
            wrap,
            ..Self::default()
        }
    }

    pub fn with_max_angle(mut self, degrees: f32) -> Self {
        self.max_angle_deg = degrees;
        self
    }
}

/// Map an angle in degrees (any range) to `[-1, 1]`.
pub fn angle_to_axis(degrees: f32, mapping: &PoseMapping) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let deg = degrees.rem_euclid(360.0);
    let sign = mapping.sign.factor();

    let (magnitude, signed) = if deg < 180.0 {
        (deg, sign)
    } else {
        let back = match mapping.wrap {
            WrapMode::Bipolar => -sign,
            WrapMode::Mirrored => sign,
        };
        (360.0 - deg, back)
    };

    let full_scale = if mapping.max_angle_deg > 0.0 {
        mapping.max_angle_deg.min(180.0)
    } else {
        180.0
    };
    (magnitude / full_scale).min(1.0) * signed
}

/// Euler angle of `rotation` about `axis`, in degrees within `[0, 360)`.
pub fn euler_degrees(rotation: Quat, axis: EulerAxis) -> f32 {
    // YXZ returns (y, x, z), which matches the host engine's Z-X-Y application order.
    let (y, x, z) = rotation.normalize().to_euler(EulerRot::YXZ);
    let radians = match axis {
        EulerAxis::X => x,
        EulerAxis::Y => y,
        EulerAxis::Z => z,
    };
    radians.to_degrees().rem_euclid(360.0)
}

/// Reduce an orientation to a bipolar axis value.
pub fn quat_to_axis(rotation: Quat, mapping: &PoseMapping) -> f32 {
    if !rotation.is_finite() || rotation.length_squared() == 0.0 {
        return 0.0;
    }
    angle_to_axis(euler_degrees(rotation, mapping.euler), mapping)
}
