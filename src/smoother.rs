//! Sensitivity/gravity axis smoothing.
//!
//! Turns step-like raw input (a key going down) into a ramp: values move toward
//! a non-zero target at `sensitivity` units per second and fall back toward zero
//! at `gravity` units per second. Crossing zero uses both rates combined.

use serde::{Deserialize, Serialize};

/// Advance `last` toward `target` by one tick of `dt` seconds.
///
/// Pure: the result depends only on the arguments. The result never overshoots
/// `target`, and a constant target is reached within
/// `ceil(|target - last| / (speed * dt))` ticks. A rate of `0.0` freezes motion in that direction. Negative or NaN
/// `dt` is treated as no elapsed time.
pub fn smooth(last: f32, target: f32, sensitivity: f32, gravity: f32, dt: f32) -> f32 {
    if last == target {
        return last;
    }

    let speed = if last != 0.0 && target != 0.0 && (last < 0.0) != (target < 0.0) {
        sensitivity + gravity
    } else if target.abs() > last.abs() {
        sensitivity
    } else {
        gravity
    };

    let delta = target - last;
    let step = speed * dt.max(0.0);
    if step + snap_tolerance(step) >= delta.abs() {
        target
    } else {
        last + step.copysign(delta)
    }
}

/// Slack for the final step of a ramp.
///
/// Each tick stores an `f32`, so a ramp across `[-1, 1]` drifts by up to
/// `ulp / 2` per step, about `EPSILON / step` in total. Without the slack a ramp
/// whose distance is an exact multiple of `step` lands just short and needs an
/// extra tick. Capped at half a step; a zero step never snaps.
#[inline]
fn snap_tolerance(step: f32) -> f32 {
    (f32::EPSILON / step).min(step * 0.5)
}

/// Smoothing memory for one channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisState {
    /// Output of the previous tick.
    pub last_value: f32,
}

impl AxisState {
    /// Smooth toward `target`, store and return the new value.
    #[inline]
    pub fn advance(&mut self, target: f32, sensitivity: f32, gravity: f32, dt: f32) -> f32 {
        self.last_value = smooth(self.last_value, target, sensitivity, gravity, dt);
        self.last_value
    }

    /// Bypass smoothing (snap).
    #[inline]
    pub fn set(&mut self, value: f32) -> f32 {
        self.last_value = value;
        value
    }

    #[inline]
    pub fn reset(&mut self) {
        self.last_value = 0.0;
    }
}
