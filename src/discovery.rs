//! Bounded availability polling for backends that locate hardware at startup.
//!
//! Headsets and remapping plugins often appear a few frames after the
//! application starts. Instead of blocking, the module keeps an
//! [`AvailabilityProbe`] per such backend and advances it with each tick's `dt`:
//! the first attempt on the first tick, then one every `interval` seconds, up to
//! `max_attempts`, then give up.

use crate::device::DeviceSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Searching,
    Ready,
    GaveUp,
}

#[derive(Debug, Clone)]
pub struct AvailabilityProbe {
    interval: f32,
    max_attempts: u32,
    attempts: u32,
    since_last: f32,
    state: ProbeState,
}

impl AvailabilityProbe {
    pub fn new(interval: f32, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            attempts: 0,
            since_last: 0.0,
            state: ProbeState::Searching,
        }
    }

    pub fn state(&self) -> ProbeState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_ready(&self) -> bool {
        self.state == ProbeState::Ready
    }

    /// Advance by `dt` seconds, probing `source` when an attempt is due.
    /// At most one attempt is made per step. Returns the state after this step.
    pub fn step(&mut self, dt: f32, source: &mut dyn DeviceSource) -> ProbeState {
        if self.state != ProbeState::Searching {
            return self.state;
        }
        self.since_last += dt.max(0.0);
        if self.attempts > 0 {
            if self.since_last < self.interval {
                return self.state;
            }
            self.since_last -= self.interval;
        } else {
            self.since_last = 0.0;
        }

        self.attempts += 1;
        if source.probe() {
            log::debug!(
                "Backend '{}' ready after {} probe(s)",
                source.name(),
                self.attempts
            );
            self.state = ProbeState::Ready;
        } else if self.attempts >= self.max_attempts {
            self.state = ProbeState::GaveUp;
        }
        self.state
    }

    /// Restart searching, e.g. after a reconfiguration.
    pub fn restart(&mut self) {
        *self = Self::new(self.interval, self.max_attempts);
    }
}
