//! Level- vs edge-triggered button evaluation.

/// Per-channel press memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonLatch {
    was_down: bool,
}

impl ButtonLatch {
    /// Feed this tick's raw state.
    ///
    /// `can_be_held`: report `down` as-is. Otherwise report `true` only on the
    /// tick `down` goes from released to pressed.
    pub fn update(&mut self, down: bool, can_be_held: bool) -> bool {
        let fired = if can_be_held {
            down
        } else {
            down && !self.was_down
        };
        self.was_down = down;
        fired
    }

    pub fn reset(&mut self) {
        self.was_down = false;
    }

    /// Start from a known raw state.
    ///
    /// Seeding with `true` marks a press that is already held as reported, so an
    /// edge-triggered button resumed mid-press does not fire twice.
    pub fn seed(&mut self, down: bool) {
        self.was_down = down;
    }
}
