//! Length counter: silences a channel after a programmed number of half frames.

/// Load values indexed by bits 7..3 of the length register.
#[rustfmt::skip]
pub const LENGTH_TABLE: [u8; 32] = [
    10, 254, 20,  2, 40,  4, 80,  6,
    160,  8, 60, 10, 14, 12, 26, 14,
    12,  16, 24, 18, 48, 20, 96, 22,
    192, 24, 72, 26, 16, 28, 32, 30,
];

#[derive(Debug, Clone, Default)]
pub struct LengthCounter {
    counter: u8,
    enabled: bool,
    /// Stop counting (shared with the envelope loop flag).
    pub halt: bool,
}

impl LengthCounter {
    /// Load from a length register write. Ignored while the channel is disabled.
    pub fn load(&mut self, data: u8) {
        if self.enabled {
            self.counter = LENGTH_TABLE[(data >> 3) as usize];
        }
    }

    /// Channel enable from $4015. Disabling clears the counter.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.counter = 0;
        }
    }

    pub fn clock(&mut self) {
        if !self.halt && self.counter > 0 {
            self.counter -= 1;
        }
    }

    #[inline]
    pub fn active(&self) -> bool {
        self.counter > 0
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.counter
    }
}
