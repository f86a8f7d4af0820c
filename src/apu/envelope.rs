//! Volume envelope shared by the pulse and noise channels.

/// Decaying (or constant) 4-bit volume generator, clocked on quarter frames.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    /// Restart on the next quarter-frame clock.
    pub start: bool,
    /// Constant volume: output the register value instead of the decay level.
    pub constant: bool,
    /// Register value: constant volume, or the divider period in decay mode.
    pub volume: u8,
    divider: u8,
    decay: u8,
}

impl Envelope {
    /// Apply the low six bits of $4000/$4004/$400C (bit 5 is loop, shared with the
    /// length counter halt).
    pub fn write_control(&mut self, data: u8) {
        self.constant = data & 0x10 != 0;
        self.volume = data & 0x0F;
    }

    pub fn clock(&mut self, looping: bool) {
        if self.start {
            self.start = false;
            self.decay = 15;
            self.divider = self.volume;
            return;
        }

        if self.divider > 0 {
            self.divider -= 1;
            return;
        }

        self.divider = self.volume;
        if self.decay > 0 {
            self.decay -= 1;
        } else if looping {
            self.decay = 15;
        }
    }

    #[inline]
    pub fn output(&self) -> u8 {
        if self.constant { self.volume } else { self.decay }
    }
}
