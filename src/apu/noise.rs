//! Noise channel: a 15-bit LFSR clocked from a fixed period table.

use super::envelope::Envelope;
use super::length::LengthCounter;

/// Timer periods selected by the low nibble of $400E.
#[rustfmt::skip]
pub const NOISE_PERIODS: [u16; 16] = [
    0, 4, 8, 16, 32, 64, 96, 128, 160, 202, 254, 380, 508, 1016, 2034, 4068,
];

/// Power-on shift register contents.
pub const LFSR_SEED: u16 = 0xDBDB;

#[derive(Debug, Clone)]
pub struct Noise {
    shift: u16,
    /// Short mode: feedback taps bit 6 instead of bit 1.
    short_mode: bool,
    timer: u16,
    period: u16,
    pub envelope: Envelope,
    pub length: LengthCounter,
}

impl Default for Noise {
    fn default() -> Self {
        Self {
            shift: LFSR_SEED,
            short_mode: false,
            timer: 0,
            period: 0,
            envelope: Envelope::default(),
            length: LengthCounter::default(),
        }
    }
}

impl Noise {
    /// Register `reg` (0..=3) of the channel, $400C..=$400F.
    pub fn write(&mut self, reg: u16, data: u8) {
        match reg & 0x03 {
            0 => {
                self.length.halt = data & 0x20 != 0;
                self.envelope.write_control(data);
            }
            1 => {}
            2 => {
                self.short_mode = data & 0x80 != 0;
                self.period = NOISE_PERIODS[(data & 0x0F) as usize];
            }
            _ => {
                self.length.load(data);
                self.envelope.start = true;
            }
        }
    }

    pub fn clock_timer(&mut self) {
        if self.timer == 0 {
            self.timer = self.period;
            self.step_lfsr();
        } else {
            self.timer -= 1;
        }
    }

    fn step_lfsr(&mut self) {
        let tap = if self.short_mode { 6 } else { 1 };
        let feedback = (self.shift ^ (self.shift >> tap)) & 0x0001;
        self.shift = ((self.shift & 0x7FFF) >> 1) | (feedback << 14);
    }

    pub fn clock_quarter(&mut self) {
        self.envelope.clock(self.length.halt);
    }

    pub fn clock_half(&mut self) {
        self.length.clock();
    }

    /// Current 4-bit output level. Bit 0 of the shift register set means silence.
    pub fn output(&self) -> u8 {
        if !self.length.active() || self.shift & 0x0001 != 0 {
            return 0;
        }
        self.envelope.output()
    }
}
