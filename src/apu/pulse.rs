//! Pulse (square wave) channel.

use super::envelope::Envelope;
use super::length::LengthCounter;
use super::sweep::Sweep;

/// Duty waveforms for 12.5%, 25%, 50% and 75% (negated 25%). Bit 0 is the current output;
/// the sequence rotates right on every timer reload.
pub const DUTY_SEQUENCES: [u8; 4] = [0b0100_0000, 0b0110_0000, 0b0111_1000, 0b1001_1111];

#[derive(Debug, Clone)]
pub struct Pulse {
    duty: u8,
    sequence: u8,
    timer: u16,
    /// 11-bit timer period.
    period: u16,
    pub envelope: Envelope,
    pub length: LengthCounter,
    pub sweep: Sweep,
}

impl Pulse {
    /// `ones_complement` selects pulse 1's sweep negation.
    pub fn new(ones_complement: bool) -> Self {
        Self {
            duty: 0,
            sequence: DUTY_SEQUENCES[0],
            timer: 0,
            period: 0,
            envelope: Envelope::default(),
            length: LengthCounter::default(),
            sweep: Sweep::new(ones_complement),
        }
    }

    /// Register `reg` (0..=3) of this channel.
    pub fn write(&mut self, reg: u16, data: u8) {
        match reg & 0x03 {
            0 => {
                self.duty = data >> 6;
                self.sequence = DUTY_SEQUENCES[self.duty as usize];
                self.length.halt = data & 0x20 != 0;
                self.envelope.write_control(data);
            }
            1 => self.sweep.write(data),
            2 => self.period = (self.period & 0x0700) | data as u16,
            _ => {
                self.period = (((data & 0x07) as u16) << 8) | (self.period & 0x00FF);
                self.timer = self.period;
                self.sequence = DUTY_SEQUENCES[self.duty as usize];
                self.length.load(data);
                self.envelope.start = true;
            }
        }
    }

    /// One APU cycle of the timer.
    pub fn clock_timer(&mut self) {
        if self.timer == 0 {
            self.timer = self.period;
            self.sequence = self.sequence.rotate_right(1);
        } else {
            self.timer -= 1;
        }
    }

    pub fn clock_quarter(&mut self) {
        self.envelope.clock(self.length.halt);
    }

    pub fn clock_half(&mut self) {
        self.length.clock();
        if let Some(period) = self.sweep.clock(self.period) {
            self.period = period;
        }
    }

    pub fn period(&self) -> u16 {
        self.period
    }

    /// Current 4-bit output level.
    pub fn output(&self) -> u8 {
        if !self.length.active() || self.sweep.mutes(self.period) || self.sequence & 0x01 == 0 {
            return 0;
        }
        self.envelope.output()
    }
}
