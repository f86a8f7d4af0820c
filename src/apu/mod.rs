/*!
Audio processing unit: two pulse channels and the noise channel.

Timing
======
`Apu::clock` is called once per PPU dot. Every sixth call (one APU cycle, two CPU cycles)
the channel timers advance and the frame sequencer counts one step. The 4-step sequence
raises quarter-frame clocks (envelopes) at steps 3729, 7457, 11186 and 14916, and
half-frame clocks (length counters and sweeps) at 7457 and 14916, then restarts.

Registers
=========
- $4000-$4003: pulse 1 (duty/envelope, sweep, timer low, length/timer high)
- $4004-$4007: pulse 2
- $400C-$400F: noise (envelope, unused, mode/period, length)
- $4015 write: channel enables (bit 0 pulse 1, bit 1 pulse 2, bit 3 noise)
- $4015 read: the same bits, set while the channel's length counter is non-zero
- $4017 write: restart the frame sequence

Triangle ($4008-$400B) and DMC ($4010-$4013) writes are accepted and ignored.

Mixing
======
A linear approximation of the hardware mixer:
`0.00752 * (pulse1 + pulse2) + 0.00494 * noise`, clamped to [-1, 1].
*/

mod envelope;
mod length;
mod noise;
mod pulse;
mod sweep;

pub use envelope::Envelope;
pub use length::{LENGTH_TABLE, LengthCounter};
pub use noise::{NOISE_PERIODS, Noise};
pub use pulse::{DUTY_SEQUENCES, Pulse};
pub use sweep::Sweep;

/// PPU dots per APU cycle.
const DOTS_PER_APU_CYCLE: u32 = 6;

const PULSE_WEIGHT: f32 = 0.00752;
const NOISE_WEIGHT: f32 = 0.00494;

#[derive(Debug, Clone)]
pub struct Apu {
    pulse1: Pulse,
    pulse2: Pulse,
    noise: Noise,
    clock_counter: u32,
    frame_counter: u32,
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}

impl Apu {
    pub fn new() -> Self {
        Self {
            pulse1: Pulse::new(true),
            pulse2: Pulse::new(false),
            noise: Noise::default(),
            clock_counter: 0,
            frame_counter: 0,
        }
    }

    /// Silence all channels and restart the frame sequence.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        match addr {
            0x4000..=0x4003 => self.pulse1.write(addr, data),
            0x4004..=0x4007 => self.pulse2.write(addr, data),
            0x400C..=0x400F => self.noise.write(addr, data),
            0x4015 => {
                self.pulse1.length.set_enabled(data & 0x01 != 0);
                self.pulse2.length.set_enabled(data & 0x02 != 0);
                self.noise.length.set_enabled(data & 0x08 != 0);
            }
            0x4017 => self.frame_counter = 0,
            _ => {}
        }
    }

    /// Only $4015 is readable.
    pub fn cpu_read(&self, addr: u16) -> u8 {
        if addr != 0x4015 {
            return 0;
        }
        (self.pulse1.length.active() as u8)
            | (self.pulse2.length.active() as u8) << 1
            | (self.noise.length.active() as u8) << 3
    }

    /// Advance one PPU dot.
    pub fn clock(&mut self) {
        if self.clock_counter % DOTS_PER_APU_CYCLE == 0 {
            self.frame_counter += 1;
            let (quarter, half) = match self.frame_counter {
                3729 | 11186 => (true, false),
                7457 => (true, true),
                14916 => {
                    self.frame_counter = 0;
                    (true, true)
                }
                _ => (false, false),
            };

            if quarter {
                self.pulse1.clock_quarter();
                self.pulse2.clock_quarter();
                self.noise.clock_quarter();
            }
            if half {
                self.pulse1.clock_half();
                self.pulse2.clock_half();
                self.noise.clock_half();
            }

            self.pulse1.clock_timer();
            self.pulse2.clock_timer();
            self.noise.clock_timer();
        }
        self.clock_counter = self.clock_counter.wrapping_add(1);
    }

    /// Mixed output of all channels.
    pub fn output_sample(&self) -> f32 {
        let pulse = (self.pulse1.output() + self.pulse2.output()) as f32;
        let noise = self.noise.output() as f32;
        (PULSE_WEIGHT * pulse + NOISE_WEIGHT * noise).clamp(-1.0, 1.0)
    }

    pub fn pulse1(&self) -> &Pulse {
        &self.pulse1
    }

    pub fn pulse2(&self) -> &Pulse {
        &self.pulse2
    }

    pub fn noise(&self) -> &Noise {
        &self.noise
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// PPU dots in one full 4-step sequence.
    const DOTS_PER_SEQUENCE: u32 = 14916 * DOTS_PER_APU_CYCLE;

    #[test]
    fn status_reports_active_length_counters() {
        let mut apu = Apu::new();
        apu.cpu_write(0x4015, 0x0B);
        apu.cpu_write(0x4003, 0x08);
        assert_eq!(apu.cpu_read(0x4015), 0x01);
        apu.cpu_write(0x4007, 0x08);
        apu.cpu_write(0x400F, 0x08);
        assert_eq!(apu.cpu_read(0x4015), 0x0B);

        apu.cpu_write(0x4015, 0x08);
        assert_eq!(apu.cpu_read(0x4015), 0x08);
        assert_eq!(apu.cpu_read(0x4016), 0x00);
    }

    #[test]
    fn half_frames_decrement_length_twice_per_sequence() {
        let mut apu = Apu::new();
        apu.cpu_write(0x4015, 0x01);
        apu.cpu_write(0x4003, 0x00); // length 10
        for _ in 0..DOTS_PER_SEQUENCE + 1 {
            apu.clock();
        }
        assert_eq!(apu.pulse1().length.value(), 8);
    }

    #[test]
    fn silent_when_everything_disabled() {
        let mut apu = Apu::new();
        for _ in 0..10_000 {
            apu.clock();
        }
        assert_eq!(apu.output_sample(), 0.0);
    }

    #[test]
    fn pulse_output_is_weighted() {
        let mut apu = Apu::new();
        apu.cpu_write(0x4015, 0x01);
        apu.cpu_write(0x4000, 0xBF); // 50% duty, halt, constant volume 15
        apu.cpu_write(0x4002, 0x00);
        apu.cpu_write(0x4003, 0x01); // period 0x100

        let mut peak = 0.0f32;
        for _ in 0..DOTS_PER_APU_CYCLE * 0x101 * 8 {
            apu.clock();
            peak = peak.max(apu.output_sample());
        }
        assert!((peak - 15.0 * PULSE_WEIGHT).abs() < 1e-6);
    }

    #[test]
    fn frame_counter_write_restarts_sequence() {
        let mut apu = Apu::new();
        apu.cpu_write(0x4015, 0x01);
        apu.cpu_write(0x4003, 0x00);
        // Stop just short of the first half frame, restart, and run short again.
        for _ in 0..7000 * DOTS_PER_APU_CYCLE {
            apu.clock();
        }
        apu.cpu_write(0x4017, 0x00);
        for _ in 0..7000 * DOTS_PER_APU_CYCLE {
            apu.clock();
        }
        assert_eq!(apu.pulse1().length.value(), 10);
    }
}
