//! Engine-wide constants and host-tunable settings.

pub use crate::ppu::{NES_HEIGHT, NES_WIDTH};

/// PPU dot clock (NTSC), the rate at which `Bus::clock` is expected to be called.
pub const PPU_CLOCK_HZ: f64 = 5_369_318.0;

/// CPU clock (NTSC), one third of the PPU dot clock.
pub const CPU_CLOCK_HZ: f64 = 1_789_773.0;

/// Audio output rate used when the host does not choose one.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Settings the host can choose when building a `Bus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Audio output sample rate in Hz.
    pub sample_rate: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl EngineConfig {
    /// Seconds between output samples. A zero rate falls back to the default.
    pub fn time_per_sample(&self) -> f64 {
        let rate = if self.sample_rate == 0 {
            DEFAULT_SAMPLE_RATE
        } else {
            self.sample_rate
        };
        1.0 / rate as f64
    }

    /// Seconds per PPU dot.
    pub fn time_per_clock(&self) -> f64 {
        1.0 / PPU_CLOCK_HZ
    }
}
