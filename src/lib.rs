#![doc = r#"
nes-engine library crate.

Cycle-driven NES core: the host builds a `Bus`, inserts a `Cartridge` and calls
`Bus::clock` at the PPU dot rate (or the `step_frame` / `step_instruction` helpers).
Pixels come out of `Bus::frame_buffer` as 256x240 RGBA, audio out of
`Bus::audio_sample` whenever `clock` reports a new sample.

Modules:
- apu: two pulse channels and the noise channel, frame sequencer and mixer
- bus: system board; owns every component and orders them per dot
- cartridge: iNES / NES 2.0 loader; constructs the mapper
- config: clock rates, screen size and host-tunable `EngineConfig`
- controller: standard pad shift register and `Button` flags
- cpu: cycle-counted 6502 interpreter and disassembler
- mapper: `Mapper` trait, mirroring modes and NROM (mapper 0)
- mappers: MMC1, UxROM, CNROM and MMC3
- ppu: dot-level picture pipeline, OAM and debug views
- ppu_bus: trait through which the PPU reaches cartridge pattern memory

In tests, shared iNES builders are available under `crate::test_utils`.
"#]

// Core emulator modules
pub mod apu;
pub mod bus;
pub mod cartridge;
pub mod config;
pub mod controller;
pub mod cpu;
pub mod mapper;
pub mod mappers;
pub mod ppu;
pub mod ppu_bus;

#[cfg(feature = "screenshot")]
pub mod screenshot;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use cartridge::{Cartridge, CartridgeError};
pub use config::EngineConfig;
pub use controller::Button;
pub use cpu::Cpu;

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
