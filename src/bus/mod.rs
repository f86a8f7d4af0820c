#![doc = r#"
Bus module: the console's main board.

Overview
- `Bus` owns the CPU, PPU, APU, 2 KiB of work RAM, both controllers, the OAM DMA
  controller and (once inserted) the cartridge. Nothing is shared; each component is
  reached only through its read/write entry points.
- `Bus::clock` is the single advancement primitive and runs at the PPU dot rate. The CPU
  and DMA advance on every third call.

Modules and responsibilities
- cpu_interface: CPU-visible address decode; `impl CpuBus for Bus`.
- clock: per-dot ordering of PPU/APU/CPU/DMA, interrupt delivery and audio timing.
- dma: OAM DMA state machine (`DmaController`) and its `CpuMemory`/`OamWriter` seams.
- ram: 2 KiB mirrored work RAM.
- controller_registers: $4016/$4017.

No cartridge
- Until a cartridge is inserted, `clock` does nothing and cartridge space reads 0.
"#]

pub mod clock;
pub mod controller_registers;
pub mod cpu_interface;
pub mod dma;
pub mod ram;


use std::collections::BTreeMap;

use crate::apu::Apu;
use crate::cartridge::Cartridge;
use crate::config::EngineConfig;
use crate::controller::{Button, Controller};
use crate::cpu::Cpu;
use crate::ppu::Ppu;
use dma::DmaController;
use ram::Ram;

pub struct Bus {
    cpu: Cpu,
    ppu: Ppu,
    apu: Apu,
    cartridge: Option<Cartridge>,
    ram: Ram,
    pub(crate) controllers: [Controller; 2],
    dma: DmaController,

    system_clock_counter: u64,

    audio_time: f64,
    time_per_sample: f64,
    time_per_clock: f64,
    audio_sample: f32,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            cpu: Cpu::new(),
            ppu: Ppu::new(),
            apu: Apu::new(),
            cartridge: None,
            ram: Ram::new(),
            controllers: [Controller::new(), Controller::new()],
            dma: DmaController::default(),
            system_clock_counter: 0,
            audio_time: 0.0,
            time_per_sample: config.time_per_sample(),
            time_per_clock: config.time_per_clock(),
            audio_sample: 0.0,
        }
    }

    /// Install `cartridge`, replacing any previous one, and reset the system.
    pub fn insert_cartridge(&mut self, cartridge: Cartridge) {
        log::debug!(
            "inserting cartridge: mapper {}, {} PRG / {} CHR banks",
            cartridge.mapper_id(),
            cartridge.prg_banks(),
            cartridge.chr_banks()
        );
        self.cartridge = Some(cartridge);
        self.reset();
    }

    /// Remove the cartridge; the bus returns to its idle state.
    pub fn eject_cartridge(&mut self) -> Option<Cartridge> {
        self.cartridge.take()
    }

    /// Reset button: cartridge, CPU (through the reset vector), PPU, APU and DMA.
    /// Work RAM keeps its contents.
    pub fn reset(&mut self) {
        log::debug!("system reset");
        if let Some(cart) = self.cartridge.as_mut() {
            cart.reset();
        }
        self.ppu.reset();
        self.apu.reset();
        self.dma = DmaController::default();
        self.system_clock_counter = 0;
        self.audio_time = 0.0;
        self.with_cpu(|cpu, bus| cpu.reset(bus));
    }

    /// Audio output rate; derives the per-sample and per-dot time steps.
    pub fn set_sample_frequency(&mut self, sample_rate: u32) {
        let config = EngineConfig { sample_rate };
        self.time_per_sample = config.time_per_sample();
        self.time_per_clock = config.time_per_clock();
    }

    /// Run `f` with the CPU moved out of the bus so it can borrow the bus mutably.
    pub(crate) fn with_cpu<R>(&mut self, f: impl FnOnce(&mut Cpu, &mut Self) -> R) -> R {
        let mut cpu = std::mem::take(&mut self.cpu);
        let result = f(&mut cpu, self);
        self.cpu = cpu;
        result
    }

    /// Clock until the CPU has finished the current instruction and fetched the next one.
    /// Returns the number of dots consumed. Does nothing without a cartridge.
    pub fn step_instruction(&mut self) -> u64 {
        if self.cartridge.is_none() {
            return 0;
        }
        let start = self.system_clock_counter;
        loop {
            self.clock();
            if self.cpu.complete() && !self.dma.is_active() {
                break;
            }
        }
        // Run into the next instruction's first cycle.
        loop {
            self.clock();
            if !self.cpu.complete() {
                break;
            }
        }
        self.system_clock_counter - start
    }

    /// Clock until the PPU finishes a frame. Does nothing without a cartridge.
    pub fn step_frame(&mut self) {
        if self.cartridge.is_none() {
            return;
        }
        while !self.ppu.take_frame_complete() {
            self.clock();
        }
    }

    /// Set the live button state of controller `port` (0 or 1).
    pub fn set_controller(&mut self, port: usize, buttons: Button) {
        self.controllers[port & 0x01].set_buttons(buttons);
    }

    pub fn controller(&self, port: usize) -> &Controller {
        &self.controllers[port & 0x01]
    }

    pub fn disassemble(&mut self, start: u16, stop: u16) -> BTreeMap<u16, String> {
        self.with_cpu(|cpu, bus| cpu.disassemble(bus, start, stop))
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn apu(&self) -> &Apu {
        &self.apu
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn frame_buffer(&self) -> &[u8] {
        self.ppu.frame_buffer()
    }

    pub fn frame_complete(&self) -> bool {
        self.ppu.frame_complete()
    }

    pub fn take_frame_complete(&mut self) -> bool {
        self.ppu.take_frame_complete()
    }

    /// Most recent mixed audio sample.
    pub fn audio_sample(&self) -> f32 {
        self.audio_sample
    }

    /// Dots since the last reset.
    pub fn system_clock_counter(&self) -> u64 {
        self.system_clock_counter
    }

    pub fn dma_active(&self) -> bool {
        self.dma.is_active()
    }
}
