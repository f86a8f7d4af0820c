/*!
CPU interface dispatcher

Address map:
- $0000-$07FF: 2KB internal RAM
- $0800-$1FFF: Mirrors of $0000-$07FF (mask & 0x07FF)
- $2000-$2007: PPU registers
- $2008-$3FFF: Mirrors of $2000-$2007 (mask with & 0x0007)
- $4000-$4013: APU registers
- $4014: OAM DMA (write)
- $4015: APU status (read) / enables (write)
- $4016: Controller 1
- $4017: Controller 2 (read and latch) / APU frame counter (write)
- $4018-$FFFF: whatever the cartridge claims; unclaimed reads return 0

The cartridge sees every access first, so mappers may also decode addresses below $4020.
*/

use crate::bus::Bus;
use crate::bus::controller_registers::ControllerRegisters;
use crate::bus::dma::{CpuMemory, OamWriter};
use crate::cpu::CpuBus;
use crate::ppu_bus::NoCartridge;

/// CPU-visible read. `read_only` suppresses register side effects (debugger access).
pub fn cpu_read(bus: &mut Bus, addr: u16, read_only: bool) -> u8 {
    if let Some(data) = bus.cartridge.as_mut().and_then(|cart| cart.cpu_read(addr)) {
        return data;
    }

    match addr {
        0x0000..=0x1FFF => bus.ram.read(addr),
        0x2000..=0x3FFF => match bus.cartridge.as_ref() {
            Some(cart) => bus.ppu.cpu_read(cart, addr, read_only),
            None => bus.ppu.cpu_read(&NoCartridge, addr, read_only),
        },
        0x4015 => bus.apu.cpu_read(addr),
        0x4016 | 0x4017 => ControllerRegisters::read(bus, addr, read_only).unwrap_or(0),
        _ => 0x00,
    }
}

/// CPU-visible write.
pub fn cpu_write(bus: &mut Bus, addr: u16, data: u8) {
    if bus
        .cartridge
        .as_mut()
        .is_some_and(|cart| cart.cpu_write(addr, data))
    {
        return;
    }

    match addr {
        0x0000..=0x1FFF => bus.ram.write(addr, data),
        0x2000..=0x3FFF => match bus.cartridge.as_mut() {
            Some(cart) => bus.ppu.cpu_write(cart, addr, data),
            None => bus.ppu.cpu_write(&mut NoCartridge, addr, data),
        },
        0x4000..=0x4013 | 0x4015 => bus.apu.cpu_write(addr, data),
        0x4014 => bus.dma.start(data),
        0x4016 => {
            ControllerRegisters::write(bus, addr, data);
        }
        0x4017 => {
            bus.apu.cpu_write(addr, data);
            ControllerRegisters::write(bus, addr, data);
        }
        _ => {}
    }
}

impl CpuBus for Bus {
    #[inline]
    fn cpu_read(&mut self, addr: u16, read_only: bool) -> u8 {
        cpu_read(self, addr, read_only)
    }

    #[inline]
    fn cpu_write(&mut self, addr: u16, data: u8) {
        cpu_write(self, addr, data)
    }
}

impl CpuMemory for Bus {
    #[inline]
    fn dma_read(&mut self, addr: u16) -> u8 {
        cpu_read(self, addr, false)
    }
}

impl OamWriter for Bus {
    #[inline]
    fn write_oam(&mut self, index: u8, value: u8) {
        self.ppu.write_oam(index, value);
    }
}
