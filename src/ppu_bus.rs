/*!
ppu_bus: the cartridge-side half of the PPU address space.

The PPU owns its nametable RAM, palette RAM and OAM. Pattern memory ($0000-$1FFF) and the
nametable arrangement belong to the cartridge, so the PPU reaches them through this trait
instead of holding a concrete `Cartridge`. `Cartridge` is the production implementor;
tests use a small in-memory mock.
*/

use crate::mapper::Mirror;

/// Cartridge services the PPU needs while rendering and during $2007 accesses.
pub trait PpuBus {
    /// Read pattern memory. `None` means the cartridge did not claim the address.
    fn ppu_read(&self, addr: u16) -> Option<u8>;

    /// Write pattern memory. Returns false when the write was not claimed (CHR ROM).
    fn ppu_write(&mut self, addr: u16, data: u8) -> bool;

    /// Effective nametable mirroring (mapper override or header value).
    fn mirror(&self) -> Mirror;

    /// Called once per rendered scanline for mappers with scanline counters.
    fn scanline(&mut self) {}
}

/// Stand-in used while no cartridge is inserted: nothing is claimed and the nametables use
/// horizontal arrangement.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCartridge;

impl PpuBus for NoCartridge {
    fn ppu_read(&self, _addr: u16) -> Option<u8> {
        None
    }

    fn ppu_write(&mut self, _addr: u16, _data: u8) -> bool {
        false
    }

    fn mirror(&self) -> Mirror {
        Mirror::Horizontal
    }
}
