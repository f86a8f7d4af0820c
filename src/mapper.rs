/*!
Mapper subsystem: trait definition and NROM (mapper 0) implementation.

Purpose:
- Decouple CPU/PPU address translation from the `Cartridge` so each board variant is a
  small strategy object.
- Mappers never own PRG/CHR storage. They translate a bus address into an offset that the
  cartridge uses to index its own storage, or they serve the access themselves (work RAM,
  bank registers) and say so through `CpuMapped`.

Integration:
- The cartridge gets first claim on every CPU address; `None` means "not mine" and the Bus
  continues its own decode.
- PPU addresses $0000..=$1FFF (pattern tables) go through `ppu_map_read`/`ppu_map_write`.
- `mirror()` may override the header mirroring at runtime; `Mirror::Hardware` defers to it.
- Scanline-counting mappers expose `irq_state`/`irq_clear`/`scanline`; others keep the
  inert defaults.
*/

/// Nametable arrangement selected either by the cartridge header or by the mapper.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Mirror {
    /// Defer to the mirroring declared in the cartridge header.
    #[default]
    Hardware,
    Horizontal,
    Vertical,
    OneScreenLo,
    OneScreenHi,
}

/// Outcome of a CPU-side access the mapper has claimed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CpuMapped {
    /// Index into PRG storage.
    Offset(usize),
    /// Byte served by the mapper itself (on-board RAM).
    Data(u8),
    /// Write absorbed by the mapper (register or on-board RAM); storage untouched.
    Handled,
}

/// Common interface all cartridge mappers implement.
///
/// All addresses are full, unmasked CPU or PPU addresses.
pub trait Mapper {
    /// iNES mapper number.
    fn mapper_id(&self) -> u8;

    /// Translate a CPU read. `None` leaves the address to the Bus.
    fn cpu_map_read(&mut self, addr: u16) -> Option<CpuMapped>;

    /// Translate a CPU write. Register writes return `Some(CpuMapped::Handled)`.
    fn cpu_map_write(&mut self, addr: u16, data: u8) -> Option<CpuMapped>;

    /// Translate a PPU read into a CHR offset.
    fn ppu_map_read(&self, addr: u16) -> Option<usize>;

    /// Translate a PPU write into a CHR offset. Only CHR RAM boards accept writes.
    fn ppu_map_write(&mut self, addr: u16) -> Option<usize>;

    /// Restore bank registers to their power-on values.
    fn reset(&mut self) {}

    /// Current mirroring. `Mirror::Hardware` defers to the cartridge header.
    fn mirror(&self) -> Mirror {
        Mirror::Hardware
    }

    /// Whether the mapper is asserting its IRQ line.
    fn irq_state(&self) -> bool {
        false
    }

    /// Acknowledge the IRQ line.
    fn irq_clear(&mut self) {}

    /// Scanline notification from the PPU (drives MMC3-style counters).
    fn scanline(&mut self) {}
}

/// NROM (mapper 0).
///
/// - PRG: 16 KiB mirrored across $8000..=$FFFF, or 32 KiB mapped directly.
/// - CHR: 8 KiB ROM, or 8 KiB RAM when the header declares no CHR banks.
#[derive(Clone, Debug)]
pub struct Nrom {
    prg_banks: u16,
    chr_banks: u16,
}

impl Nrom {
    pub fn new(prg_banks: u16, chr_banks: u16) -> Self {
        Self {
            prg_banks,
            chr_banks,
        }
    }

    #[inline]
    fn prg_mask(&self) -> u16 {
        if self.prg_banks > 1 { 0x7FFF } else { 0x3FFF }
    }

    /// Returns true for the 16 KiB (NROM-128) layout.
    pub fn is_nrom_128(&self) -> bool {
        self.prg_banks <= 1
    }
}

impl Mapper for Nrom {
    #[inline]
    fn mapper_id(&self) -> u8 {
        0
    }

    fn cpu_map_read(&mut self, addr: u16) -> Option<CpuMapped> {
        match addr {
            0x8000..=0xFFFF => Some(CpuMapped::Offset((addr & self.prg_mask()) as usize)),
            _ => None,
        }
    }

    fn cpu_map_write(&mut self, addr: u16, _data: u8) -> Option<CpuMapped> {
        match addr {
            // PRG is ROM; the store is swallowed.
            0x8000..=0xFFFF => Some(CpuMapped::Handled),
            _ => None,
        }
    }

    fn ppu_map_read(&self, addr: u16) -> Option<usize> {
        match addr {
            0x0000..=0x1FFF => Some(addr as usize),
            _ => None,
        }
    }

    fn ppu_map_write(&mut self, addr: u16) -> Option<usize> {
        match addr {
            // Writable only as CHR RAM.
            0x0000..=0x1FFF if self.chr_banks == 0 => Some(addr as usize),
            _ => None,
        }
    }
}

/// Resolve a CPU-side PRG offset from a switchable 16 KiB low bank and fixed high bank.
/// Shared by the simple UxROM-style boards.
#[inline]
pub(crate) fn split_16k(addr: u16, lo_bank: u16, hi_bank: u16) -> usize {
    match addr {
        0x8000..=0xBFFF => lo_bank as usize * 0x4000 + (addr & 0x3FFF) as usize,
        _ => hi_bank as usize * 0x4000 + (addr & 0x3FFF) as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::{CpuMapped, Mapper, Mirror, Nrom};

    #[test]
    fn nrom_32k_prg_maps_directly() {
        let mut nrom = Nrom::new(2, 1);
        assert_eq!(nrom.cpu_map_read(0x8000), Some(CpuMapped::Offset(0)));
        assert_eq!(nrom.cpu_map_read(0xFFFF), Some(CpuMapped::Offset(0x7FFF)));
        assert!(!nrom.is_nrom_128());
    }

    #[test]
    fn nrom_16k_prg_mirrors_upper_half() {
        let mut nrom = Nrom::new(1, 1);
        assert_eq!(nrom.cpu_map_read(0x8000), Some(CpuMapped::Offset(0)));
        // $C000-$FFFF mirrors the single bank
        assert_eq!(nrom.cpu_map_read(0xC000), Some(CpuMapped::Offset(0)));
        assert_eq!(nrom.cpu_map_read(0xFFFF), Some(CpuMapped::Offset(0x3FFF)));
    }

    #[test]
    fn prg_stores_are_claimed_but_not_applied() {
        let mut nrom = Nrom::new(1, 1);
        assert_eq!(nrom.cpu_map_write(0x8000, 0xAA), Some(CpuMapped::Handled));
        assert_eq!(nrom.cpu_map_write(0xFFFF, 0xAA), Some(CpuMapped::Handled));
        assert_eq!(nrom.cpu_map_write(0x6000, 0xAA), None);
    }

    #[test]
    fn addresses_below_prg_are_not_claimed() {
        let mut nrom = Nrom::new(1, 1);
        assert_eq!(nrom.cpu_map_read(0x6000), None);
        assert_eq!(nrom.cpu_map_read(0x0000), None);
        assert_eq!(nrom.ppu_map_read(0x2000), None);
    }

    #[test]
    fn chr_rom_rejects_writes_chr_ram_accepts() {
        let mut rom = Nrom::new(1, 1);
        assert_eq!(rom.ppu_map_write(0x0010), None);
        let mut ram = Nrom::new(1, 0);
        assert_eq!(ram.ppu_map_write(0x0010), Some(0x0010));
    }

    #[test]
    fn defaults_are_inert() {
        let mut nrom = Nrom::new(1, 1);
        assert_eq!(nrom.mirror(), Mirror::Hardware);
        assert!(!nrom.irq_state());
        nrom.scanline();
        nrom.irq_clear();
        assert!(!nrom.irq_state());
    }
}
