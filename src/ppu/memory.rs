#![doc = r#"
PPU memory submodule

Responsibilities
- The 14-bit PPU address space as seen from the PPU side:
  * $0000-$1FFF pattern tables (cartridge CHR, with an internal fallback)
  * $2000-$3EFF nametables, folded onto 2 KiB of internal RAM by the mirroring mode
  * $3F00-$3FFF palette RAM (32 bytes, mirrored)

Notes
- The cartridge gets the first claim on every address.
- Palette entries $10/$14/$18/$1C alias $00/$04/$08/$0C.
- Palette reads are masked with $30 in grayscale mode.
"#]

use super::{Mask, Ppu};
use crate::mapper::Mirror;
use crate::ppu_bus::PpuBus;

/// Index of the physical 1 KiB nametable backing `addr` (already masked to $000-$FFF).
#[inline]
fn nametable_slot(mirror: Mirror, addr: u16) -> usize {
    let quadrant = (addr >> 10) & 0x03;
    match mirror {
        Mirror::Vertical => (quadrant & 0x01) as usize,
        // Hardware never reaches here through a cartridge; treat it as horizontal.
        Mirror::Horizontal | Mirror::Hardware => (quadrant >> 1) as usize,
        Mirror::OneScreenLo => 0,
        Mirror::OneScreenHi => 1,
    }
}

#[inline]
fn palette_index(addr: u16) -> usize {
    let mut index = addr & 0x001F;
    if index & 0x0013 == 0x0010 {
        index &= !0x0010;
    }
    index as usize
}

impl Ppu {
    pub fn ppu_read(&self, bus: &impl PpuBus, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;

        if let Some(data) = bus.ppu_read(addr) {
            return data;
        }

        match addr {
            0x0000..=0x1FFF => {
                self.pattern[((addr & 0x1000) >> 12) as usize][(addr & 0x0FFF) as usize]
            }
            0x2000..=0x3EFF => {
                let a = addr & 0x0FFF;
                self.nametables[nametable_slot(bus.mirror(), a)][(a & 0x03FF) as usize]
            }
            _ => {
                let mask = if self.mask.contains(Mask::GRAYSCALE) { 0x30 } else { 0x3F };
                self.palette[palette_index(addr)] & mask
            }
        }
    }

    pub fn ppu_write(&mut self, bus: &mut impl PpuBus, addr: u16, data: u8) {
        let addr = addr & 0x3FFF;

        if bus.ppu_write(addr, data) {
            return;
        }

        match addr {
            0x0000..=0x1FFF => {
                self.pattern[((addr & 0x1000) >> 12) as usize][(addr & 0x0FFF) as usize] = data;
            }
            0x2000..=0x3EFF => {
                let a = addr & 0x0FFF;
                let slot = nametable_slot(bus.mirror(), a);
                self.nametables[slot][(a & 0x03FF) as usize] = data;
            }
            _ => self.palette[palette_index(addr)] = data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppu_bus::mock::MockPpuBus;

    #[test]
    fn vertical_mirroring_pairs_left_and_right() {
        let mut ppu = Ppu::new();
        let mut bus = MockPpuBus::new(Mirror::Vertical);
        ppu.ppu_write(&mut bus, 0x2005, 0x11);
        ppu.ppu_write(&mut bus, 0x2405, 0x22);
        assert_eq!(ppu.ppu_read(&bus, 0x2805), 0x11);
        assert_eq!(ppu.ppu_read(&bus, 0x2C05), 0x22);
    }

    #[test]
    fn horizontal_mirroring_pairs_top_and_bottom() {
        let mut ppu = Ppu::new();
        let mut bus = MockPpuBus::new(Mirror::Horizontal);
        ppu.ppu_write(&mut bus, 0x2005, 0x11);
        ppu.ppu_write(&mut bus, 0x2805, 0x22);
        assert_eq!(ppu.ppu_read(&bus, 0x2405), 0x11);
        assert_eq!(ppu.ppu_read(&bus, 0x2C05), 0x22);
    }

    #[test]
    fn one_screen_modes_select_a_single_table() {
        let mut ppu = Ppu::new();
        let mut lo = MockPpuBus::new(Mirror::OneScreenLo);
        ppu.ppu_write(&mut lo, 0x2C00, 0x7E);
        for base in [0x2000, 0x2400, 0x2800] {
            assert_eq!(ppu.ppu_read(&lo, base), 0x7E);
        }
        let hi = MockPpuBus::new(Mirror::OneScreenHi);
        assert_eq!(ppu.ppu_read(&hi, 0x2000), 0x00);
        assert_eq!(ppu.nametables[0][0], 0x7E);
    }

    #[test]
    fn region_3000_mirrors_2000() {
        let mut ppu = Ppu::new();
        let mut bus = MockPpuBus::new(Mirror::Vertical);
        ppu.ppu_write(&mut bus, 0x3123, 0x5A);
        assert_eq!(ppu.ppu_read(&bus, 0x2123), 0x5A);
    }

    #[test]
    fn palette_backdrop_aliases() {
        let mut ppu = Ppu::new();
        let mut bus = MockPpuBus::new(Mirror::Vertical);
        ppu.ppu_write(&mut bus, 0x3F10, 0x0F);
        ppu.ppu_write(&mut bus, 0x3F14, 0x14);
        ppu.ppu_write(&mut bus, 0x3F11, 0x21);
        assert_eq!(ppu.ppu_read(&bus, 0x3F00), 0x0F);
        assert_eq!(ppu.ppu_read(&bus, 0x3F04), 0x14);
        // $3F11 is a real sprite entry
        assert_eq!(ppu.ppu_read(&bus, 0x3F01), 0x00);
        assert_eq!(ppu.ppu_read(&bus, 0x3F31), 0x21);
    }

    #[test]
    fn grayscale_masks_palette_reads() {
        let mut ppu = Ppu::new();
        let mut bus = MockPpuBus::new(Mirror::Vertical);
        ppu.ppu_write(&mut bus, 0x3F02, 0x2D);
        ppu.mask = Mask::GRAYSCALE;
        assert_eq!(ppu.ppu_read(&bus, 0x3F02), 0x20);
    }

    #[test]
    fn cartridge_claims_pattern_space() {
        let mut ppu = Ppu::new();
        let mut bus = MockPpuBus::new(Mirror::Vertical);
        ppu.ppu_write(&mut bus, 0x1234, 0x99);
        assert_eq!(bus.pattern[0x1234], 0x99);
        assert_eq!(ppu.pattern[1][0x234], 0x00);
        assert_eq!(ppu.ppu_read(&bus, 0x5234), 0x99);
    }
}
