//! Background fetch pipeline: tile/attribute/pattern fetches every 8 dots, scroll
//! increments and the 16-bit shift registers that feed the pixel mux.

use super::{Mask, Ppu};
use crate::ppu_bus::PpuBus;

impl Ppu {
    /// One step of the 8-dot fetch cycle. Called on dots 2..=257 and 321..=337.
    pub(super) fn background_fetch(&mut self, bus: &impl PpuBus) {
        let v = self.vram_addr;
        match (self.cycle - 1) % 8 {
            0 => {
                self.load_background_shifters();
                self.bg.next_tile_id = self.ppu_read(bus, 0x2000 | (v.raw() & 0x0FFF));
            }
            2 => {
                let addr = 0x23C0
                    | (v.nametable_y() << 11)
                    | (v.nametable_x() << 10)
                    | ((v.coarse_y() >> 2) << 3)
                    | (v.coarse_x() >> 2);
                let mut attrib = self.ppu_read(bus, addr);
                if v.coarse_y() & 0x02 != 0 {
                    attrib >>= 4;
                }
                if v.coarse_x() & 0x02 != 0 {
                    attrib >>= 2;
                }
                self.bg.next_tile_attrib = attrib & 0x03;
            }
            4 => self.bg.next_tile_lsb = self.ppu_read(bus, self.tile_row_addr()),
            6 => self.bg.next_tile_msb = self.ppu_read(bus, self.tile_row_addr() + 8),
            7 => self.increment_scroll_x(),
            _ => {}
        }
    }

    #[inline]
    fn tile_row_addr(&self) -> u16 {
        self.control.background_table()
            + ((self.bg.next_tile_id as u16) << 4)
            + self.vram_addr.fine_y()
    }

    pub(super) fn increment_scroll_x(&mut self) {
        if !self.mask.rendering() {
            return;
        }
        let v = &mut self.vram_addr;
        if v.coarse_x() == 31 {
            v.set_coarse_x(0);
            v.set_nametable_x(v.nametable_x() ^ 1);
        } else {
            v.set_coarse_x(v.coarse_x() + 1);
        }
    }

    pub(super) fn increment_scroll_y(&mut self) {
        if !self.mask.rendering() {
            return;
        }
        let v = &mut self.vram_addr;
        if v.fine_y() < 7 {
            v.set_fine_y(v.fine_y() + 1);
            return;
        }
        v.set_fine_y(0);
        match v.coarse_y() {
            29 => {
                v.set_coarse_y(0);
                v.set_nametable_y(v.nametable_y() ^ 1);
            }
            // Rows 30 and 31 hold attributes; scrolling into them wraps without a table switch.
            31 => v.set_coarse_y(0),
            y => v.set_coarse_y(y + 1),
        }
    }

    pub(super) fn transfer_address_x(&mut self) {
        if self.mask.rendering() {
            self.vram_addr.set_nametable_x(self.tram_addr.nametable_x());
            self.vram_addr.set_coarse_x(self.tram_addr.coarse_x());
        }
    }

    pub(super) fn transfer_address_y(&mut self) {
        if self.mask.rendering() {
            self.vram_addr.set_fine_y(self.tram_addr.fine_y());
            self.vram_addr.set_nametable_y(self.tram_addr.nametable_y());
            self.vram_addr.set_coarse_y(self.tram_addr.coarse_y());
        }
    }

    /// Move the latched tile into the low byte of each shifter.
    pub(super) fn load_background_shifters(&mut self) {
        let bg = &mut self.bg;
        bg.shifter_pattern_lo = (bg.shifter_pattern_lo & 0xFF00) | bg.next_tile_lsb as u16;
        bg.shifter_pattern_hi = (bg.shifter_pattern_hi & 0xFF00) | bg.next_tile_msb as u16;

        let lo = if bg.next_tile_attrib & 0b01 != 0 { 0xFF } else { 0x00 };
        let hi = if bg.next_tile_attrib & 0b10 != 0 { 0xFF } else { 0x00 };
        bg.shifter_attrib_lo = (bg.shifter_attrib_lo & 0xFF00) | lo;
        bg.shifter_attrib_hi = (bg.shifter_attrib_hi & 0xFF00) | hi;
    }

    pub(super) fn update_shifters(&mut self) {
        if self.mask.contains(Mask::RENDER_BACKGROUND) {
            let bg = &mut self.bg;
            bg.shifter_pattern_lo <<= 1;
            bg.shifter_pattern_hi <<= 1;
            bg.shifter_attrib_lo <<= 1;
            bg.shifter_attrib_hi <<= 1;
        }

        if self.mask.contains(Mask::RENDER_SPRITES) && (1..258).contains(&self.cycle) {
            self.sprites.shift();
        }
    }
}
