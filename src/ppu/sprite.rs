#![doc = r#"
PPU sprite helpers

Responsibilities
- Evaluate OAM at dot 257 of each visible scanline: collect up to 8 sprites covering the
  line, raise PPUSTATUS overflow when a ninth one qualifies, and note whether sprite 0 is
  among them.
- Fetch the pattern rows of the collected sprites at dot 340 (8x8 and 8x16 modes, both
  flips) into per-slot shift registers.
- Count down each slot's X position and shift its pattern out once it reaches zero.

Notes
- OAM bytes per sprite: Y, tile index, attributes, X.
- Attributes: bit 7 vertical flip, bit 6 horizontal flip, bit 5 behind background,
  bits 1..0 palette (sprite palettes are 4..=7).
"#]

use super::{Ppu, PpuStatus};
use crate::ppu_bus::PpuBus;

/// Maximum sprites drawn on one scanline.
pub const SPRITES_PER_LINE: usize = 8;

pub(super) const ATTR_FLIP_V: u8 = 0x80;
pub(super) const ATTR_FLIP_H: u8 = 0x40;
pub(super) const ATTR_BEHIND: u8 = 0x20;

/// One OAM entry copied into the scanline buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct SpriteEntry {
    pub y: u8,
    pub id: u8,
    pub attr: u8,
    pub x: u8,
}

impl SpriteEntry {
    const EMPTY: SpriteEntry = SpriteEntry {
        y: 0xFF,
        id: 0xFF,
        attr: 0xFF,
        x: 0xFF,
    };

    fn from_oam(bytes: &[u8]) -> Self {
        Self {
            y: bytes[0],
            id: bytes[1],
            attr: bytes[2],
            x: bytes[3],
        }
    }
}

/// Sprites selected for the line being drawn, with their shifters.
#[derive(Debug, Clone)]
pub(super) struct SpriteLine {
    pub entries: [SpriteEntry; SPRITES_PER_LINE],
    pub count: usize,
    pub pattern_lo: [u8; SPRITES_PER_LINE],
    pub pattern_hi: [u8; SPRITES_PER_LINE],
    pub zero_hit_possible: bool,
    pub zero_being_rendered: bool,
}

impl Default for SpriteLine {
    fn default() -> Self {
        Self {
            entries: [SpriteEntry::EMPTY; SPRITES_PER_LINE],
            count: 0,
            pattern_lo: [0; SPRITES_PER_LINE],
            pattern_hi: [0; SPRITES_PER_LINE],
            zero_hit_possible: false,
            zero_being_rendered: false,
        }
    }
}

impl SpriteLine {
    pub fn clear_shifters(&mut self) {
        self.pattern_lo = [0; SPRITES_PER_LINE];
        self.pattern_hi = [0; SPRITES_PER_LINE];
    }

    /// One dot of horizontal progress.
    pub fn shift(&mut self) {
        for i in 0..self.count {
            let entry = &mut self.entries[i];
            if entry.x > 0 {
                entry.x -= 1;
            } else {
                self.pattern_lo[i] <<= 1;
                self.pattern_hi[i] <<= 1;
            }
        }
    }
}

impl Ppu {
    /// Select the sprites for the next line from OAM.
    pub(super) fn evaluate_sprites(&mut self) {
        let height = self.control.sprite_height();
        let line = &mut self.sprites;

        line.entries = [SpriteEntry::EMPTY; SPRITES_PER_LINE];
        line.count = 0;
        line.clear_shifters();
        line.zero_hit_possible = false;

        for (n, bytes) in self.oam.chunks_exact(4).enumerate() {
            let diff = self.scanline - bytes[0] as i16;
            if !(0..height).contains(&diff) {
                continue;
            }
            if line.count == SPRITES_PER_LINE {
                self.status.insert(PpuStatus::SPRITE_OVERFLOW);
                break;
            }
            if n == 0 {
                line.zero_hit_possible = true;
            }
            line.entries[line.count] = SpriteEntry::from_oam(bytes);
            line.count += 1;
        }
    }

    /// Load pattern rows for every selected sprite.
    pub(super) fn fetch_sprite_patterns(&mut self, bus: &impl PpuBus) {
        for i in 0..self.sprites.count {
            let entry = self.sprites.entries[i];
            let addr = self.sprite_row_addr(entry);

            let mut lo = self.ppu_read(bus, addr);
            let mut hi = self.ppu_read(bus, addr + 8);
            if entry.attr & ATTR_FLIP_H != 0 {
                lo = lo.reverse_bits();
                hi = hi.reverse_bits();
            }
            self.sprites.pattern_lo[i] = lo;
            self.sprites.pattern_hi[i] = hi;
        }
    }

    fn sprite_row_addr(&self, entry: SpriteEntry) -> u16 {
        let diff = (self.scanline - entry.y as i16) as u16 & 0x0F;
        let flip_v = entry.attr & ATTR_FLIP_V != 0;

        if self.control.sprite_height() == 8 {
            let row = if flip_v { 7 - (diff & 0x07) } else { diff & 0x07 };
            return self.control.sprite_table() | ((entry.id as u16) << 4) | row;
        }

        // 8x16: bit 0 of the tile index picks the table, the pair starts at the even tile.
        let table = ((entry.id & 0x01) as u16) << 12;
        let top = (entry.id & 0xFE) as u16;
        let upper_half = diff < 8;
        let tile = if upper_half != flip_v { top } else { top + 1 };
        let row = if flip_v { 7 - (diff & 0x07) } else { diff & 0x07 };
        table | (tile << 4) | row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::Mirror;
    use crate::ppu::Control;
    use crate::ppu_bus::mock::MockPpuBus;

    fn place(ppu: &mut Ppu, n: usize, y: u8, id: u8, attr: u8, x: u8) {
        ppu.oam[n * 4..n * 4 + 4].copy_from_slice(&[y, id, attr, x]);
    }

    fn hide_all(ppu: &mut Ppu) {
        ppu.oam = [0xFF; 256];
    }

    #[test]
    fn eight_sprites_fit_without_overflow() {
        let mut ppu = Ppu::new();
        hide_all(&mut ppu);
        for n in 0..8 {
            place(&mut ppu, n, 20, n as u8, 0, 0);
        }
        ppu.scanline = 25;
        ppu.evaluate_sprites();
        assert_eq!(ppu.sprites.count, 8);
        assert!(!ppu.status.contains(PpuStatus::SPRITE_OVERFLOW));
        assert!(ppu.sprites.zero_hit_possible);
    }

    #[test]
    fn ninth_sprite_sets_overflow() {
        let mut ppu = Ppu::new();
        hide_all(&mut ppu);
        for n in 1..10 {
            place(&mut ppu, n, 20, n as u8, 0, 0);
        }
        ppu.scanline = 20;
        ppu.evaluate_sprites();
        assert_eq!(ppu.sprites.count, 8);
        assert!(ppu.status.contains(PpuStatus::SPRITE_OVERFLOW));
        assert!(!ppu.sprites.zero_hit_possible);
        // First eight in OAM order
        assert_eq!(ppu.sprites.entries[0].id, 1);
        assert_eq!(ppu.sprites.entries[7].id, 8);
    }

    #[test]
    fn tall_sprites_cover_sixteen_lines() {
        let mut ppu = Ppu::new();
        hide_all(&mut ppu);
        place(&mut ppu, 0, 100, 0, 0, 0);
        ppu.scanline = 112;
        ppu.evaluate_sprites();
        assert_eq!(ppu.sprites.count, 0);

        ppu.control = Control::SPRITE_SIZE;
        ppu.evaluate_sprites();
        assert_eq!(ppu.sprites.count, 1);
    }

    #[test]
    fn pattern_fetch_applies_flips() {
        let mut ppu = Ppu::new();
        let mut bus = MockPpuBus::new(Mirror::Vertical);
        hide_all(&mut ppu);
        // Tile 2, rows 1 and 6
        bus.pattern[0x20 + 1] = 0b1000_0001;
        bus.pattern[0x20 + 6] = 0b1100_0000;
        bus.pattern[0x20 + 6 + 8] = 0b0000_0011;

        place(&mut ppu, 0, 10, 2, 0, 0);
        place(&mut ppu, 1, 10, 2, ATTR_FLIP_V | ATTR_FLIP_H, 0);
        ppu.scanline = 11;
        ppu.evaluate_sprites();
        ppu.fetch_sprite_patterns(&bus);

        assert_eq!(ppu.sprites.pattern_lo[0], 0b1000_0001);
        assert_eq!(ppu.sprites.pattern_lo[1], 0b0000_0011);
        assert_eq!(ppu.sprites.pattern_hi[1], 0b1100_0000);
    }

    #[test]
    fn tall_sprite_halves_and_table_select() {
        let mut ppu = Ppu::new();
        ppu.control = Control::SPRITE_SIZE;
        let entry = SpriteEntry {
            y: 50,
            id: 0x05,
            attr: 0,
            x: 0,
        };

        ppu.scanline = 53;
        assert_eq!(ppu.sprite_row_addr(entry), 0x1000 | (0x04 << 4) | 3);
        ppu.scanline = 61;
        assert_eq!(ppu.sprite_row_addr(entry), 0x1000 | (0x05 << 4) | 3);

        let flipped = SpriteEntry {
            attr: ATTR_FLIP_V,
            ..entry
        };
        ppu.scanline = 50;
        assert_eq!(ppu.sprite_row_addr(flipped), 0x1000 | (0x05 << 4) | 7);
        ppu.scanline = 65;
        assert_eq!(ppu.sprite_row_addr(flipped), 0x1000 | (0x04 << 4));
    }

    #[test]
    fn shifters_wait_for_x_counter() {
        let mut line = SpriteLine::default();
        line.count = 1;
        line.entries[0].x = 2;
        line.pattern_lo[0] = 0b0100_0000;
        line.shift();
        line.shift();
        assert_eq!(line.pattern_lo[0], 0b0100_0000);
        line.shift();
        assert_eq!(line.pattern_lo[0], 0b1000_0000);
    }
}
