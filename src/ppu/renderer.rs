#![doc = r#"
PPU renderer module

Responsibilities
- Produce the pixel for the current dot from the background and sprite shifters.
- Resolve background/sprite priority and raise the sprite-zero hit flag.
- Convert the final palette entry to RGBA and store it in the frame buffer.

Priority
- bg 0 / fg 0: backdrop ($3F00)
- bg 0 / fg n: sprite
- bg n / fg 0: background
- both opaque: sprite unless its "behind background" bit is set
"#]

use super::sprite::ATTR_BEHIND;
use super::{BYTES_PER_PIXEL, Mask, NES_HEIGHT, NES_PALETTE, NES_WIDTH, Ppu, PpuStatus};
use crate::ppu_bus::PpuBus;

impl Ppu {
    /// RGBA for palette `palette` (0..=7), entry `pixel` (0..=3).
    pub fn palette_colour(&self, bus: &impl PpuBus, palette: u8, pixel: u8) -> [u8; 4] {
        let addr = 0x3F00 + ((palette as u16) << 2) + pixel as u16;
        let [r, g, b] = NES_PALETTE[(self.ppu_read(bus, addr) & 0x3F) as usize];
        [r, g, b, 0xFF]
    }

    fn background_pixel(&self) -> (u8, u8) {
        if !self.mask.contains(Mask::RENDER_BACKGROUND) {
            return (0, 0);
        }
        let mux = 0x8000u16 >> self.fine_x;
        let bit = |shifter: u16| (shifter & mux != 0) as u8;

        let pixel = (bit(self.bg.shifter_pattern_hi) << 1) | bit(self.bg.shifter_pattern_lo);
        let palette = (bit(self.bg.shifter_attrib_hi) << 1) | bit(self.bg.shifter_attrib_lo);
        (pixel, palette)
    }

    /// First opaque sprite pixel among the active slots: (pixel, palette, in front).
    fn foreground_pixel(&mut self) -> (u8, u8, bool) {
        self.sprites.zero_being_rendered = false;
        if !self.mask.contains(Mask::RENDER_SPRITES) {
            return (0, 0, false);
        }

        let line = &mut self.sprites;
        for i in 0..line.count {
            let entry = line.entries[i];
            if entry.x != 0 {
                continue;
            }
            let lo = (line.pattern_lo[i] & 0x80 != 0) as u8;
            let hi = (line.pattern_hi[i] & 0x80 != 0) as u8;
            let pixel = (hi << 1) | lo;
            if pixel != 0 {
                if i == 0 {
                    line.zero_being_rendered = true;
                }
                let palette = (entry.attr & 0x03) + 0x04;
                return (pixel, palette, entry.attr & ATTR_BEHIND == 0);
            }
        }
        (0, 0, false)
    }

    /// Compose and store the pixel for the current dot.
    pub(super) fn compose_pixel(&mut self, bus: &impl PpuBus) {
        let (bg_pixel, bg_palette) = self.background_pixel();
        let (fg_pixel, fg_palette, fg_in_front) = self.foreground_pixel();

        let (pixel, palette) = match (bg_pixel, fg_pixel) {
            (0, 0) => (0, 0),
            (0, _) => (fg_pixel, fg_palette),
            (_, 0) => (bg_pixel, bg_palette),
            _ => {
                self.check_sprite_zero_hit();
                if fg_in_front {
                    (fg_pixel, fg_palette)
                } else {
                    (bg_pixel, bg_palette)
                }
            }
        };

        let x = self.cycle - 1;
        let y = self.scanline;
        if (0..NES_WIDTH as i16).contains(&x) && (0..NES_HEIGHT as i16).contains(&y) {
            let colour = self.palette_colour(bus, palette, pixel);
            let offset = (y as usize * NES_WIDTH + x as usize) * BYTES_PER_PIXEL;
            self.frame[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&colour);
        }
    }

    /// Both pixels are opaque here.
    fn check_sprite_zero_hit(&mut self) {
        if !(self.sprites.zero_hit_possible && self.sprites.zero_being_rendered) {
            return;
        }
        if !self
            .mask
            .contains(Mask::RENDER_BACKGROUND | Mask::RENDER_SPRITES)
        {
            return;
        }
        // Hits in the left 8 pixels only count when both layers draw there.
        let left_shown = self
            .mask
            .contains(Mask::RENDER_BACKGROUND_LEFT | Mask::RENDER_SPRITES_LEFT);
        let first = if left_shown { 1 } else { 9 };
        if (first..258).contains(&self.cycle) {
            self.status.insert(PpuStatus::SPRITE_ZERO_HIT);
        }
    }
}
