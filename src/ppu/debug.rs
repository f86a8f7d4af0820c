//! Debug views of PPU memory for tools and tests.

use super::{BYTES_PER_PIXEL, Ppu};
use crate::ppu_bus::PpuBus;

/// Width and height of a rendered pattern table.
pub const PATTERN_TABLE_SIZE: usize = 128;

impl Ppu {
    /// Render pattern table `table` (0 or 1) as 128x128 RGBA using palette `palette`.
    ///
    /// Tiles are laid out 16x16 in index order, the way they sit in memory.
    pub fn pattern_table(&self, bus: &impl PpuBus, table: u8, palette: u8) -> Vec<u8> {
        let mut out = vec![0u8; PATTERN_TABLE_SIZE * PATTERN_TABLE_SIZE * BYTES_PER_PIXEL];
        let base = ((table & 0x01) as u16) << 12;

        for tile_y in 0..16u16 {
            for tile_x in 0..16u16 {
                let offset = tile_y * 256 + tile_x * 16;
                for row in 0..8u16 {
                    let mut lsb = self.ppu_read(bus, base + offset + row);
                    let mut msb = self.ppu_read(bus, base + offset + row + 8);
                    for col in 0..8u16 {
                        let pixel = ((msb & 0x01) << 1) | (lsb & 0x01);
                        lsb >>= 1;
                        msb >>= 1;

                        let x = (tile_x * 8 + (7 - col)) as usize;
                        let y = (tile_y * 8 + row) as usize;
                        let at = (y * PATTERN_TABLE_SIZE + x) * BYTES_PER_PIXEL;
                        out[at..at + BYTES_PER_PIXEL]
                            .copy_from_slice(&self.palette_colour(bus, palette, pixel));
                    }
                }
            }
        }
        out
    }

    /// Raw contents of physical nametable `index` (0 or 1).
    pub fn nametable(&self, index: usize) -> &[u8; 1024] {
        &self.nametables[index & 0x01]
    }
}
