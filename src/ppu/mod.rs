/*!
Picture processing unit.

Overview
========
- Dot-based 2C02 model: 262 scanlines (-1 pre-render, 0..=239 visible, 240 post-render,
  241..=260 vertical blank) of 341 dots each, one call to `clock` per dot.
- Background rendering runs the loopy `v`/`t` scroll pipeline with 16-bit pattern and
  attribute shifters; sprites are evaluated per scanline into at most 8 line entries with
  their own shifters.
- Output is a 256x240 RGBA frame buffer written one pixel per visible dot.

Submodules
==========
- `registers`: PPUCTRL/PPUMASK/PPUSTATUS flags, the loopy register and $2000-$2007 semantics.
- `memory`: the PPU address space (pattern, nametables with mirroring, palette).
- `fetch`: background tile fetches, scroll increments and shifter management.
- `sprite`: OAM evaluation and sprite pattern fetch for the next scanline.
- `renderer`: per-dot pixel composition, priority and sprite-zero hit.
- `debug`: pattern table and nametable views.

The PPU never owns the cartridge. Every method that touches pattern memory or needs the
mirroring mode takes a `PpuBus` from the caller, which lets the Bus lend the cartridge for
the duration of one call.
*/

mod debug;
mod fetch;
mod memory;
pub mod registers;
mod renderer;
mod sprite;

use crate::ppu_bus::PpuBus;
pub use registers::{Control, Loopy, Mask, PpuStatus};
use sprite::SpriteLine;

/// Screen width in pixels.
pub const NES_WIDTH: usize = 256;
/// Screen height in pixels.
pub const NES_HEIGHT: usize = 240;
/// RGBA bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Dots per scanline.
pub const DOTS_PER_SCANLINE: i16 = 341;
/// Last scanline before wrapping to the pre-render line.
pub const LAST_SCANLINE: i16 = 260;
/// Scanline on which vertical blank begins.
pub const VBLANK_SCANLINE: i16 = 241;

/// 2C02 master palette (RGB). Alpha is always 0xFF when rendered.
#[rustfmt::skip]
pub const NES_PALETTE: [[u8; 3]; 64] = [
    [84, 84, 84],    [0, 30, 116],    [8, 16, 144],    [48, 0, 136],
    [68, 0, 100],    [92, 0, 48],     [84, 4, 0],      [60, 24, 0],
    [32, 42, 0],     [8, 58, 0],      [0, 64, 0],      [0, 60, 0],
    [0, 50, 60],     [0, 0, 0],       [0, 0, 0],       [0, 0, 0],

    [152, 150, 152], [8, 76, 196],    [48, 50, 236],   [92, 30, 228],
    [136, 20, 176],  [160, 20, 100],  [152, 34, 32],   [120, 60, 0],
    [84, 90, 0],     [40, 114, 0],    [8, 124, 0],     [0, 118, 40],
    [0, 102, 120],   [0, 0, 0],       [0, 0, 0],       [0, 0, 0],

    [236, 238, 236], [76, 154, 236],  [120, 124, 236], [176, 98, 236],
    [228, 84, 236],  [236, 88, 180],  [236, 106, 100], [212, 136, 32],
    [160, 170, 0],   [116, 196, 0],   [76, 208, 32],   [56, 204, 108],
    [56, 180, 204],  [60, 60, 60],    [0, 0, 0],       [0, 0, 0],

    [236, 238, 236], [168, 204, 236], [188, 188, 236], [212, 178, 236],
    [236, 174, 236], [236, 174, 212], [236, 180, 176], [228, 196, 144],
    [204, 210, 120], [180, 222, 120], [168, 226, 144], [152, 226, 180],
    [160, 214, 228], [160, 162, 160], [0, 0, 0],       [0, 0, 0],
];

/// Background fetch latches and shift registers.
#[derive(Debug, Clone, Default)]
struct Background {
    next_tile_id: u8,
    next_tile_attrib: u8,
    next_tile_lsb: u8,
    next_tile_msb: u8,
    shifter_pattern_lo: u16,
    shifter_pattern_hi: u16,
    shifter_attrib_lo: u16,
    shifter_attrib_hi: u16,
}

#[derive(Debug, Clone)]
pub struct Ppu {
    control: Control,
    mask: Mask,
    status: PpuStatus,

    vram_addr: Loopy,
    tram_addr: Loopy,
    fine_x: u8,
    address_latch: bool,
    data_buffer: u8,

    oam_addr: u8,
    oam: [u8; 256],

    nametables: [[u8; 1024]; 2],
    palette: [u8; 32],
    /// Pattern memory used when no cartridge claims $0000-$1FFF.
    pattern: [[u8; 4096]; 2],

    bg: Background,
    sprites: SpriteLine,

    scanline: i16,
    cycle: i16,
    odd_frame: bool,
    frame_complete: bool,
    frame_count: u64,

    /// Set at the start of vertical blank when NMI generation is enabled. The Bus clears it
    /// once the CPU has been signalled.
    pub nmi: bool,

    frame: Vec<u8>,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    pub fn new() -> Self {
        Self {
            control: Control::empty(),
            mask: Mask::empty(),
            status: PpuStatus::empty(),
            vram_addr: Loopy::default(),
            tram_addr: Loopy::default(),
            fine_x: 0,
            address_latch: false,
            data_buffer: 0,
            oam_addr: 0,
            oam: [0; 256],
            nametables: [[0; 1024]; 2],
            palette: [0; 32],
            pattern: [[0; 4096]; 2],
            bg: Background::default(),
            sprites: SpriteLine::default(),
            scanline: 0,
            cycle: 0,
            odd_frame: false,
            frame_complete: false,
            frame_count: 0,
            nmi: false,
            frame: vec![0; NES_WIDTH * NES_HEIGHT * BYTES_PER_PIXEL],
        }
    }

    /// Power-up/reset state. Memory contents (nametables, palette, OAM) are preserved.
    pub fn reset(&mut self) {
        self.control = Control::empty();
        self.mask = Mask::empty();
        self.status = PpuStatus::empty();
        self.vram_addr = Loopy::default();
        self.tram_addr = Loopy::default();
        self.fine_x = 0;
        self.address_latch = false;
        self.data_buffer = 0;
        self.oam_addr = 0;
        self.bg = Background::default();
        self.sprites = SpriteLine::default();
        self.scanline = 0;
        self.cycle = 0;
        self.odd_frame = false;
        self.frame_complete = false;
        self.nmi = false;
    }

    /// Advance one dot.
    pub fn clock(&mut self, bus: &mut impl PpuBus) {
        if self.scanline >= -1 && self.scanline < 240 {
            self.render_line_dot(bus);
        }

        if self.scanline == VBLANK_SCANLINE && self.cycle == 1 {
            self.status.insert(PpuStatus::VERTICAL_BLANK);
            if self.control.contains(Control::ENABLE_NMI) {
                self.nmi = true;
            }
        }

        self.compose_pixel(&*bus);

        self.cycle += 1;
        if self.cycle >= DOTS_PER_SCANLINE {
            self.cycle = 0;
            self.scanline += 1;
            if self.scanline > LAST_SCANLINE {
                self.scanline = -1;
                self.frame_complete = true;
                self.frame_count += 1;
                self.odd_frame = !self.odd_frame;
            }
        }
    }

    /// Work done on the pre-render and visible scanlines.
    fn render_line_dot(&mut self, bus: &mut impl PpuBus) {
        // Odd frames drop the first idle dot of scanline 0 while rendering.
        if self.scanline == 0 && self.cycle == 0 && self.odd_frame && self.mask.rendering() {
            self.cycle = 1;
        }

        if self.scanline == -1 && self.cycle == 1 {
            self.status.remove(
                PpuStatus::VERTICAL_BLANK
                    | PpuStatus::SPRITE_OVERFLOW
                    | PpuStatus::SPRITE_ZERO_HIT,
            );
            self.sprites = SpriteLine::default();
        }

        if (2..258).contains(&self.cycle) || (321..338).contains(&self.cycle) {
            self.update_shifters();
            self.background_fetch(&*bus);
        }

        if self.cycle == 256 {
            self.increment_scroll_y();
        }

        if self.cycle == 257 {
            self.load_background_shifters();
            self.transfer_address_x();
            if self.scanline >= 0 {
                self.evaluate_sprites();
            }
        }

        if self.cycle == 338 || self.cycle == 340 {
            let addr = 0x2000 | (self.vram_addr.raw() & 0x0FFF);
            self.bg.next_tile_id = self.ppu_read(&*bus, addr);
        }

        if self.cycle == 340 {
            self.fetch_sprite_patterns(&*bus);
        }

        if self.scanline == -1 && (280..305).contains(&self.cycle) {
            self.transfer_address_y();
        }

        if self.cycle == 260 && self.mask.rendering() {
            bus.scanline();
        }
    }

    /// RGBA frame, 256x240, row-major.
    pub fn frame_buffer(&self) -> &[u8] {
        &self.frame
    }

    /// True once per frame, when the dot counter wraps to the pre-render line.
    pub fn frame_complete(&self) -> bool {
        self.frame_complete
    }

    /// Read and clear the frame-complete flag.
    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn scanline(&self) -> i16 {
        self.scanline
    }

    pub fn cycle(&self) -> i16 {
        self.cycle
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn mask(&self) -> Mask {
        self.mask
    }

    pub fn status(&self) -> PpuStatus {
        self.status
    }

    /// Store one byte of OAM (DMA path). The OAM address register is unaffected.
    #[inline]
    pub fn write_oam(&mut self, index: u8, data: u8) {
        self.oam[index as usize] = data;
    }

    pub fn oam(&self) -> &[u8; 256] {
        &self.oam
    }
}
