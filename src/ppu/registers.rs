#![doc = r#"
PPU registers module

Purpose
- Bit layouts of PPUCTRL, PPUMASK and PPUSTATUS, and the 15-bit "loopy" scroll/address
  register shared by the current (`v`) and temporary (`t`) VRAM addresses.
- CPU-visible register semantics for $2000..=$2007: side effects, the shared write
  toggle, buffered PPUDATA reads and the 1/32 address increment.

Notes
- The bus masks the address to the 8-register window before calling in.
- Read-only accesses (debuggers, disassembly) return raw register values and never
  touch the vblank flag, the write toggle or the read buffer.
- Loopy layout: `yyy NN YYYYY XXXXX` = fine Y (14-12), nametable Y (11), nametable X (10),
  coarse Y (9-5), coarse X (4-0).
"#]

use bitflags::bitflags;

use super::Ppu;
use crate::ppu_bus::PpuBus;

bitflags! {
    /// $2000 PPUCTRL
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Control: u8 {
        const NAMETABLE_X = 0x01;
        const NAMETABLE_Y = 0x02;
        const INCREMENT_MODE = 0x04;
        const PATTERN_SPRITE = 0x08;
        const PATTERN_BACKGROUND = 0x10;
        const SPRITE_SIZE = 0x20;
        const SLAVE_MODE = 0x40;
        const ENABLE_NMI = 0x80;
    }
}

bitflags! {
    /// $2001 PPUMASK
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Mask: u8 {
        const GRAYSCALE = 0x01;
        const RENDER_BACKGROUND_LEFT = 0x02;
        const RENDER_SPRITES_LEFT = 0x04;
        const RENDER_BACKGROUND = 0x08;
        const RENDER_SPRITES = 0x10;
        const ENHANCE_RED = 0x20;
        const ENHANCE_GREEN = 0x40;
        const ENHANCE_BLUE = 0x80;
    }
}

bitflags! {
    /// $2002 PPUSTATUS. The low five bits are open bus.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuStatus: u8 {
        const SPRITE_OVERFLOW = 0x20;
        const SPRITE_ZERO_HIT = 0x40;
        const VERTICAL_BLANK = 0x80;
    }
}

impl Control {
    /// Sprite pattern table base ($0000 or $1000).
    #[inline]
    pub fn sprite_table(self) -> u16 {
        (self.contains(Control::PATTERN_SPRITE) as u16) << 12
    }

    /// Background pattern table base ($0000 or $1000).
    #[inline]
    pub fn background_table(self) -> u16 {
        (self.contains(Control::PATTERN_BACKGROUND) as u16) << 12
    }

    #[inline]
    pub fn sprite_height(self) -> i16 {
        if self.contains(Control::SPRITE_SIZE) { 16 } else { 8 }
    }

    #[inline]
    pub fn increment(self) -> u16 {
        if self.contains(Control::INCREMENT_MODE) { 32 } else { 1 }
    }
}

impl Mask {
    #[inline]
    pub fn rendering(self) -> bool {
        self.intersects(Mask::RENDER_BACKGROUND | Mask::RENDER_SPRITES)
    }
}

/// 15-bit scroll/address register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Loopy(u16);

impl Loopy {
    #[inline]
    pub fn new(raw: u16) -> Self {
        Self(raw & 0x7FFF)
    }

    #[inline]
    pub fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn set_raw(&mut self, raw: u16) {
        self.0 = raw & 0x7FFF;
    }

    #[inline]
    pub fn coarse_x(self) -> u16 {
        self.0 & 0x001F
    }

    #[inline]
    pub fn coarse_y(self) -> u16 {
        (self.0 >> 5) & 0x001F
    }

    #[inline]
    pub fn nametable_x(self) -> u16 {
        (self.0 >> 10) & 0x0001
    }

    #[inline]
    pub fn nametable_y(self) -> u16 {
        (self.0 >> 11) & 0x0001
    }

    #[inline]
    pub fn fine_y(self) -> u16 {
        (self.0 >> 12) & 0x0007
    }

    #[inline]
    fn set_field(&mut self, shift: u16, width_mask: u16, value: u16) {
        self.0 = (self.0 & !(width_mask << shift)) | ((value & width_mask) << shift);
    }

    pub fn set_coarse_x(&mut self, v: u16) {
        self.set_field(0, 0x1F, v);
    }

    pub fn set_coarse_y(&mut self, v: u16) {
        self.set_field(5, 0x1F, v);
    }

    pub fn set_nametable_x(&mut self, v: u16) {
        self.set_field(10, 0x01, v);
    }

    pub fn set_nametable_y(&mut self, v: u16) {
        self.set_field(11, 0x01, v);
    }

    pub fn set_fine_y(&mut self, v: u16) {
        self.set_field(12, 0x07, v);
    }

    /// Increment by 1 or 32, wrapping inside the 15-bit range.
    #[inline]
    pub fn advance(&mut self, by: u16) {
        self.0 = self.0.wrapping_add(by) & 0x7FFF;
    }
}

impl Ppu {
    /// CPU read of register `addr & 7`.
    pub fn cpu_read(&mut self, bus: &impl PpuBus, addr: u16, read_only: bool) -> u8 {
        if read_only {
            return match addr & 0x0007 {
                0x0000 => self.control.bits(),
                0x0001 => self.mask.bits(),
                0x0002 => self.status.bits(),
                _ => 0x00,
            };
        }

        match addr & 0x0007 {
            0x0002 => {
                let data = (self.status.bits() & 0xE0) | (self.data_buffer & 0x1F);
                self.status.remove(PpuStatus::VERTICAL_BLANK);
                self.address_latch = false;
                data
            }
            0x0004 => self.oam[self.oam_addr as usize],
            0x0007 => {
                let addr = self.vram_addr.raw();
                let mut data = self.data_buffer;
                self.data_buffer = self.ppu_read(bus, addr);
                // Palette reads bypass the buffer.
                if addr >= 0x3F00 {
                    data = self.data_buffer;
                }
                self.vram_addr.advance(self.control.increment());
                data
            }
            // Control, mask, OAM address, scroll and address are write-only.
            _ => 0x00,
        }
    }

    /// CPU write of register `addr & 7`.
    pub fn cpu_write(&mut self, bus: &mut impl PpuBus, addr: u16, data: u8) {
        match addr & 0x0007 {
            0x0000 => {
                self.control = Control::from_bits_retain(data);
                self.tram_addr
                    .set_nametable_x(self.control.contains(Control::NAMETABLE_X) as u16);
                self.tram_addr
                    .set_nametable_y(self.control.contains(Control::NAMETABLE_Y) as u16);
            }
            0x0001 => self.mask = Mask::from_bits_retain(data),
            0x0002 => {}
            0x0003 => self.oam_addr = data,
            0x0004 => {
                self.oam[self.oam_addr as usize] = data;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            0x0005 => {
                if !self.address_latch {
                    self.fine_x = data & 0x07;
                    self.tram_addr.set_coarse_x((data >> 3) as u16);
                } else {
                    self.tram_addr.set_fine_y((data & 0x07) as u16);
                    self.tram_addr.set_coarse_y((data >> 3) as u16);
                }
                self.address_latch = !self.address_latch;
            }
            0x0006 => {
                if !self.address_latch {
                    let raw = (((data & 0x3F) as u16) << 8) | (self.tram_addr.raw() & 0x00FF);
                    self.tram_addr.set_raw(raw);
                } else {
                    let raw = (self.tram_addr.raw() & 0xFF00) | data as u16;
                    self.tram_addr.set_raw(raw);
                    self.vram_addr = self.tram_addr;
                }
                self.address_latch = !self.address_latch;
            }
            _ => {
                self.ppu_write(bus, self.vram_addr.raw(), data);
                self.vram_addr.advance(self.control.increment());
            }
        }
    }
}
