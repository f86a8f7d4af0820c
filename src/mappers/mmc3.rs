/*!
MMC3 (Mapper 4)

Implemented:
- Bank select ($8000 even) / bank data ($8001 odd): eight bank registers R0..R7.
- PRG banking in 8 KiB units. Mode 0: R6 at $8000, second-last fixed at $C000. Mode 1 swaps
  those two windows. R7 always at $A000, last bank always at $E000.
- CHR banking in 1 KiB units: two 2 KiB banks (R0, R1) and four 1 KiB banks (R2..R5), with
  the 2/4 split swapped between pattern halves when inversion (bit 7) is set.
- Mirroring control ($A000 even: 0 = vertical, 1 = horizontal).
- Scanline IRQ: latch ($C000 even), counter clear ($C001 odd), disable + acknowledge
  ($E000 even), enable ($E001 odd). The PPU clocks `scanline()` once per rendered line.
- 8 KiB work RAM at $6000..=$7FFF.

Not modelled: PRG RAM protect ($A001), A12 edge filtering.
*/

use crate::mapper::{CpuMapped, Mapper, Mirror};

const WORK_RAM_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone)]
pub struct Mmc3 {
    prg_banks: u16,
    chr_banks: u16,

    target: u8,
    prg_mode: bool,
    chr_inversion: bool,
    mirror: Mirror,

    registers: [u32; 8],
    // Resolved window offsets (bytes) into CHR and PRG storage.
    chr_bank: [u32; 8],
    prg_bank: [u32; 4],

    irq_active: bool,
    irq_enabled: bool,
    irq_counter: u16,
    irq_reload: u16,

    work_ram: Vec<u8>,
}

impl Mmc3 {
    pub fn new(prg_banks: u16, chr_banks: u16) -> Self {
        let mut m = Self {
            prg_banks,
            chr_banks,
            target: 0,
            prg_mode: false,
            chr_inversion: false,
            mirror: Mirror::Horizontal,
            registers: [0; 8],
            chr_bank: [0; 8],
            prg_bank: [0; 4],
            irq_active: false,
            irq_enabled: false,
            irq_counter: 0,
            irq_reload: 0,
            work_ram: vec![0; WORK_RAM_SIZE],
        };
        m.reset();
        m
    }

    /// Number of 8 KiB PRG banks on the board.
    #[inline]
    fn prg_8k_count(&self) -> u32 {
        (self.prg_banks as u32 * 2).max(2)
    }

    /// Number of 1 KiB CHR banks (CHR RAM boards have eight).
    #[inline]
    fn chr_1k_count(&self) -> u32 {
        (self.chr_banks as u32 * 8).max(8)
    }

    fn update_banks(&mut self) {
        let r = &self.registers;
        let chr_count = self.chr_1k_count();
        let chr = |bank: u32| (bank % chr_count) * 0x0400;
        let two_k = [chr(r[0] & 0xFE), chr(r[0] | 0x01), chr(r[1] & 0xFE), chr(r[1] | 0x01)];
        let one_k = [chr(r[2]), chr(r[3]), chr(r[4]), chr(r[5])];
        if self.chr_inversion {
            self.chr_bank[..4].copy_from_slice(&one_k);
            self.chr_bank[4..].copy_from_slice(&two_k);
        } else {
            self.chr_bank[..4].copy_from_slice(&two_k);
            self.chr_bank[4..].copy_from_slice(&one_k);
        }

        let count = self.prg_8k_count();
        let prg = |bank: u32| (bank % count) * 0x2000;
        let switchable = prg(r[6] & 0x3F);
        let second_last = prg(count - 2);
        if self.prg_mode {
            self.prg_bank[0] = second_last;
            self.prg_bank[2] = switchable;
        } else {
            self.prg_bank[0] = switchable;
            self.prg_bank[2] = second_last;
        }
        self.prg_bank[1] = prg(r[7] & 0x3F);
        self.prg_bank[3] = prg(count - 1);
    }

    /// CHR storage offset of a pattern address through the current 1 KiB windows.
    #[inline]
    fn chr_offset(&self, addr: u16) -> usize {
        self.chr_bank[(addr >> 10) as usize] as usize + (addr & 0x03FF) as usize
    }

    /// Current IRQ counter value, for diagnostics.
    pub fn irq_counter(&self) -> u16 {
        self.irq_counter
    }

    /// Resolved PRG window offsets ($8000, $A000, $C000, $E000).
    pub fn prg_windows(&self) -> [u32; 4] {
        self.prg_bank
    }
}

impl Mapper for Mmc3 {
    fn mapper_id(&self) -> u8 {
        4
    }

    fn cpu_map_read(&mut self, addr: u16) -> Option<CpuMapped> {
        match addr {
            0x6000..=0x7FFF => Some(CpuMapped::Data(
                self.work_ram[(addr & 0x1FFF) as usize],
            )),
            0x8000..=0xFFFF => {
                let window = ((addr - 0x8000) >> 13) as usize;
                Some(CpuMapped::Offset(
                    self.prg_bank[window] as usize + (addr & 0x1FFF) as usize,
                ))
            }
            _ => None,
        }
    }

    fn cpu_map_write(&mut self, addr: u16, data: u8) -> Option<CpuMapped> {
        let even = (addr & 0x0001) == 0;
        match addr {
            0x6000..=0x7FFF => {
                self.work_ram[(addr & 0x1FFF) as usize] = data;
            }
            0x8000..=0x9FFF => {
                if even {
                    self.target = data & 0x07;
                    self.prg_mode = (data & 0x40) != 0;
                    self.chr_inversion = (data & 0x80) != 0;
                } else {
                    self.registers[self.target as usize] = data as u32;
                }
                self.update_banks();
            }
            0xA000..=0xBFFF => {
                if even {
                    self.mirror = if (data & 0x01) != 0 {
                        Mirror::Horizontal
                    } else {
                        Mirror::Vertical
                    };
                }
            }
            0xC000..=0xDFFF => {
                if even {
                    self.irq_reload = data as u16;
                } else {
                    self.irq_counter = 0;
                }
            }
            0xE000..=0xFFFF => {
                if even {
                    self.irq_enabled = false;
                    self.irq_active = false;
                } else {
                    self.irq_enabled = true;
                }
            }
            _ => return None,
        }
        Some(CpuMapped::Handled)
    }

    fn ppu_map_read(&self, addr: u16) -> Option<usize> {
        match addr {
            0x0000..=0x1FFF => Some(self.chr_offset(addr)),
            _ => None,
        }
    }

    fn ppu_map_write(&mut self, addr: u16) -> Option<usize> {
        match addr {
            0x0000..=0x1FFF if self.chr_banks == 0 => Some(self.chr_offset(addr)),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.target = 0;
        self.prg_mode = false;
        self.chr_inversion = false;
        self.mirror = Mirror::Horizontal;

        self.irq_active = false;
        self.irq_enabled = false;
        self.irq_counter = 0;
        self.irq_reload = 0;

        self.registers = [0, 2, 4, 5, 6, 7, 0, 1];
        self.update_banks();
    }

    fn mirror(&self) -> Mirror {
        self.mirror
    }

    fn irq_state(&self) -> bool {
        self.irq_active
    }

    fn irq_clear(&mut self) {
        self.irq_active = false;
    }

    fn scanline(&mut self) {
        if self.irq_counter == 0 {
            self.irq_counter = self.irq_reload;
        } else {
            self.irq_counter -= 1;
        }
        if self.irq_counter == 0 && self.irq_enabled {
            self.irq_active = true;
        }
    }
}
