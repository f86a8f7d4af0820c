/*
UxROM (Mapper 2)

- PRG: 16 KiB switchable bank at $8000-$BFFF (selected by the low nibble of any write to
  $8000-$FFFF), last bank fixed at $C000-$FFFF.
- CHR: 8 KiB, writable when the board carries CHR RAM.
*/

use crate::mapper::{CpuMapped, Mapper, split_16k};

#[derive(Debug, Clone)]
pub struct Uxrom {
    prg_banks: u16,
    chr_banks: u16,
    prg_select_lo: u8,
    prg_select_hi: u8,
}

impl Uxrom {
    pub fn new(prg_banks: u16, chr_banks: u16) -> Self {
        let mut m = Self {
            prg_banks,
            chr_banks,
            prg_select_lo: 0,
            prg_select_hi: 0,
        };
        m.reset();
        m
    }
}

impl Mapper for Uxrom {
    fn mapper_id(&self) -> u8 {
        2
    }

    fn cpu_map_read(&mut self, addr: u16) -> Option<CpuMapped> {
        match addr {
            0x8000..=0xFFFF => Some(CpuMapped::Offset(split_16k(
                addr,
                self.prg_select_lo as u16,
                self.prg_select_hi as u16,
            ))),
            _ => None,
        }
    }

    fn cpu_map_write(&mut self, addr: u16, data: u8) -> Option<CpuMapped> {
        match addr {
            0x8000..=0xFFFF => {
                self.prg_select_lo = ((data & 0x0F) as u16 % self.prg_banks.max(1)) as u8;
                Some(CpuMapped::Handled)
            }
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
            0x0000..=0x1FFF if self.chr_banks == 0 => Some(addr as usize),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.prg_select_lo = 0;
        self.prg_select_hi = self.prg_banks.saturating_sub(1) as u8;
    }
}
