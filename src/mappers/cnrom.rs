/*
CNROM (Mapper 3) implementation.

Characteristics:
- PRG: Fixed (16 KiB mirrored or 32 KiB direct) at $8000-$FFFF; no PRG banking.
- CHR: Switchable in 8 KiB banks via CPU writes to $8000-$FFFF. The low two bits of the
  written value select the bank.
- Mirroring: header only.
- No IRQ generation.

Reset Behavior:
- CHR bank is reset to 0.
*/

use crate::mapper::{CpuMapped, Mapper};

#[derive(Debug, Clone)]
pub struct Cnrom {
    prg_banks: u16,
    chr_bank: u8,
}

impl Cnrom {
    pub fn new(prg_banks: u16, _chr_banks: u16) -> Self {
        Self {
            prg_banks,
            chr_bank: 0,
        }
    }

    #[inline]
    fn prg_offset(&self, addr: u16) -> usize {
        let mask = if self.prg_banks > 1 { 0x7FFF } else { 0x3FFF };
        (addr & mask) as usize
    }

    pub fn current_chr_bank(&self) -> u8 {
        self.chr_bank
    }
}

impl Mapper for Cnrom {
    fn mapper_id(&self) -> u8 {
        3
    }

    fn cpu_map_read(&mut self, addr: u16) -> Option<CpuMapped> {
        match addr {
            0x8000..=0xFFFF => Some(CpuMapped::Offset(self.prg_offset(addr))),
            _ => None,
        }
    }

    fn cpu_map_write(&mut self, addr: u16, data: u8) -> Option<CpuMapped> {
        match addr {
            0x8000..=0xFFFF => {
                self.chr_bank = data & 0x03;
                Some(CpuMapped::Handled)
            }
            _ => None,
        }
    }

    fn ppu_map_read(&self, addr: u16) -> Option<usize> {
        match addr {
            0x0000..=0x1FFF => Some(self.chr_bank as usize * 0x2000 + addr as usize),
            _ => None,
        }
    }

    fn ppu_map_write(&mut self, _addr: u16) -> Option<usize> {
        None
    }

    fn reset(&mut self) {
        self.chr_bank = 0;
    }
}
