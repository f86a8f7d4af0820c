/*!
MMC1 (Mapper 1)

Behavior:
- Serial 5-bit load register fed LSB first through writes to $8000..=$FFFF. A write with
  bit 7 set clears the shift state and forces PRG mode 3 (OR 0x0C into control).
- The fifth write commits the value into one of four internal registers chosen by
  address bits 13-14:
  * $8000-$9FFF control (mirroring, PRG mode, CHR mode)
  * $A000-$BFFF CHR bank 0 (4K mode) or the 8K CHR bank
  * $C000-$DFFF CHR bank 1 (4K mode only)
  * $E000-$FFFF PRG bank
- PRG modes 0/1 switch 32 KiB at $8000; mode 2 fixes the first bank at $8000; mode 3 fixes
  the last bank at $C000.
- 8 KiB work RAM at $6000..=$7FFF served by the mapper itself.
*/

use crate::mapper::{CpuMapped, Mapper, Mirror};

const WORK_RAM_SIZE: usize = 8 * 1024;

#[derive(Clone, Debug)]
pub struct Mmc1 {
    prg_banks: u16,
    chr_banks: u16,

    // Serial port
    load: u8,
    load_count: u8,

    control: u8,
    mirror: Mirror,

    chr_select_4lo: u8,
    chr_select_4hi: u8,
    chr_select_8: u8,

    prg_select_16lo: u8,
    prg_select_16hi: u8,
    prg_select_32: u8,

    work_ram: Vec<u8>,
}

impl Mmc1 {
    pub fn new(prg_banks: u16, chr_banks: u16) -> Self {
        let mut m = Self {
            prg_banks,
            chr_banks,
            load: 0,
            load_count: 0,
            control: 0,
            mirror: Mirror::Horizontal,
            chr_select_4lo: 0,
            chr_select_4hi: 0,
            chr_select_8: 0,
            prg_select_16lo: 0,
            prg_select_16hi: 0,
            prg_select_32: 0,
            work_ram: vec![0; WORK_RAM_SIZE],
        };
        m.reset();
        m
    }

    #[inline]
    fn last_prg_bank(&self) -> u8 {
        self.prg_banks.saturating_sub(1) as u8
    }

    #[inline]
    fn prg_16k_mode(&self) -> bool {
        (self.control & 0b01000) != 0
    }

    #[inline]
    fn chr_4k_mode(&self) -> bool {
        (self.control & 0b10000) != 0
    }

    /// (low, high) 16 KiB PRG bank indices, for diagnostics.
    pub fn prg_banks_16k(&self) -> (u8, u8) {
        (self.prg_select_16lo, self.prg_select_16hi)
    }

    pub fn control(&self) -> u8 {
        self.control
    }

    fn commit(&mut self, addr: u16) {
        let value = self.load;
        match (addr >> 13) & 0x03 {
            0 => {
                self.control = value & 0x1F;
                self.mirror = match self.control & 0x03 {
                    0 => Mirror::OneScreenLo,
                    1 => Mirror::OneScreenHi,
                    2 => Mirror::Vertical,
                    _ => Mirror::Horizontal,
                };
            }
            1 => {
                if self.chr_4k_mode() {
                    self.chr_select_4lo = value & 0x1F;
                } else {
                    // Low bit ignored in 8K mode; value counts 4K units.
                    self.chr_select_8 = (value & 0x1E) >> 1;
                }
            }
            2 => {
                if self.chr_4k_mode() {
                    self.chr_select_4hi = value & 0x1F;
                }
            }
            _ => match (self.control >> 2) & 0x03 {
                0 | 1 => self.prg_select_32 = (value & 0x0E) >> 1,
                2 => {
                    self.prg_select_16lo = 0;
                    self.prg_select_16hi = value & 0x0F;
                }
                _ => {
                    self.prg_select_16lo = value & 0x0F;
                    self.prg_select_16hi = self.last_prg_bank();
                }
            },
        }
        self.load = 0;
        self.load_count = 0;
    }

    fn serial_write(&mut self, addr: u16, data: u8) {
        if (data & 0x80) != 0 {
            self.load = 0;
            self.load_count = 0;
            self.control |= 0x0C;
            return;
        }
        self.load >>= 1;
        self.load |= (data & 0x01) << 4;
        self.load_count += 1;
        if self.load_count == 5 {
            self.commit(addr);
        }
    }
}

impl Mapper for Mmc1 {
    fn mapper_id(&self) -> u8 {
        1
    }

    fn cpu_map_read(&mut self, addr: u16) -> Option<CpuMapped> {
        match addr {
            0x6000..=0x7FFF => Some(CpuMapped::Data(
                self.work_ram[(addr & 0x1FFF) as usize],
            )),
            0x8000..=0xBFFF if self.prg_16k_mode() => Some(CpuMapped::Offset(
                self.prg_select_16lo as usize * 0x4000 + (addr & 0x3FFF) as usize,
            )),
            0xC000..=0xFFFF if self.prg_16k_mode() => Some(CpuMapped::Offset(
                self.prg_select_16hi as usize * 0x4000 + (addr & 0x3FFF) as usize,
            )),
            0x8000..=0xFFFF => Some(CpuMapped::Offset(
                self.prg_select_32 as usize * 0x8000 + (addr & 0x7FFF) as usize,
            )),
            _ => None,
        }
    }

    fn cpu_map_write(&mut self, addr: u16, data: u8) -> Option<CpuMapped> {
        match addr {
            0x6000..=0x7FFF => {
                self.work_ram[(addr & 0x1FFF) as usize] = data;
                Some(CpuMapped::Handled)
            }
            0x8000..=0xFFFF => {
                self.serial_write(addr, data);
                Some(CpuMapped::Handled)
            }
            _ => None,
        }
    }

    fn ppu_map_read(&self, addr: u16) -> Option<usize> {
        if addr > 0x1FFF {
            return None;
        }
        if self.chr_banks == 0 {
            return Some(addr as usize);
        }
        let mapped = if self.chr_4k_mode() {
            let bank = match addr {
                0x0000..=0x0FFF => self.chr_select_4lo,
                _ => self.chr_select_4hi,
            };
            bank as usize * 0x1000 + (addr & 0x0FFF) as usize
        } else {
            self.chr_select_8 as usize * 0x2000 + (addr & 0x1FFF) as usize
        };
        Some(mapped)
    }

    fn ppu_map_write(&mut self, addr: u16) -> Option<usize> {
        match addr {
            0x0000..=0x1FFF if self.chr_banks == 0 => Some(addr as usize),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.control = 0x1C;
        self.load = 0;
        self.load_count = 0;
        self.chr_select_8 = 0;
        self.chr_select_4lo = 0;
        self.chr_select_4hi = 0;
        self.prg_select_32 = 0;
        self.prg_select_16lo = 0;
        self.prg_select_16hi = self.last_prg_bank();
    }

    fn mirror(&self) -> Mirror {
        self.mirror
    }
}

#[cfg(test)]
mod tests {
    use super::Mmc1;
    use crate::mapper::{CpuMapped, Mapper, Mirror};

    fn write_serial(mapper: &mut Mmc1, addr: u16, value5: u8) {
        for i in 0..5 {
            let bit = (value5 >> i) & 1;
            mapper.cpu_map_write(addr, bit);
        }
    }

    fn offset(m: &mut Mmc1, addr: u16) -> usize {
        match m.cpu_map_read(addr) {
            Some(CpuMapped::Offset(o)) => o,
            other => panic!("expected PRG offset, got {other:?}"),
        }
    }

    #[test]
    fn power_on_fixes_last_bank_high() {
        let mut m = Mmc1::new(8, 1);
        assert_eq!(m.control(), 0x1C);
        assert_eq!(m.prg_banks_16k(), (0, 7));
        assert_eq!(offset(&mut m, 0x8000), 0);
        assert_eq!(offset(&mut m, 0xC000), 7 * 0x4000);
    }

    #[test]
    fn prg_mode_3_switches_low_bank() {
        let mut m = Mmc1::new(8, 1);
        write_serial(&mut m, 0x8000, 0b01100); // PRG mode 3, 8K CHR
        for b in 0..8u8 {
            write_serial(&mut m, 0xE000, b);
            assert_eq!(offset(&mut m, 0x8123), b as usize * 0x4000 + 0x0123);
            assert_eq!(offset(&mut m, 0xC000), 7 * 0x4000);
        }
    }

    #[test]
    fn prg_mode_2_fixes_first_bank() {
        let mut m = Mmc1::new(8, 1);
        write_serial(&mut m, 0x8000, 0b01000);
        write_serial(&mut m, 0xE000, 5);
        assert_eq!(offset(&mut m, 0x8000), 0);
        assert_eq!(offset(&mut m, 0xC001), 5 * 0x4000 + 1);
    }

    #[test]
    fn prg_32k_mode_ignores_low_bit() {
        let mut m = Mmc1::new(8, 1);
        write_serial(&mut m, 0x8000, 0b00000);
        write_serial(&mut m, 0xE000, 0b00011);
        assert_eq!(offset(&mut m, 0x8000), 0x8000);
        assert_eq!(offset(&mut m, 0xFFFF), 0x8000 + 0x7FFF);
    }

    #[test]
    fn reset_bit_forces_prg_mode_3() {
        let mut m = Mmc1::new(4, 1);
        write_serial(&mut m, 0x8000, 0b00000);
        m.cpu_map_write(0x8000, 1); // partial load
        m.cpu_map_write(0x8000, 0x80);
        assert_eq!(m.control() & 0x0C, 0x0C);
        // Shift state was cleared: a full 5-bit load commits cleanly.
        write_serial(&mut m, 0xE000, 2);
        assert_eq!(offset(&mut m, 0x8000), 2 * 0x4000);
    }

    #[test]
    fn control_selects_mirroring() {
        let mut m = Mmc1::new(2, 1);
        let cases = [
            (0, Mirror::OneScreenLo),
            (1, Mirror::OneScreenHi),
            (2, Mirror::Vertical),
            (3, Mirror::Horizontal),
        ];
        for (bits, expect) in cases {
            write_serial(&mut m, 0x8000, 0b01100 | bits);
            assert_eq!(m.mirror(), expect);
        }
    }

    #[test]
    fn chr_4k_and_8k_windows() {
        let mut m = Mmc1::new(2, 4);
        write_serial(&mut m, 0x8000, 0b11100); // 4K CHR
        write_serial(&mut m, 0xA000, 3);
        write_serial(&mut m, 0xC000, 5);
        assert_eq!(m.ppu_map_read(0x0010), Some(3 * 0x1000 + 0x10));
        assert_eq!(m.ppu_map_read(0x1010), Some(5 * 0x1000 + 0x10));

        write_serial(&mut m, 0x8000, 0b01100); // 8K CHR
        write_serial(&mut m, 0xA000, 0b00011); // low bit dropped -> 8K bank 1
        assert_eq!(m.ppu_map_read(0x1FFF), Some(0x2000 + 0x1FFF));
    }

    #[test]
    fn work_ram_is_served_directly() {
        let mut m = Mmc1::new(2, 1);
        assert_eq!(m.cpu_map_write(0x6005, 0x42), Some(CpuMapped::Handled));
        assert_eq!(m.cpu_map_read(0x6005), Some(CpuMapped::Data(0x42)));
        assert_eq!(m.mapper_id(), 1);
    }
}
