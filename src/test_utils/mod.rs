//! Shared test utilities: iNES image builders and a flat CPU bus.
//!
//! Notes on the iNES header fields used here:
//! - bytes[0..4] = b"NES\x1A"
//! - byte 4 = PRG ROM size in 16 KiB units
//! - byte 5 = CHR ROM size in 8 KiB units (0 => the loader allocates 8 KiB CHR RAM)
//! - byte 6 = Flags 6 (mirroring, battery, trainer, mapper low nibble)
//! - byte 7 = Flags 7 (NES 2.0 indicator, mapper high nibble)
//! - byte 8 = PRG RAM size in 8 KiB units
//! - bytes 9..15 = padding
//!
//! Vectors:
//! - 16 KiB PRG (NROM-128): vectors at PRG offset 0x3FFA..=0x3FFF
//! - 32 KiB PRG (NROM-256): vectors at PRG offset 0x7FFA..=0x7FFF

#![allow(dead_code)]

use crate::cpu::CpuBus;

/// Build a minimal iNES image. PRG is filled with 0xAA, CHR with 0xCC.
///
/// - `prg_16k`: number of 16 KiB PRG units
/// - `chr_8k`: number of 8 KiB CHR units (0 => CHR RAM)
/// - `flags6`, `flags7`: header flag bytes
/// - `prg_ram_8k`: header byte 8
/// - `trainer`: optional 512-byte trainer inserted after the header
pub fn build_ines(
    prg_16k: usize,
    chr_8k: usize,
    flags6: u8,
    flags7: u8,
    prg_ram_8k: u8,
    trainer: Option<&[u8; 512]>,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(
        16 + trainer.map(|_| 512).unwrap_or(0) + prg_16k * 16 * 1024 + chr_8k * 8 * 1024,
    );

    bytes.extend_from_slice(b"NES\x1A");
    bytes.push(prg_16k as u8);
    bytes.push(chr_8k as u8);
    bytes.push(flags6);
    bytes.push(flags7);
    bytes.push(prg_ram_8k);
    bytes.extend_from_slice(&[0u8; 7]);

    if let Some(t) = trainer {
        bytes.extend_from_slice(t);
    }

    bytes.extend(std::iter::repeat_n(0xAA, prg_16k * 16 * 1024));
    bytes.extend(std::iter::repeat_n(0xCC, chr_8k * 8 * 1024));
    bytes
}

/// Build an image for `mapper` where every byte of 16 KiB PRG bank `n` is `n` and every
/// byte of 1 KiB CHR bank `n` is `n`. Useful for bank-switching checks.
pub fn build_banked(mapper: u8, prg_16k: usize, chr_8k: usize, vertical: bool) -> Vec<u8> {
    let flags6 = ((mapper & 0x0F) << 4) | vertical as u8;
    let flags7 = mapper & 0xF0;
    let mut rom = build_ines(prg_16k, chr_8k, flags6, flags7, 0, None);

    let prg_start = 16;
    for bank in 0..prg_16k {
        let base = prg_start + bank * 0x4000;
        rom[base..base + 0x4000].fill(bank as u8);
    }
    let chr_start = prg_start + prg_16k * 0x4000;
    for bank in 0..chr_8k * 8 {
        let base = chr_start + bank * 0x400;
        rom[base..base + 0x400].fill(bank as u8);
    }
    rom
}

/// Build an NROM image with `prg` at $8000 in a single 16 KiB bank and the given vectors
/// (RESET/NMI/IRQ default to $8000).
pub fn build_nrom_with_prg(
    prg: &[u8],
    chr_8k: usize,
    prg_ram_8k: u8,
    vectors: Option<(u16, u16, u16)>,
) -> Vec<u8> {
    assert!(
        prg.len() <= 16 * 1024,
        "Program must fit within a 16 KiB PRG bank"
    );

    let mut rom = build_ines(1, chr_8k, 0, 0, prg_ram_8k, None);
    let prg_start = 16;
    let prg_end = prg_start + 16 * 1024;
    rom[prg_start..prg_start + prg.len()].copy_from_slice(prg);

    let (reset, nmi, irq) = vectors.unwrap_or((0x8000, 0x8000, 0x8000));
    set_vectors_in_prg(&mut rom[prg_start..prg_end], reset, nmi, irq);
    rom
}

/// Write NMI/RESET/IRQ vectors at the top of a 16 KiB or 32 KiB PRG slice.
pub fn set_vectors_in_prg(prg: &mut [u8], reset: u16, nmi: u16, irq: u16) {
    let base = match prg.len() {
        16384 => 0x3FFA,
        32768 => 0x7FFA,
        other => panic!(
            "Unsupported PRG length for vector placement: {} bytes (expected 16 KiB or 32 KiB)",
            other
        ),
    };
    write_le_u16(prg, base, nmi);
    write_le_u16(prg, base + 2, reset);
    write_le_u16(prg, base + 4, irq);
}

#[inline]
fn write_le_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset] = (value & 0x00FF) as u8;
    buf[offset + 1] = (value >> 8) as u8;
}

/// 64 KiB of plain RAM with no mirroring or side effects, for CPU-only tests.
pub struct FlatBus {
    pub mem: Vec<u8>,
}

impl FlatBus {
    pub fn new() -> Self {
        Self {
            mem: vec![0; 0x10000],
        }
    }

    pub fn with_program(origin: u16, program: &[u8]) -> Self {
        let mut bus = Self::new();
        let start = origin as usize;
        bus.mem[start..start + program.len()].copy_from_slice(program);
        bus
    }

    pub fn set_vectors(&mut self, reset: u16, nmi: u16, irq: u16) {
        write_le_u16(&mut self.mem, 0xFFFA, nmi);
        write_le_u16(&mut self.mem, 0xFFFC, reset);
        write_le_u16(&mut self.mem, 0xFFFE, irq);
    }
}

impl CpuBus for FlatBus {
    fn cpu_read(&mut self, addr: u16, _read_only: bool) -> u8 {
        self.mem[addr as usize]
    }

    fn cpu_write(&mut self, addr: u16, data: u8) {
        self.mem[addr as usize] = data;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_ines() {
        let rom = build_ines(2, 1, 0x01, 0x00, 1, None);
        assert_eq!(&rom[0..4], b"NES\x1A");
        assert_eq!(rom[4], 2);
        assert_eq!(rom[5], 1);
        assert_eq!(rom[6], 0x01);
        assert_eq!(rom[8], 1);
        assert_eq!(rom.len(), 16 + 2 * 16 * 1024 + 8 * 1024);
    }

    #[test]
    fn writes_vectors_for_16k_prg() {
        let mut prg = vec![0u8; 16 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x3FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }

    #[test]
    fn banked_image_labels_each_bank() {
        let rom = build_banked(0x12, 2, 1, true);
        assert_eq!(rom[6], 0x21);
        assert_eq!(rom[7], 0x10);
        assert_eq!(rom[16], 0);
        assert_eq!(rom[16 + 0x4000], 1);
        assert_eq!(rom[16 + 0x8000 + 0x0400 * 7], 7);
    }

    #[test]
    fn flat_bus_is_plain_memory() {
        let mut bus = FlatBus::with_program(0x8000, &[1, 2, 3]);
        assert_eq!(bus.cpu_read(0x8001, false), 2);
        bus.cpu_write(0xFFFF, 9);
        assert_eq!(bus.mem[0xFFFF], 9);
    }
}
