/*!
Cartridge: iNES / NES 2.0 loader and mapper front.

Features:
- Parse the 16-byte header from bytes or a file path.
- Skip the optional 512-byte trainer.
- Own PRG ROM and CHR storage (CHR ROM, or 8 KiB zeroed CHR RAM when the header declares
  no CHR banks).
- Select a concrete mapper from the combined mapper id (0-4) and route CPU/PPU accesses
  through it.

Notes:
- NES 2.0 is recognised when `(flags7 & 0x0C) == 0x08`; its bank-count MSB nibbles in
  byte 9 widen the PRG/CHR counts. Other NES 2.0 fields are ignored.
- Storage is sized from the declared bank counts. A file shorter than declared leaves the
  missing tail zero-filled (logged at warn) instead of failing.
- Mirroring comes from flags6 bit 0 unless the mapper overrides it at runtime.
*/

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::mapper::{CpuMapped, Mapper, Mirror, Nrom};
use crate::mappers::{Cnrom, Mmc1, Mmc3, Uxrom};
use crate::ppu_bus::PpuBus;

const HEADER_LEN: usize = 16;
const TRAINER_LEN: usize = 512;
const PRG_BANK_LEN: usize = 16 * 1024;
const CHR_BANK_LEN: usize = 8 * 1024;

/// Errors surfaced while building a cartridge from an image.
#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("failed to read cartridge image: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid iNES signature (expected NES<1A>)")]
    BadSignature,
    #[error("image truncated in {section}: need {needed} bytes, have {available}")]
    Truncated {
        section: &'static str,
        needed: usize,
        available: usize,
    },
    #[error("unsupported mapper id {0}")]
    UnsupportedMapper(u8),
}

/// Decoded header fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub prg_banks: u16,
    pub chr_banks: u16,
    pub mapper_id: u8,
    pub mirror: Mirror,
    pub has_trainer: bool,
    pub battery: bool,
    pub nes2: bool,
}

impl Header {
    pub fn parse(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.len() < HEADER_LEN {
            return Err(CartridgeError::Truncated {
                section: "header",
                needed: HEADER_LEN,
                available: data.len(),
            });
        }
        if &data[0..4] != b"NES\x1A" {
            return Err(CartridgeError::BadSignature);
        }

        let flags6 = data[6];
        let flags7 = data[7];
        let nes2 = (flags7 & 0x0C) == 0x08;

        let (prg_banks, chr_banks) = if nes2 {
            (
                (((data[9] & 0x0F) as u16) << 8) | data[4] as u16,
                (((data[9] & 0xF0) as u16) << 4) | data[5] as u16,
            )
        } else {
            (data[4] as u16, data[5] as u16)
        };

        Ok(Self {
            prg_banks,
            chr_banks,
            mapper_id: (flags7 & 0xF0) | (flags6 >> 4),
            mirror: if (flags6 & 0x01) != 0 {
                Mirror::Vertical
            } else {
                Mirror::Horizontal
            },
            has_trainer: (flags6 & 0x04) != 0,
            battery: (flags6 & 0x02) != 0,
            nes2,
        })
    }
}

/// Copy `len` bytes starting at `offset`, zero-filling whatever the image lacks.
fn take_section(data: &[u8], offset: usize, len: usize, section: &'static str) -> Vec<u8> {
    let mut out = vec![0u8; len];
    let available = data.len().saturating_sub(offset).min(len);
    if available < len {
        log::warn!("cartridge {section} short: declared {len} bytes, image has {available}");
    }
    if available > 0 {
        out[..available].copy_from_slice(&data[offset..offset + available]);
    }
    out
}

fn build_mapper(id: u8, prg_banks: u16, chr_banks: u16) -> Result<Box<dyn Mapper>, CartridgeError> {
    let mapper: Box<dyn Mapper> = match id {
        0 => Box::new(Nrom::new(prg_banks, chr_banks)),
        1 => Box::new(Mmc1::new(prg_banks, chr_banks)),
        2 => Box::new(Uxrom::new(prg_banks, chr_banks)),
        3 => Box::new(Cnrom::new(prg_banks, chr_banks)),
        4 => Box::new(Mmc3::new(prg_banks, chr_banks)),
        other => {
            log::warn!("unsupported mapper id {other}");
            return Err(CartridgeError::UnsupportedMapper(other));
        }
    };
    Ok(mapper)
}

pub struct Cartridge {
    header: Header,
    prg: Vec<u8>,
    chr: Vec<u8>,
    mapper: Box<dyn Mapper>,
}

impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge")
            .field("header", &self.header)
            .field("prg_len", &self.prg.len())
            .field("chr_len", &self.chr.len())
            .field("mirror", &self.mirror())
            .finish()
    }
}

impl Cartridge {
    // -------------- Construction --------------

    /// Build a cartridge from a raw image.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        let header = Header::parse(data)?;

        let mut offset = HEADER_LEN;
        if header.has_trainer {
            offset += TRAINER_LEN;
        }

        let prg_len = header.prg_banks as usize * PRG_BANK_LEN;
        let prg = take_section(data, offset, prg_len, "PRG ROM");
        offset += prg_len;

        let chr = if header.chr_banks == 0 {
            vec![0u8; CHR_BANK_LEN]
        } else {
            take_section(data, offset, header.chr_banks as usize * CHR_BANK_LEN, "CHR ROM")
        };

        let mapper = build_mapper(header.mapper_id, header.prg_banks, header.chr_banks)?;

        log::info!(
            "cartridge loaded: mapper {} prg {}x16K chr {}x8K mirror {:?}{}",
            header.mapper_id,
            header.prg_banks,
            header.chr_banks,
            header.mirror,
            if header.nes2 { " (NES 2.0)" } else { "" }
        );

        Ok(Self {
            header,
            prg,
            chr,
            mapper,
        })
    }

    /// Load a cartridge from a `.nes` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    // -------------- CPU side --------------

    /// Returns `Some` when the cartridge claims `addr`.
    pub fn cpu_read(&mut self, addr: u16) -> Option<u8> {
        match self.mapper.cpu_map_read(addr)? {
            CpuMapped::Offset(offset) => Some(self.prg.get(offset).copied().unwrap_or(0)),
            CpuMapped::Data(data) => Some(data),
            CpuMapped::Handled => Some(0),
        }
    }

    /// Returns true when the cartridge claims the write.
    pub fn cpu_write(&mut self, addr: u16, data: u8) -> bool {
        match self.mapper.cpu_map_write(addr, data) {
            Some(CpuMapped::Offset(offset)) => {
                if let Some(byte) = self.prg.get_mut(offset) {
                    *byte = data;
                }
                true
            }
            Some(_) => true,
            None => false,
        }
    }

    // -------------- Mapper passthrough --------------

    pub fn reset(&mut self) {
        self.mapper.reset();
    }

    /// Effective mirroring: the mapper's choice, or the header value when it defers.
    pub fn mirror(&self) -> Mirror {
        match self.mapper.mirror() {
            Mirror::Hardware => self.header.mirror,
            m => m,
        }
    }

    pub fn irq_state(&self) -> bool {
        self.mapper.irq_state()
    }

    pub fn irq_clear(&mut self) {
        self.mapper.irq_clear();
    }

    pub fn scanline(&mut self) {
        self.mapper.scanline();
    }

    // -------------- Accessors --------------

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn mapper_id(&self) -> u8 {
        self.header.mapper_id
    }

    pub fn prg_banks(&self) -> u16 {
        self.header.prg_banks
    }

    pub fn chr_banks(&self) -> u16 {
        self.header.chr_banks
    }

    pub fn is_nes2(&self) -> bool {
        self.header.nes2
    }

    pub fn prg_rom_len(&self) -> usize {
        self.prg.len()
    }

    pub fn chr_len(&self) -> usize {
        self.chr.len()
    }

    pub fn chr_is_ram(&self) -> bool {
        self.header.chr_banks == 0
    }
}

impl PpuBus for Cartridge {
    fn ppu_read(&self, addr: u16) -> Option<u8> {
        let offset = self.mapper.ppu_map_read(addr)?;
        Some(self.chr.get(offset).copied().unwrap_or(0))
    }

    fn ppu_write(&mut self, addr: u16, data: u8) -> bool {
        match self.mapper.ppu_map_write(addr) {
            Some(offset) => {
                if let Some(byte) = self.chr.get_mut(offset) {
                    *byte = data;
                }
                true
            }
            None => false,
        }
    }

    fn mirror(&self) -> Mirror {
        Cartridge::mirror(self)
    }

    fn scanline(&mut self) {
        Cartridge::scanline(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::build_ines;

    #[test]
    fn parse_simple_nrom_32k_chr8k() {
        let data = build_ines(2, 1, 0b0000_0001, 0, 1, None);
        let mut cart = Cartridge::from_bytes(&data).expect("parse");

        assert_eq!(cart.mapper_id(), 0);
        assert_eq!(cart.mirror(), Mirror::Vertical);
        assert_eq!(cart.prg_rom_len(), 32 * 1024);
        assert_eq!(cart.chr_len(), 8 * 1024);
        assert!(!cart.chr_is_ram());

        assert_eq!(cart.cpu_read(0x8000), Some(0xAA));
        assert_eq!(cart.cpu_read(0xFFFF), Some(0xAA));
        assert_eq!(cart.ppu_read(0x1000), Some(0xCC));
        // NROM does not claim the RAM window
        assert_eq!(cart.cpu_read(0x0000), None);
        assert_eq!(cart.cpu_read(0x6000), None);
    }

    #[test]
    fn zero_chr_banks_allocates_writable_chr_ram() {
        let data = build_ines(1, 0, 0, 0, 0, None);
        let mut cart = Cartridge::from_bytes(&data).expect("parse");

        assert_eq!(cart.mirror(), Mirror::Horizontal);
        assert!(cart.chr_is_ram());
        assert_eq!(cart.chr_len(), 8 * 1024);
        assert_eq!(cart.ppu_read(0x0123), Some(0));
        assert!(cart.ppu_write(0x0123, 0x5A));
        assert_eq!(cart.ppu_read(0x0123), Some(0x5A));

        // NROM-128 mirrors $C000 onto $8000
        assert_eq!(cart.cpu_read(0x8000), cart.cpu_read(0xC000));
    }

    #[test]
    fn chr_rom_ignores_writes() {
        let data = build_ines(1, 1, 0, 0, 0, None);
        let mut cart = Cartridge::from_bytes(&data).expect("parse");
        assert!(!cart.ppu_write(0x0000, 0x11));
        assert_eq!(cart.ppu_read(0x0000), Some(0xCC));
    }

    #[test]
    fn trainer_moves_data_offset() {
        let trainer = [0x77u8; 512];
        let mut data = build_ines(1, 1, 0b0000_0100, 0, 1, Some(&trainer));
        // First PRG byte sits right after header + trainer.
        data[16 + 512] = 0x42;
        let mut cart = Cartridge::from_bytes(&data).expect("parse");
        assert_eq!(cart.cpu_read(0x8000), Some(0x42));
        assert!(cart.header().has_trainer);
    }

    #[test]
    fn bad_signature_and_short_header() {
        let mut data = build_ines(1, 1, 0, 0, 0, None);
        data[3] = 0x00;
        assert!(matches!(
            Cartridge::from_bytes(&data),
            Err(CartridgeError::BadSignature)
        ));
        assert!(matches!(
            Cartridge::from_bytes(&[0x4E, 0x45, 0x53]),
            Err(CartridgeError::Truncated {
                section: "header",
                needed: 16,
                available: 3
            })
        ));
    }

    #[test]
    fn unsupported_mapper_fails_construction() {
        // mapper 7 (AxROM) in the low nibble
        let data = build_ines(1, 1, 0x70, 0, 0, None);
        let err = Cartridge::from_bytes(&data).unwrap_err();
        assert!(matches!(err, CartridgeError::UnsupportedMapper(7)));
        assert_eq!(err.to_string(), "unsupported mapper id 7");
    }

    #[test]
    fn mapper_id_combines_both_nibbles() {
        let data = build_ines(2, 1, 0x40, 0x00, 0, None);
        assert_eq!(Cartridge::from_bytes(&data).expect("mmc3").mapper_id(), 4);
        let data = build_ines(2, 1, 0x10, 0x00, 0, None);
        assert_eq!(Cartridge::from_bytes(&data).expect("mmc1").mapper_id(), 1);
        let header = Header::parse(&build_ines(1, 1, 0x20, 0x10, 0, None)).expect("header");
        assert_eq!(header.mapper_id, 0x12);
    }

    #[test]
    fn nes2_widens_bank_counts() {
        let mut data = build_ines(2, 1, 0, 0b0000_1000, 0, None);
        data[9] = 0x00;
        let cart = Cartridge::from_bytes(&data).expect("nes2");
        assert!(cart.is_nes2());
        assert_eq!(cart.prg_banks(), 2);

        let mut header = [0u8; 16];
        header[..4].copy_from_slice(b"NES\x1A");
        header[4] = 0x02;
        header[5] = 0x03;
        header[7] = 0x08;
        header[9] = 0x21;
        let parsed = Header::parse(&header).expect("header");
        assert_eq!(parsed.prg_banks, 0x102);
        assert_eq!(parsed.chr_banks, 0x203);
    }

    #[test]
    fn truncated_prg_is_zero_filled() {
        let mut data = build_ines(2, 1, 0, 0, 0, None);
        data.truncate(16 + 0x100);
        let mut cart = Cartridge::from_bytes(&data).expect("lenient");
        assert_eq!(cart.prg_rom_len(), 32 * 1024);
        assert_eq!(cart.cpu_read(0x80FF), Some(0xAA));
        assert_eq!(cart.cpu_read(0x8100), Some(0x00));
        assert_eq!(cart.ppu_read(0x0000), Some(0x00));
    }

    #[test]
    fn mapper_mirroring_overrides_header() {
        // MMC1, header says vertical
        let mut cart = Cartridge::from_bytes(&build_ines(2, 1, 0x11, 0, 0, None)).expect("mmc1");
        // MMC1 starts from its own horizontal setting
        assert_eq!(cart.mirror(), Mirror::Horizontal);
        for bit in [0u8, 0, 0, 0, 0] {
            cart.cpu_write(0x8000, bit);
        }
        assert_eq!(cart.mirror(), Mirror::OneScreenLo);
        assert_eq!(PpuBus::mirror(&cart), Mirror::OneScreenLo);
    }

    #[test]
    fn work_ram_goes_through_mapper() {
        let mut cart = Cartridge::from_bytes(&build_ines(2, 1, 0x40, 0, 0, None)).expect("mmc3");
        assert!(cart.cpu_write(0x6010, 0x99));
        assert_eq!(cart.cpu_read(0x6010), Some(0x99));
        // PRG untouched by work RAM writes
        assert_eq!(cart.cpu_read(0x8010), Some(0xAA));
    }

    #[test]
    fn from_file_reports_io_errors() {
        let err = Cartridge::from_file("/nonexistent/path/to/rom.nes").unwrap_err();
        assert!(matches!(err, CartridgeError::Io(_)));
    }
}
