/*!
addressing.rs - 6502 addressing modes and operand fetch.

Overview
========
Each mode consumes its operand bytes from the instruction stream and leaves the effective
address in `addr_abs` (or the signed branch offset in `addr_rel`). `resolve` returns 1 when
the mode may cost an extra cycle (indexed access crossing a page); the operation decides
whether it actually pays it.

Implied mode targets the accumulator: `fetched` is primed with A so shift/rotate
instructions can operate on it uniformly.

Quirks reproduced
=================
- Zero-page indexed modes wrap inside page zero.
- (zp),Y reads its pointer high byte from `(zp + 1) & 0xFF`.
- JMP ($xxFF) fetches the high byte from $xx00 instead of crossing the page.
*/

use super::{Cpu, CpuBus};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddrMode {
    Imp,
    Imm,
    Zp0,
    Zpx,
    Zpy,
    Rel,
    Abs,
    Abx,
    Aby,
    Ind,
    Izx,
    Izy,
}

impl AddrMode {
    /// Short tag used by the disassembler.
    pub fn tag(self) -> &'static str {
        match self {
            AddrMode::Imp => "IMP",
            AddrMode::Imm => "IMM",
            AddrMode::Zp0 => "ZP0",
            AddrMode::Zpx => "ZPX",
            AddrMode::Zpy => "ZPY",
            AddrMode::Rel => "REL",
            AddrMode::Abs => "ABS",
            AddrMode::Abx => "ABX",
            AddrMode::Aby => "ABY",
            AddrMode::Ind => "IND",
            AddrMode::Izx => "IZX",
            AddrMode::Izy => "IZY",
        }
    }

    /// Operand bytes following the opcode.
    pub fn operand_len(self) -> u16 {
        match self {
            AddrMode::Imp => 0,
            AddrMode::Imm
            | AddrMode::Zp0
            | AddrMode::Zpx
            | AddrMode::Zpy
            | AddrMode::Rel
            | AddrMode::Izx
            | AddrMode::Izy => 1,
            AddrMode::Abs | AddrMode::Abx | AddrMode::Aby | AddrMode::Ind => 2,
        }
    }
}

#[inline]
fn page_crossed(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

impl Cpu {
    /// Next byte from the instruction stream.
    pub(crate) fn fetch_pc(&mut self, bus: &mut impl CpuBus) -> u8 {
        let v = self.read(bus, self.pc);
        self.pc = self.pc.wrapping_add(1);
        v
    }

    pub(crate) fn fetch_pc_word(&mut self, bus: &mut impl CpuBus) -> u16 {
        let lo = self.fetch_pc(bus) as u16;
        let hi = self.fetch_pc(bus) as u16;
        (hi << 8) | lo
    }

    /// Compute the effective address for `mode`. Returns 1 if a page boundary was crossed.
    pub(crate) fn resolve(&mut self, mode: AddrMode, bus: &mut impl CpuBus) -> u8 {
        match mode {
            AddrMode::Imp => {
                self.fetched = self.a;
                0
            }
            AddrMode::Imm => {
                self.addr_abs = self.pc;
                self.pc = self.pc.wrapping_add(1);
                0
            }
            AddrMode::Zp0 => {
                self.addr_abs = self.fetch_pc(bus) as u16;
                0
            }
            AddrMode::Zpx => {
                self.addr_abs = self.fetch_pc(bus).wrapping_add(self.x) as u16;
                0
            }
            AddrMode::Zpy => {
                self.addr_abs = self.fetch_pc(bus).wrapping_add(self.y) as u16;
                0
            }
            AddrMode::Rel => {
                let offset = self.fetch_pc(bus);
                self.addr_rel = offset as i8 as i16 as u16;
                0
            }
            AddrMode::Abs => {
                self.addr_abs = self.fetch_pc_word(bus);
                0
            }
            AddrMode::Abx => {
                let base = self.fetch_pc_word(bus);
                self.addr_abs = base.wrapping_add(self.x as u16);
                page_crossed(base, self.addr_abs) as u8
            }
            AddrMode::Aby => {
                let base = self.fetch_pc_word(bus);
                self.addr_abs = base.wrapping_add(self.y as u16);
                page_crossed(base, self.addr_abs) as u8
            }
            AddrMode::Ind => {
                let ptr = self.fetch_pc_word(bus);
                let lo = self.read(bus, ptr) as u16;
                let hi_addr = if (ptr & 0x00FF) == 0x00FF {
                    ptr & 0xFF00
                } else {
                    ptr.wrapping_add(1)
                };
                let hi = self.read(bus, hi_addr) as u16;
                self.addr_abs = (hi << 8) | lo;
                0
            }
            AddrMode::Izx => {
                let t = self.fetch_pc(bus).wrapping_add(self.x);
                let lo = self.read(bus, t as u16) as u16;
                let hi = self.read(bus, t.wrapping_add(1) as u16) as u16;
                self.addr_abs = (hi << 8) | lo;
                0
            }
            AddrMode::Izy => {
                let t = self.fetch_pc(bus);
                let lo = self.read(bus, t as u16) as u16;
                let hi = self.read(bus, t.wrapping_add(1) as u16) as u16;
                let base = (hi << 8) | lo;
                self.addr_abs = base.wrapping_add(self.y as u16);
                page_crossed(base, self.addr_abs) as u8
            }
        }
    }

    /// Load the operand into `fetched`. Implied mode keeps the accumulator primed by `resolve`.
    pub(crate) fn fetch(&mut self, mode: AddrMode, bus: &mut impl CpuBus) -> u8 {
        if mode != AddrMode::Imp {
            self.fetched = self.read(bus, self.addr_abs);
        }
        self.fetched
    }
}
