//! Read-only disassembler over any `CpuBus`.

use std::collections::BTreeMap;

use super::addressing::AddrMode;
use super::table::LOOKUP;
use super::{Cpu, CpuBus};

impl Cpu {
    /// Disassemble `start..=stop` into a map keyed by instruction address.
    ///
    /// Lines look like `$8000: LDA #$0A {IMM}`. All reads use the read-only path, so PPU and
    /// controller registers are not disturbed, and no CPU state changes.
    pub fn disassemble(
        &self,
        bus: &mut impl CpuBus,
        start: u16,
        stop: u16,
    ) -> BTreeMap<u16, String> {
        let mut lines = BTreeMap::new();
        let mut addr = start as u32;
        let stop = stop as u32;

        let mut next = |addr: &mut u32| -> u8 {
            let v = bus.cpu_read(*addr as u16, true);
            *addr += 1;
            v
        };

        while addr <= stop {
            let line_addr = addr as u16;
            let opcode = next(&mut addr);
            let ins = &LOOKUP[opcode as usize];

            let operand = match ins.mode {
                AddrMode::Imp => String::new(),
                AddrMode::Imm => format!("#${:02X}", next(&mut addr)),
                AddrMode::Zp0 => format!("${:02X}", next(&mut addr)),
                AddrMode::Zpx => format!("${:02X}, X", next(&mut addr)),
                AddrMode::Zpy => format!("${:02X}, Y", next(&mut addr)),
                AddrMode::Izx => format!("(${:02X}, X)", next(&mut addr)),
                AddrMode::Izy => format!("(${:02X}), Y", next(&mut addr)),
                AddrMode::Rel => {
                    let value = next(&mut addr);
                    let target = (addr as u16).wrapping_add(value as i8 as i16 as u16);
                    format!("${value:02X} [${target:04X}]")
                }
                AddrMode::Abs | AddrMode::Abx | AddrMode::Aby | AddrMode::Ind => {
                    let lo = next(&mut addr) as u16;
                    let hi = next(&mut addr) as u16;
                    let word = (hi << 8) | lo;
                    match ins.mode {
                        AddrMode::Abx => format!("${word:04X}, X"),
                        AddrMode::Aby => format!("${word:04X}, Y"),
                        AddrMode::Ind => format!("(${word:04X})"),
                        _ => format!("${word:04X}"),
                    }
                }
            };

            lines.insert(
                line_addr,
                format!("${line_addr:04X}: {} {operand} {{{}}}", ins.name, ins.mode.tag()),
            );
        }

        lines
    }
}
