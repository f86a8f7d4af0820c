/*!
table.rs - The 256-entry opcode table.

Each entry pairs a mnemonic with its operation, addressing mode and base cycle count.
Undefined opcodes are listed as "???" and execute either `Xxx` or a `Nop` carrying the
documented cycle cost; opcode $EB is the unofficial SBC immediate alias and runs `Sbc`
in implied mode.

The table is immutable and built at compile time.
*/

use super::addressing::AddrMode::{self, *};
use super::execute::Op::{self, *};

#[derive(Copy, Clone, Debug)]
pub struct Instruction {
    pub name: &'static str,
    pub op: Op,
    pub mode: AddrMode,
    pub cycles: u8,
}

impl Instruction {
    /// True for opcodes outside the documented instruction set.
    pub fn is_illegal(&self) -> bool {
        self.name == "???"
    }
}

const fn ins(name: &'static str, op: Op, mode: AddrMode, cycles: u8) -> Instruction {
    Instruction {
        name,
        op,
        mode,
        cycles,
    }
}

#[rustfmt::skip]
pub static LOOKUP: [Instruction; 256] = [
    // 0x00
    ins("BRK", Brk, Imm, 7), ins("ORA", Ora, Izx, 6), ins("???", Xxx, Imp, 2), ins("???", Xxx, Imp, 8),
    ins("???", Nop, Imp, 3), ins("ORA", Ora, Zp0, 3), ins("ASL", Asl, Zp0, 5), ins("???", Xxx, Imp, 5),
    ins("PHP", Php, Imp, 3), ins("ORA", Ora, Imm, 2), ins("ASL", Asl, Imp, 2), ins("???", Xxx, Imp, 2),
    ins("???", Nop, Imp, 4), ins("ORA", Ora, Abs, 4), ins("ASL", Asl, Abs, 6), ins("???", Xxx, Imp, 6),
    // 0x10
    ins("BPL", Bpl, Rel, 2), ins("ORA", Ora, Izy, 5), ins("???", Xxx, Imp, 2), ins("???", Xxx, Imp, 8),
    ins("???", Nop, Imp, 4), ins("ORA", Ora, Zpx, 4), ins("ASL", Asl, Zpx, 6), ins("???", Xxx, Imp, 6),
    ins("CLC", Clc, Imp, 2), ins("ORA", Ora, Aby, 4), ins("???", Nop, Imp, 2), ins("???", Xxx, Imp, 7),
    ins("???", Nop, Imp, 4), ins("ORA", Ora, Abx, 4), ins("ASL", Asl, Abx, 7), ins("???", Xxx, Imp, 7),
    // 0x20
    ins("JSR", Jsr, Abs, 6), ins("AND", And, Izx, 6), ins("???", Xxx, Imp, 2), ins("???", Xxx, Imp, 8),
    ins("BIT", Bit, Zp0, 3), ins("AND", And, Zp0, 3), ins("ROL", Rol, Zp0, 5), ins("???", Xxx, Imp, 5),
    ins("PLP", Plp, Imp, 4), ins("AND", And, Imm, 2), ins("ROL", Rol, Imp, 2), ins("???", Xxx, Imp, 2),
    ins("BIT", Bit, Abs, 4), ins("AND", And, Abs, 4), ins("ROL", Rol, Abs, 6), ins("???", Xxx, Imp, 6),
    // 0x30
    ins("BMI", Bmi, Rel, 2), ins("AND", And, Izy, 5), ins("???", Xxx, Imp, 2), ins("???", Xxx, Imp, 8),
    ins("???", Nop, Imp, 4), ins("AND", And, Zpx, 4), ins("ROL", Rol, Zpx, 6), ins("???", Xxx, Imp, 6),
    ins("SEC", Sec, Imp, 2), ins("AND", And, Aby, 4), ins("???", Nop, Imp, 2), ins("???", Xxx, Imp, 7),
    ins("???", Nop, Imp, 4), ins("AND", And, Abx, 4), ins("ROL", Rol, Abx, 7), ins("???", Xxx, Imp, 7),
    // 0x40
    ins("RTI", Rti, Imp, 6), ins("EOR", Eor, Izx, 6), ins("???", Xxx, Imp, 2), ins("???", Xxx, Imp, 8),
    ins("???", Nop, Imp, 3), ins("EOR", Eor, Zp0, 3), ins("LSR", Lsr, Zp0, 5), ins("???", Xxx, Imp, 5),
    ins("PHA", Pha, Imp, 3), ins("EOR", Eor, Imm, 2), ins("LSR", Lsr, Imp, 2), ins("???", Xxx, Imp, 2),
    ins("JMP", Jmp, Abs, 3), ins("EOR", Eor, Abs, 4), ins("LSR", Lsr, Abs, 6), ins("???", Xxx, Imp, 6),
    // 0x50
    ins("BVC", Bvc, Rel, 2), ins("EOR", Eor, Izy, 5), ins("???", Xxx, Imp, 2), ins("???", Xxx, Imp, 8),
    ins("???", Nop, Imp, 4), ins("EOR", Eor, Zpx, 4), ins("LSR", Lsr, Zpx, 6), ins("???", Xxx, Imp, 6),
    ins("CLI", Cli, Imp, 2), ins("EOR", Eor, Aby, 4), ins("???", Nop, Imp, 2), ins("???", Xxx, Imp, 7),
    ins("???", Nop, Imp, 4), ins("EOR", Eor, Abx, 4), ins("LSR", Lsr, Abx, 7), ins("???", Xxx, Imp, 7),
    // 0x60
    ins("RTS", Rts, Imp, 6), ins("ADC", Adc, Izx, 6), ins("???", Xxx, Imp, 2), ins("???", Xxx, Imp, 8),
    ins("???", Nop, Imp, 3), ins("ADC", Adc, Zp0, 3), ins("ROR", Ror, Zp0, 5), ins("???", Xxx, Imp, 5),
    ins("PLA", Pla, Imp, 4), ins("ADC", Adc, Imm, 2), ins("ROR", Ror, Imp, 2), ins("???", Xxx, Imp, 2),
    ins("JMP", Jmp, Ind, 5), ins("ADC", Adc, Abs, 4), ins("ROR", Ror, Abs, 6), ins("???", Xxx, Imp, 6),
    // 0x70
    ins("BVS", Bvs, Rel, 2), ins("ADC", Adc, Izy, 5), ins("???", Xxx, Imp, 2), ins("???", Xxx, Imp, 8),
    ins("???", Nop, Imp, 4), ins("ADC", Adc, Zpx, 4), ins("ROR", Ror, Zpx, 6), ins("???", Xxx, Imp, 6),
    ins("SEI", Sei, Imp, 2), ins("ADC", Adc, Aby, 4), ins("???", Nop, Imp, 2), ins("???", Xxx, Imp, 7),
    ins("???", Nop, Imp, 4), ins("ADC", Adc, Abx, 4), ins("ROR", Ror, Abx, 7), ins("???", Xxx, Imp, 7),
    // 0x80
    ins("???", Nop, Imp, 2), ins("STA", Sta, Izx, 6), ins("???", Nop, Imp, 2), ins("???", Xxx, Imp, 6),
    ins("STY", Sty, Zp0, 3), ins("STA", Sta, Zp0, 3), ins("STX", Stx, Zp0, 3), ins("???", Xxx, Imp, 3),
    ins("DEY", Dey, Imp, 2), ins("???", Nop, Imp, 2), ins("TXA", Txa, Imp, 2), ins("???", Xxx, Imp, 2),
    ins("STY", Sty, Abs, 4), ins("STA", Sta, Abs, 4), ins("STX", Stx, Abs, 4), ins("???", Xxx, Imp, 4),
    // 0x90
    ins("BCC", Bcc, Rel, 2), ins("STA", Sta, Izy, 6), ins("???", Xxx, Imp, 2), ins("???", Xxx, Imp, 6),
    ins("STY", Sty, Zpx, 4), ins("STA", Sta, Zpx, 4), ins("STX", Stx, Zpy, 4), ins("???", Xxx, Imp, 4),
    ins("TYA", Tya, Imp, 2), ins("STA", Sta, Aby, 5), ins("TXS", Txs, Imp, 2), ins("???", Xxx, Imp, 5),
    ins("???", Nop, Imp, 5), ins("STA", Sta, Abx, 5), ins("???", Xxx, Imp, 5), ins("???", Xxx, Imp, 5),
    // 0xA0
    ins("LDY", Ldy, Imm, 2), ins("LDA", Lda, Izx, 6), ins("LDX", Ldx, Imm, 2), ins("???", Xxx, Imp, 6),
    ins("LDY", Ldy, Zp0, 3), ins("LDA", Lda, Zp0, 3), ins("LDX", Ldx, Zp0, 3), ins("???", Xxx, Imp, 3),
    ins("TAY", Tay, Imp, 2), ins("LDA", Lda, Imm, 2), ins("TAX", Tax, Imp, 2), ins("???", Xxx, Imp, 2),
    ins("LDY", Ldy, Abs, 4), ins("LDA", Lda, Abs, 4), ins("LDX", Ldx, Abs, 4), ins("???", Xxx, Imp, 4),
    // 0xB0
    ins("BCS", Bcs, Rel, 2), ins("LDA", Lda, Izy, 5), ins("???", Xxx, Imp, 2), ins("???", Xxx, Imp, 5),
    ins("LDY", Ldy, Zpx, 4), ins("LDA", Lda, Zpx, 4), ins("LDX", Ldx, Zpy, 4), ins("???", Xxx, Imp, 4),
    ins("CLV", Clv, Imp, 2), ins("LDA", Lda, Aby, 4), ins("TSX", Tsx, Imp, 2), ins("???", Xxx, Imp, 4),
    ins("LDY", Ldy, Abx, 4), ins("LDA", Lda, Abx, 4), ins("LDX", Ldx, Aby, 4), ins("???", Xxx, Imp, 4),
    // 0xC0
    ins("CPY", Cpy, Imm, 2), ins("CMP", Cmp, Izx, 6), ins("???", Nop, Imp, 2), ins("???", Xxx, Imp, 8),
    ins("CPY", Cpy, Zp0, 3), ins("CMP", Cmp, Zp0, 3), ins("DEC", Dec, Zp0, 5), ins("???", Xxx, Imp, 5),
    ins("INY", Iny, Imp, 2), ins("CMP", Cmp, Imm, 2), ins("DEX", Dex, Imp, 2), ins("???", Xxx, Imp, 2),
    ins("CPY", Cpy, Abs, 4), ins("CMP", Cmp, Abs, 4), ins("DEC", Dec, Abs, 6), ins("???", Xxx, Imp, 6),
    // 0xD0
    ins("BNE", Bne, Rel, 2), ins("CMP", Cmp, Izy, 5), ins("???", Xxx, Imp, 2), ins("???", Xxx, Imp, 8),
    ins("???", Nop, Imp, 4), ins("CMP", Cmp, Zpx, 4), ins("DEC", Dec, Zpx, 6), ins("???", Xxx, Imp, 6),
    ins("CLD", Cld, Imp, 2), ins("CMP", Cmp, Aby, 4), ins("NOP", Nop, Imp, 2), ins("???", Xxx, Imp, 7),
    ins("???", Nop, Imp, 4), ins("CMP", Cmp, Abx, 4), ins("DEC", Dec, Abx, 7), ins("???", Xxx, Imp, 7),
    // 0xE0
    ins("CPX", Cpx, Imm, 2), ins("SBC", Sbc, Izx, 6), ins("???", Nop, Imp, 2), ins("???", Xxx, Imp, 8),
    ins("CPX", Cpx, Zp0, 3), ins("SBC", Sbc, Zp0, 3), ins("INC", Inc, Zp0, 5), ins("???", Xxx, Imp, 5),
    ins("INX", Inx, Imp, 2), ins("SBC", Sbc, Imm, 2), ins("NOP", Nop, Imp, 2), ins("???", Sbc, Imp, 2),
    ins("CPX", Cpx, Abs, 4), ins("SBC", Sbc, Abs, 4), ins("INC", Inc, Abs, 6), ins("???", Xxx, Imp, 6),
    // 0xF0
    ins("BEQ", Beq, Rel, 2), ins("SBC", Sbc, Izy, 5), ins("???", Xxx, Imp, 2), ins("???", Xxx, Imp, 8),
    ins("???", Nop, Imp, 4), ins("SBC", Sbc, Zpx, 4), ins("INC", Inc, Zpx, 6), ins("???", Xxx, Imp, 6),
    ins("SED", Sed, Imp, 2), ins("SBC", Sbc, Aby, 4), ins("NOP", Nop, Imp, 2), ins("???", Xxx, Imp, 7),
    ins("???", Nop, Imp, 4), ins("SBC", Sbc, Abx, 4), ins("INC", Inc, Abx, 7), ins("???", Xxx, Imp, 7),
];
