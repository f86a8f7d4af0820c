/*!
execute.rs - Instruction semantics.

Every legal 6502 operation is a variant of `Op`; `Xxx` is the placeholder for undefined
opcodes and executes as a no-op with the cycle cost listed in the opcode table.

`Cpu::execute` returns 1 when the operation can absorb the page-cross penalty reported by
the addressing mode (read-type instructions). Branches add their own cycles directly.
*/

use super::addressing::AddrMode;
use super::state::Status;
use super::{Cpu, CpuBus};

#[rustfmt::skip]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    /// Undefined opcode.
    Xxx,
}

impl Cpu {
    pub(crate) fn execute(&mut self, op: Op, mode: AddrMode, bus: &mut impl CpuBus) -> u8 {
        match op {
            // Arithmetic
            Op::Adc => {
                let m = self.fetch(mode, bus);
                self.add_with_carry(m);
                1
            }
            Op::Sbc => {
                let m = self.fetch(mode, bus);
                self.add_with_carry(m ^ 0xFF);
                1
            }

            // Logic
            Op::And => {
                self.a &= self.fetch(mode, bus);
                self.update_zn(self.a);
                1
            }
            Op::Ora => {
                self.a |= self.fetch(mode, bus);
                self.update_zn(self.a);
                1
            }
            Op::Eor => {
                self.a ^= self.fetch(mode, bus);
                self.update_zn(self.a);
                1
            }
            Op::Bit => {
                let m = self.fetch(mode, bus);
                self.set_flag(Status::Z, (self.a & m) == 0);
                self.set_flag(Status::N, (m & 0x80) != 0);
                self.set_flag(Status::V, (m & 0x40) != 0);
                0
            }

            // Shifts and rotates
            Op::Asl => {
                let m = self.fetch(mode, bus);
                self.set_flag(Status::C, (m & 0x80) != 0);
                self.store_shifted(mode, bus, m << 1);
                0
            }
            Op::Lsr => {
                let m = self.fetch(mode, bus);
                self.set_flag(Status::C, (m & 0x01) != 0);
                self.store_shifted(mode, bus, m >> 1);
                0
            }
            Op::Rol => {
                let m = self.fetch(mode, bus);
                let carry = self.carry_in() as u8;
                self.set_flag(Status::C, (m & 0x80) != 0);
                self.store_shifted(mode, bus, (m << 1) | carry);
                0
            }
            Op::Ror => {
                let m = self.fetch(mode, bus);
                let carry = (self.carry_in() as u8) << 7;
                self.set_flag(Status::C, (m & 0x01) != 0);
                self.store_shifted(mode, bus, (m >> 1) | carry);
                0
            }

            // Branches
            Op::Bcc => self.branch(!self.flag(Status::C)),
            Op::Bcs => self.branch(self.flag(Status::C)),
            Op::Beq => self.branch(self.flag(Status::Z)),
            Op::Bne => self.branch(!self.flag(Status::Z)),
            Op::Bmi => self.branch(self.flag(Status::N)),
            Op::Bpl => self.branch(!self.flag(Status::N)),
            Op::Bvc => self.branch(!self.flag(Status::V)),
            Op::Bvs => self.branch(self.flag(Status::V)),

            // Flags
            Op::Clc => self.flag_op(Status::C, false),
            Op::Cld => self.flag_op(Status::D, false),
            Op::Cli => self.flag_op(Status::I, false),
            Op::Clv => self.flag_op(Status::V, false),
            Op::Sec => self.flag_op(Status::C, true),
            Op::Sed => self.flag_op(Status::D, true),
            Op::Sei => self.flag_op(Status::I, true),

            // Compare
            Op::Cmp => {
                let m = self.fetch(mode, bus);
                self.compare(self.a, m);
                1
            }
            Op::Cpx => {
                let m = self.fetch(mode, bus);
                self.compare(self.x, m);
                0
            }
            Op::Cpy => {
                let m = self.fetch(mode, bus);
                self.compare(self.y, m);
                0
            }

            // Increment / decrement
            Op::Dec => {
                let v = self.fetch(mode, bus).wrapping_sub(1);
                self.write(bus, self.addr_abs, v);
                self.update_zn(v);
                0
            }
            Op::Inc => {
                let v = self.fetch(mode, bus).wrapping_add(1);
                self.write(bus, self.addr_abs, v);
                self.update_zn(v);
                0
            }
            Op::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.update_zn(self.x);
                0
            }
            Op::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.update_zn(self.y);
                0
            }
            Op::Inx => {
                self.x = self.x.wrapping_add(1);
                self.update_zn(self.x);
                0
            }
            Op::Iny => {
                self.y = self.y.wrapping_add(1);
                self.update_zn(self.y);
                0
            }

            // Loads and stores
            Op::Lda => {
                self.a = self.fetch(mode, bus);
                self.update_zn(self.a);
                1
            }
            Op::Ldx => {
                self.x = self.fetch(mode, bus);
                self.update_zn(self.x);
                1
            }
            Op::Ldy => {
                self.y = self.fetch(mode, bus);
                self.update_zn(self.y);
                1
            }
            Op::Sta => {
                self.write(bus, self.addr_abs, self.a);
                0
            }
            Op::Stx => {
                self.write(bus, self.addr_abs, self.x);
                0
            }
            Op::Sty => {
                self.write(bus, self.addr_abs, self.y);
                0
            }

            // Transfers
            Op::Tax => {
                self.x = self.a;
                self.update_zn(self.x);
                0
            }
            Op::Tay => {
                self.y = self.a;
                self.update_zn(self.y);
                0
            }
            Op::Tsx => {
                self.x = self.sp;
                self.update_zn(self.x);
                0
            }
            Op::Txa => {
                self.a = self.x;
                self.update_zn(self.a);
                0
            }
            Op::Txs => {
                self.sp = self.x;
                0
            }
            Op::Tya => {
                self.a = self.y;
                self.update_zn(self.a);
                0
            }

            // Stack
            Op::Pha => {
                self.push(bus, self.a);
                0
            }
            Op::Php => {
                let pushed = self.status | Status::B | Status::U;
                self.push(bus, pushed.bits());
                0
            }
            Op::Pla => {
                self.a = self.pop(bus);
                self.update_zn(self.a);
                0
            }
            Op::Plp => {
                self.status = Status::from_bits_retain(self.pop(bus));
                self.status.remove(Status::B);
                self.status.insert(Status::U);
                0
            }

            // Control flow
            Op::Jmp => {
                self.pc = self.addr_abs;
                0
            }
            Op::Jsr => {
                self.pc = self.pc.wrapping_sub(1);
                self.push_pc(bus);
                self.pc = self.addr_abs;
                0
            }
            Op::Rts => {
                self.pop_pc(bus);
                self.pc = self.pc.wrapping_add(1);
                0
            }
            Op::Rti => {
                self.status = Status::from_bits_retain(self.pop(bus));
                self.status.remove(Status::B);
                self.status.insert(Status::U);
                self.pop_pc(bus);
                0
            }
            Op::Brk => {
                // Immediate mode already stepped over the padding byte.
                self.push_pc(bus);
                let pushed = self.status | Status::B | Status::U;
                self.push(bus, pushed.bits());
                self.status.insert(Status::I);
                self.pc = self.read_word(bus, 0xFFFE);
                0
            }

            Op::Nop => 0,
            Op::Xxx => {
                log::trace!("undefined opcode ${:02X} at ${:04X}", self.opcode, self.pc.wrapping_sub(1));
                0
            }
        }
    }

    /// A + M + C with carry and signed-overflow detection.
    pub(crate) fn add_with_carry(&mut self, m: u8) {
        let a = self.a as u16;
        let m = m as u16;
        let sum = a + m + self.carry_in();
        self.set_flag(Status::C, sum > 0xFF);
        self.set_flag(Status::V, ((!(a ^ m) & (a ^ sum)) & 0x0080) != 0);
        self.a = sum as u8;
        self.update_zn(self.a);
    }

    fn compare(&mut self, reg: u8, m: u8) {
        self.set_flag(Status::C, reg >= m);
        self.update_zn(reg.wrapping_sub(m));
    }

    /// Write back a shift result: accumulator in implied mode, memory otherwise.
    fn store_shifted(&mut self, mode: AddrMode, bus: &mut impl CpuBus, value: u8) {
        self.update_zn(value);
        if mode == AddrMode::Imp {
            self.a = value;
        } else {
            self.write(bus, self.addr_abs, value);
        }
    }

    fn branch(&mut self, taken: bool) -> u8 {
        if taken {
            self.cycles += 1;
            self.addr_abs = self.pc.wrapping_add(self.addr_rel);
            if (self.addr_abs & 0xFF00) != (self.pc & 0xFF00) {
                self.cycles += 1;
            }
            self.pc = self.addr_abs;
        }
        0
    }

    fn flag_op(&mut self, f: Status, v: bool) -> u8 {
        self.set_flag(f, v);
        0
    }
}
