/*!
state.rs - Architectural CPU state: status flags, stack discipline, flag helpers.

6502 Status Register Bit Layout
===============================
Bit: 7 6 5 4 3 2 1 0
     N V U B D I Z C
Where:
  N = negative
  V = overflow
  U = unused (reads back as 1 after any push made by the core)
  B = break (only meaningful in the byte pushed by BRK/PHP)
  D = decimal (settable, ignored by arithmetic on this CPU)
  I = interrupt disable
  Z = zero
  C = carry

The stack lives in page one ($0100-$01FF); `sp` is the offset of the next free slot and
grows downward.
*/

use bitflags::bitflags;

use super::{Cpu, CpuBus};

bitflags! {
    /// Processor status register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Status: u8 {
        const C = 0b0000_0001;
        const Z = 0b0000_0010;
        const I = 0b0000_0100;
        const D = 0b0000_1000;
        const B = 0b0001_0000;
        const U = 0b0010_0000;
        const V = 0b0100_0000;
        const N = 0b1000_0000;
    }
}

pub(crate) const STACK_BASE: u16 = 0x0100;

/// Stack pointer value after reset.
pub const SP_RESET: u8 = 0xFD;

impl Cpu {
    #[inline]
    pub fn flag(&self, f: Status) -> bool {
        self.status.contains(f)
    }

    #[inline]
    pub fn set_flag(&mut self, f: Status, v: bool) {
        self.status.set(f, v);
    }

    /// Z from the low byte, N from bit 7.
    #[inline]
    pub(crate) fn update_zn(&mut self, value: u8) {
        self.status.set(Status::Z, value == 0);
        self.status.set(Status::N, (value & 0x80) != 0);
    }

    #[inline]
    pub(crate) fn carry_in(&self) -> u16 {
        self.status.contains(Status::C) as u16
    }

    // ---------------------------------------------------------------------
    // Bus access
    // ---------------------------------------------------------------------

    #[inline]
    pub(crate) fn read(&mut self, bus: &mut impl CpuBus, addr: u16) -> u8 {
        bus.cpu_read(addr, false)
    }

    #[inline]
    pub(crate) fn write(&mut self, bus: &mut impl CpuBus, addr: u16, data: u8) {
        bus.cpu_write(addr, data);
    }

    /// Little-endian word read (no page wrap).
    pub(crate) fn read_word(&mut self, bus: &mut impl CpuBus, addr: u16) -> u16 {
        let lo = self.read(bus, addr) as u16;
        let hi = self.read(bus, addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    // ---------------------------------------------------------------------
    // Stack
    // ---------------------------------------------------------------------

    pub(crate) fn push(&mut self, bus: &mut impl CpuBus, value: u8) {
        self.write(bus, STACK_BASE + self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub(crate) fn pop(&mut self, bus: &mut impl CpuBus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.read(bus, STACK_BASE + self.sp as u16)
    }

    /// Push PC high byte first, then low byte.
    pub(crate) fn push_pc(&mut self, bus: &mut impl CpuBus) {
        self.push(bus, (self.pc >> 8) as u8);
        self.push(bus, self.pc as u8);
    }

    pub(crate) fn pop_pc(&mut self, bus: &mut impl CpuBus) {
        let lo = self.pop(bus) as u16;
        let hi = self.pop(bus) as u16;
        self.pc = (hi << 8) | lo;
    }

    /// Hardware interrupt entry shared by IRQ and NMI: PC and status (B clear, U set) are
    /// pushed, then I is set and PC is loaded from `vector`.
    pub(crate) fn interrupt(&mut self, bus: &mut impl CpuBus, vector: u16, cycles: u8) {
        self.push_pc(bus);
        self.status.remove(Status::B);
        self.status.insert(Status::U);
        self.push(bus, self.status.bits());
        self.status.insert(Status::I);
        self.pc = self.read_word(bus, vector);
        self.cycles = cycles;
    }
}
