/*!
cpu - 6502 interpreter, cycle-counted at instruction granularity.

Layout:

    state.rs       - Status flags, stack discipline, interrupt entry.
    addressing.rs  - The twelve addressing modes and operand fetch.
    execute.rs     - Instruction semantics (`Op`).
    table.rs       - Immutable 256-entry opcode table.
    disasm.rs      - Read-only disassembler.

Timing model
============
`clock()` is called once per CPU cycle. When the remaining-cycle counter is zero the next
instruction is fetched and executed in full, and the counter is loaded with its base cost
plus any page-cross or branch penalty. Every call then decrements the counter, so an
instruction's side effects land on its first cycle and `complete()` reports the boundary.

`reset`, `irq` and `nmi` load the counter with their fixed entry cost (8, 7, 8). The owning
bus delivers interrupts; the CPU does not latch them.

The CPU reaches memory only through `CpuBus`, so it can be driven by the full system bus
or by a flat 64 KiB array in tests.

```ignore
use nes_engine::cpu::{Cpu, CpuBus};

let mut cpu = Cpu::new();
cpu.reset(&mut bus);
loop {
    cpu.clock(&mut bus);
    if cpu.complete() { break; }
}
```
*/

pub mod addressing;
pub mod disasm;
pub mod execute;
pub mod state;
pub mod table;

pub use addressing::AddrMode;
pub use execute::Op;
pub use state::{SP_RESET, Status};
pub use table::{Instruction, LOOKUP};

/// Memory interface the CPU executes against.
pub trait CpuBus {
    /// Read a byte. `read_only` reads must not trigger side effects (debug/disassembly).
    fn cpu_read(&mut self, addr: u16, read_only: bool) -> u8;
    fn cpu_write(&mut self, addr: u16, data: u8);
}

pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;
pub const NMI_VECTOR: u16 = 0xFFFA;

#[derive(Debug, Clone, Default)]
pub struct Cpu {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: Status,

    // Per-instruction scratch
    pub(crate) fetched: u8,
    pub(crate) addr_abs: u16,
    pub(crate) addr_rel: u16,
    pub(crate) opcode: u8,
    pub(crate) cycles: u8,

    clock_count: u64,
}

impl Cpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load PC from $FFFC/$FFFD and restore power-on register values.
    pub fn reset(&mut self, bus: &mut impl CpuBus) {
        self.pc = self.read_word(bus, RESET_VECTOR);
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = SP_RESET;
        self.status = Status::U;

        self.addr_rel = 0;
        self.addr_abs = 0;
        self.fetched = 0;

        self.cycles = 8;
    }

    /// Maskable interrupt; ignored while I is set.
    pub fn irq(&mut self, bus: &mut impl CpuBus) {
        if !self.flag(Status::I) {
            self.interrupt(bus, IRQ_VECTOR, 7);
        }
    }

    /// Non-maskable interrupt.
    pub fn nmi(&mut self, bus: &mut impl CpuBus) {
        self.interrupt(bus, NMI_VECTOR, 8);
    }

    /// Advance one CPU cycle.
    pub fn clock(&mut self, bus: &mut impl CpuBus) {
        if self.cycles == 0 {
            self.opcode = self.fetch_pc(bus);
            self.status.insert(Status::U);

            let ins = &LOOKUP[self.opcode as usize];
            self.cycles = ins.cycles;

            let addr_extra = self.resolve(ins.mode, bus);
            let op_extra = self.execute(ins.op, ins.mode, bus);
            self.cycles += addr_extra & op_extra;

            self.status.insert(Status::U);
        }

        self.clock_count += 1;
        self.cycles -= 1;
    }

    /// True on an instruction boundary.
    #[inline]
    pub fn complete(&self) -> bool {
        self.cycles == 0
    }

    /// Run to the end of the current instruction (or execute the next one) and return the
    /// number of cycles spent.
    pub fn step(&mut self, bus: &mut impl CpuBus) -> u32 {
        let mut spent = 0;
        loop {
            self.clock(bus);
            spent += 1;
            if self.complete() {
                return spent;
            }
        }
    }

    /// Total cycles clocked since construction.
    pub fn clock_count(&self) -> u64 {
        self.clock_count
    }

    /// Cycles left before the next fetch.
    pub fn cycles_remaining(&self) -> u8 {
        self.cycles
    }

    pub fn opcode(&self) -> u8 {
        self.opcode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FlatBus;

    fn boot(program: &[u8]) -> (Cpu, FlatBus) {
        let mut bus = FlatBus::with_program(0x8000, program);
        bus.set_vectors(0x8000, 0x9000, 0xA000);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        // Burn the reset sequence
        while !cpu.complete() {
            cpu.clock(&mut bus);
        }
        (cpu, bus)
    }

    #[test]
    fn reset_loads_vector_and_defaults() {
        let mut bus = FlatBus::new();
        bus.mem[0xFFFC] = 0x34;
        bus.mem[0xFFFD] = 0x12;
        let mut cpu = Cpu::new();
        cpu.a = 0x55;
        cpu.status = Status::all();
        cpu.reset(&mut bus);

        assert_eq!(cpu.pc, 0x1234);
        assert_eq!(cpu.sp, 0xFD);
        assert_eq!((cpu.a, cpu.x, cpu.y), (0, 0, 0));
        assert_eq!(cpu.status, Status::U);
        assert_eq!(cpu.cycles_remaining(), 8);
        assert!(!cpu.complete());
    }

    #[test]
    fn countdown_loop_end_state() {
        // LDX #$0A; STX $00; DEX; BNE -3 (back to DEX)
        let (mut cpu, mut bus) = boot(&[0xA2, 0x0A, 0x86, 0x00, 0xCA, 0xD0, 0xFD]);
        let mut guard = 0;
        while cpu.pc != 0x8007 {
            cpu.step(&mut bus);
            guard += 1;
            assert!(guard < 100, "loop did not terminate");
        }
        assert_eq!(cpu.x, 0x00);
        assert_eq!(bus.mem[0x0000], 0x0A);
        assert!(cpu.flag(Status::Z));
    }

    #[test]
    fn countdown_loop_cycle_accounting() {
        let (mut cpu, mut bus) = boot(&[0xA2, 0x0A, 0x86, 0x00, 0xCA, 0xD0, 0xFD]);
        let start = cpu.clock_count();

        assert_eq!(cpu.step(&mut bus), 2); // LDX #
        assert_eq!(cpu.step(&mut bus), 3); // STX zp
        // Nine taken iterations: DEX (2) + BNE taken, same page (3)
        for _ in 0..9 {
            assert_eq!(cpu.step(&mut bus), 2);
            assert_eq!(cpu.step(&mut bus), 3);
        }
        // Final iteration: branch not taken
        assert_eq!(cpu.step(&mut bus), 2);
        assert_eq!(cpu.step(&mut bus), 2);
        assert_eq!(cpu.clock_count() - start, 2 + 3 + 9 * 5 + 4);
    }

    #[test]
    fn page_cross_costs_extra_cycle_for_reads_only() {
        // LDA $12FF,X with X=1 crosses; STA $12FF,X never pays the penalty
        let (mut cpu, mut bus) = boot(&[0xA2, 0x01, 0xBD, 0xFF, 0x12, 0x9D, 0xFF, 0x12]);
        cpu.step(&mut bus);
        assert_eq!(cpu.step(&mut bus), 5);
        assert_eq!(cpu.step(&mut bus), 5);
    }

    #[test]
    fn branch_to_other_page_costs_two_extra() {
        // At $80FD: BNE +2 -> $8101
        let mut bus = FlatBus::new();
        bus.mem[0x80FD] = 0xD0;
        bus.mem[0x80FE] = 0x02;
        let mut cpu = Cpu::new();
        cpu.pc = 0x80FD;
        assert_eq!(cpu.step(&mut bus), 4);
        assert_eq!(cpu.pc, 0x8101);
    }

    #[test]
    fn jsr_rts_round_trip() {
        // JSR $8010; LDY #$01 ... $8010: LDX #$07; RTS
        let mut program = vec![0u8; 0x20];
        program[..5].copy_from_slice(&[0x20, 0x10, 0x80, 0xA0, 0x01]);
        program[0x10..0x13].copy_from_slice(&[0xA2, 0x07, 0x60]);
        let (mut cpu, mut bus) = boot(&program);

        assert_eq!(cpu.step(&mut bus), 6);
        assert_eq!(cpu.pc, 0x8010);
        assert_eq!(bus.mem[0x01FD], 0x80);
        assert_eq!(bus.mem[0x01FC], 0x02);
        cpu.step(&mut bus);
        assert_eq!(cpu.step(&mut bus), 6);
        assert_eq!(cpu.pc, 0x8003);
        cpu.step(&mut bus);
        assert_eq!((cpu.x, cpu.y), (0x07, 0x01));
    }

    #[test]
    fn jmp_indirect_page_wrap() {
        let (mut cpu, mut bus) = boot(&[0x6C, 0xFF, 0x02]);
        bus.mem[0x02FF] = 0x00;
        bus.mem[0x0200] = 0x90;
        bus.mem[0x0300] = 0x40;
        assert_eq!(cpu.step(&mut bus), 5);
        assert_eq!(cpu.pc, 0x9000);
    }

    #[test]
    fn irq_is_masked_by_interrupt_disable() {
        let (mut cpu, mut bus) = boot(&[0xEA]);
        cpu.set_flag(Status::I, true);
        cpu.irq(&mut bus);
        assert_eq!(cpu.pc, 0x8000);
        assert!(cpu.complete());

        cpu.set_flag(Status::I, false);
        cpu.irq(&mut bus);
        assert_eq!(cpu.pc, 0xA000);
        assert_eq!(cpu.cycles_remaining(), 7);
        assert!(cpu.flag(Status::I));
        // Pushed status: B clear, U set, I as it was before entry (clear)
        let pushed = Status::from_bits_retain(bus.mem[0x01FB]);
        assert!(!pushed.contains(Status::B));
        assert!(pushed.contains(Status::U));
        assert!(!pushed.contains(Status::I));
        assert_eq!(bus.mem[0x01FD], 0x80);
        assert_eq!(bus.mem[0x01FC], 0x00);
    }

    #[test]
    fn nmi_ignores_interrupt_disable() {
        let (mut cpu, mut bus) = boot(&[0xEA]);
        cpu.set_flag(Status::I, true);
        cpu.nmi(&mut bus);
        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(cpu.cycles_remaining(), 8);
        assert_eq!(cpu.sp, 0xFA);
    }

    #[test]
    fn brk_pushes_break_and_rti_returns() {
        // BRK, pad; handler at $A000: RTI
        let (mut cpu, mut bus) = boot(&[0x00, 0xFF, 0xE8]);
        bus.mem[0xA000] = 0x40;
        assert_eq!(cpu.step(&mut bus), 7);
        assert_eq!(cpu.pc, 0xA000);
        let pushed = Status::from_bits_retain(bus.mem[0x01FB]);
        assert!(pushed.contains(Status::B | Status::U));
        assert!(cpu.flag(Status::I));

        assert_eq!(cpu.step(&mut bus), 6);
        assert_eq!(cpu.pc, 0x8002);
        assert!(!cpu.flag(Status::B));
        assert!(cpu.flag(Status::U));
        cpu.step(&mut bus);
        assert_eq!(cpu.x, 1);
    }

    #[test]
    fn php_plp_and_pla_flags() {
        // SEC; PHP; CLC; PLP; LDA #$80; PHA; LDA #$00; PLA
        let (mut cpu, mut bus) = boot(&[0x38, 0x08, 0x18, 0x28, 0xA9, 0x80, 0x48, 0xA9, 0x00, 0x68]);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(bus.mem[0x01FD] & 0x31, 0x31); // B | U | C
        cpu.step(&mut bus);
        assert!(!cpu.flag(Status::C));
        cpu.step(&mut bus);
        assert!(cpu.flag(Status::C));
        assert!(!cpu.flag(Status::B));
        for _ in 0..4 {
            cpu.step(&mut bus);
        }
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.flag(Status::N));
        assert!(!cpu.flag(Status::Z));
    }

    #[test]
    fn shifts_target_accumulator_or_memory() {
        // LDA #$81; ASL A; ROR $10 (with $10 = $02, C=1 from ASL)
        let (mut cpu, mut bus) = boot(&[0xA9, 0x81, 0x0A, 0x66, 0x10]);
        bus.mem[0x0010] = 0x02;
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x02);
        assert!(cpu.flag(Status::C));
        assert_eq!(cpu.step(&mut bus), 5);
        assert_eq!(bus.mem[0x0010], 0x81);
        assert!(!cpu.flag(Status::C));
        assert!(cpu.flag(Status::N));
    }

    #[test]
    fn undefined_opcode_is_a_timed_noop() {
        let (mut cpu, mut bus) = boot(&[0x02, 0xE8]);
        assert_eq!(cpu.step(&mut bus), 2);
        assert_eq!(cpu.pc, 0x8001);
        cpu.step(&mut bus);
        assert_eq!(cpu.x, 1);
    }

    #[test]
    fn implied_nops_cost_their_table_cycles() {
        // LDX #$FF, then the $1C/$3C/.. NOP family with X high enough to cross a page
        let mut program = vec![0xA2, 0xFF];
        program.extend_from_slice(&[0x1C, 0x3C, 0x5C, 0x7C, 0xDC, 0xFC]);
        let (mut cpu, mut bus) = boot(&program);
        cpu.step(&mut bus);

        for (i, opcode) in program[2..].iter().enumerate() {
            let ins = &LOOKUP[*opcode as usize];
            assert_eq!(ins.mode, AddrMode::Imp);
            assert_eq!(cpu.step(&mut bus), ins.cycles as u32, "opcode ${opcode:02X}");
            assert_eq!(cpu.pc, 0x8003 + i as u16);
        }
    }

    #[test]
    fn plp_keeps_unused_flag_set() {
        // LDA #$00; PHA; PLP pops a byte with U clear
        let (mut cpu, mut bus) = boot(&[0xA9, 0x00, 0x48, 0x28]);
        for _ in 0..3 {
            cpu.step(&mut bus);
        }
        assert_eq!(cpu.status, Status::U);
    }
}
