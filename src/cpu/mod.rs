/*!
cpu - Processor facade and execution engine.

Overview
========
`Cpu` owns the architectural state, the memory bus, the IRQ line latch, the
cycle counter and the active variant, and exposes the embedding surface:
reset, single step, run loops, interrupt entry points, memory-callback
registration and the optional trace sink.

One step, in order: service a pending maskable interrupt if admissible;
otherwise fetch the opcode, consult the table, variant-gate if needed,
execute through the dispatch families, accumulate cycles, and hand the
trace sink a record. A `Waiting` processor consumes nothing until an
interrupt arrives; a `Stopped` one consumes nothing until reset.
*/

pub mod addressing;
pub(crate) mod dispatch;
pub(crate) mod execute;
pub(crate) mod interrupts;
pub mod state;
pub mod table;

use crate::bus::Bus;
use crate::cpu::interrupts::IrqLines;
use crate::cpu::state::{CpuState, IRQ_VECTOR, NMI_VECTOR, RunMode, Variant};
use crate::cpu::table::OPCODE_TABLE;
use crate::loader::{self, Format, LoadError, LoadInfo};
use crate::trace::{TraceRecord, TraceSink};
use std::path::Path;

/// Post-step observation: where PC landed, what the step cost, and the
/// resulting status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    pub pc: u16,
    pub cycles: u32,
    pub flags: u8,
}

pub struct Cpu {
    state: CpuState,
    bus: Bus,
    irq: IrqLines,
    variant: Variant,
    cycles: u64,
    instr_count: u64,
    trace: Option<Box<dyn TraceSink>>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// NMOS 6502 with internal memory backing.
    pub fn new() -> Self {
        Self::with_variant(Variant::Base)
    }

    pub fn with_variant(variant: Variant) -> Self {
        Self {
            state: CpuState::new(),
            bus: Bus::new(),
            irq: IrqLines::new(),
            variant,
            cycles: 0,
            instr_count: 0,
            trace: None,
        }
    }

    // ---------------------------------------------------------------------
    // Embedding surface
    // ---------------------------------------------------------------------

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Route all memory traffic through host callbacks (see `Bus`).
    pub fn register_mem_callbacks<R, W>(&mut self, read_fn: R, write_fn: W)
    where
        R: FnMut(u16) -> u8 + 'static,
        W: FnMut(u16, u8) + 'static,
    {
        self.bus.register_callbacks(read_fn, write_fn);
    }

    /// Load a program image through the bus. See `loader` for formats.
    pub fn read_program(
        &mut self,
        path: &Path,
        format: Format,
        base: u16,
    ) -> Result<LoadInfo, LoadError> {
        loader::read_program(&mut self.bus, path, format, base)
    }

    /// Install a trace sink; each executed instruction produces one record.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace = Some(sink);
    }

    pub fn clear_trace_sink(&mut self) {
        self.trace = None;
    }

    /// Reset: power-up registers, PC from 0xFFFC/D, all IRQ lines released,
    /// cycle counter cleared, Waiting/Stopped left. Passing a variant
    /// switches the simulated family member; `None` keeps the current one.
    pub fn reset(&mut self, variant: Option<Variant>) {
        if let Some(v) = variant {
            self.variant = v;
        }
        self.state.reset(&mut self.bus);
        self.irq.clear_all();
        self.cycles = 0;
        self.instr_count = 0;
    }

    /// Edge-triggered non-maskable interrupt. Taken immediately, regardless
    /// of the I mask; ignored only by a stopped processor.
    pub fn nmi_interrupt(&mut self) {
        if self.state.mode == RunMode::Stopped {
            log::debug!("nmi ignored: processor stopped");
            return;
        }
        let c = interrupts::service_nmi(&mut self.state, &mut self.bus, NMI_VECTOR);
        self.cycles += c as u64;
    }

    /// Assert wired-OR IRQ line `id` (0..=15; out-of-range ids are
    /// ignored). Entry is evaluated before the next instruction.
    pub fn activate_irq(&mut self, id: u8) {
        self.irq.activate(id);
    }

    /// Release IRQ line `id`.
    pub fn deactivate_irq(&mut self, id: u8) {
        self.irq.deactivate(id);
    }

    // ---------------------------------------------------------------------
    // Register / state accessors
    // ---------------------------------------------------------------------

    pub fn a(&self) -> u8 {
        self.state.a
    }
    pub fn x(&self) -> u8 {
        self.state.x
    }
    pub fn y(&self) -> u8 {
        self.state.y
    }
    pub fn sp(&self) -> u8 {
        self.state.sp
    }
    pub fn pc(&self) -> u16 {
        self.state.pc
    }
    pub fn status(&self) -> u8 {
        self.state.status
    }
    pub fn variant(&self) -> Variant {
        self.variant
    }
    pub fn run_mode(&self) -> RunMode {
        self.state.mode
    }
    /// Total cycles since reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn set_pc(&mut self, v: u16) {
        self.state.pc = v;
    }
    pub fn set_a(&mut self, v: u8) {
        self.state.a = v;
    }
    pub fn set_x(&mut self, v: u8) {
        self.state.x = v;
    }
    pub fn set_y(&mut self, v: u8) {
        self.state.y = v;
    }
    pub fn set_status(&mut self, v: u8) {
        self.state.status = v;
    }

    /// Immutable view of the raw state (inspection / testing).
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// Mutable escape hatch for hosts that manage state directly.
    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    // ---------------------------------------------------------------------
    // Execution engine
    // ---------------------------------------------------------------------

    /// Execute one step: interrupt entry, an instruction, or nothing at all
    /// for a parked processor.
    pub fn step(&mut self) -> StepInfo {
        if self.state.mode == RunMode::Stopped {
            return self.observe(0);
        }

        // Maskable interrupt poll. Covers assertion since the last step as
        // well as the re-check CLI/PLP/RTI require: nothing can execute
        // between the I bit clearing and this poll.
        if interrupts::irq_admissible(&self.state, &self.irq) {
            let c = interrupts::service_irq(&mut self.state, &mut self.bus, IRQ_VECTOR);
            self.cycles += c as u64;
            return self.observe(c);
        }

        if self.state.mode == RunMode::Waiting {
            return self.observe(0);
        }

        let pc0 = self.state.pc;
        let opcode = self.bus.read(pc0);
        let entry = &OPCODE_TABLE[opcode as usize];
        let gated = entry.min_variant > self.variant;

        // Pre-execution snapshot for the sink, operand bytes included. A
        // gated entry renders with the mode that sizes its NOP substitution.
        let mut rec = self.trace.is_some().then(|| {
            let mode = if gated { entry.gated_mode } else { entry.mode };
            let len = 1 + mode.operand_len() as u8;
            let mut bytes = [opcode, 0, 0];
            for (i, slot) in bytes.iter_mut().enumerate().take(len as usize).skip(1) {
                *slot = self.bus.read(pc0.wrapping_add(i as u16));
            }
            TraceRecord {
                pc: pc0,
                bytes,
                len,
                mnemonic: (!gated).then_some(entry.mnemonic),
                mode,
                a: self.state.a,
                x: self.state.x,
                y: self.state.y,
                sp: self.state.sp,
                status: self.state.status,
                stack_top: self.bus.read(0x0100 | self.state.sp as u16),
                cycles: 0,
                total_cycles: 0,
                instr_index: self.instr_count,
            }
        });

        self.state.advance_pc_one();
        let cycles = dispatch::execute(&mut self.state, &mut self.bus, self.variant, entry, gated);
        self.cycles += cycles as u64;
        self.instr_count += 1;

        if let (Some(sink), Some(rec)) = (self.trace.as_deref_mut(), rec.as_mut()) {
            rec.cycles = cycles;
            rec.total_cycles = self.cycles;
            sink.record(rec);
        }

        self.observe(cycles)
    }

    /// Run until `max_instructions` steps have executed.
    pub fn run(&mut self, max_instructions: u64) {
        for _ in 0..max_instructions {
            self.step();
        }
    }

    /// Run without bound. Embedding hosts stop this from a memory callback
    /// (host policy) or by process exit.
    pub fn run_forever(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// Run until two consecutive steps report the same post-PC, the
    /// deliberate `JMP *`-style hang test programs end on. A Waiting or
    /// Stopped processor terminates this loop as well.
    pub fn run_until_self_loop(&mut self) -> StepInfo {
        let mut prev: Option<u16> = None;
        loop {
            let info = self.step();
            if prev == Some(info.pc) {
                return info;
            }
            prev = Some(info.pc);
        }
    }

    #[inline]
    fn observe(&self, cycles: u32) -> StepInfo {
        StepInfo {
            pc: self.state.pc,
            cycles,
            flags: self.state.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::state::{
        BREAK, CARRY, DECIMAL, IRQ_DISABLE, NEGATIVE, OVERFLOW, RESET_VECTOR, UNUSED, ZERO,
    };
    use crate::test_utils::{cpu_with_program, cpu_with_program_on};

    #[test]
    fn reset_vector_scenario() {
        let mut cpu = Cpu::new();
        cpu.bus_mut().write(0xFFFC, 0x00);
        cpu.bus_mut().write(0xFFFD, 0x80);
        cpu.reset(None);
        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(cpu.sp(), 0xFF);
        assert!(cpu.status() & IRQ_DISABLE != 0);
        assert_eq!(cpu.a(), 0);
        assert_eq!(cpu.x(), 0);
        assert_eq!(cpu.y(), 0);
        assert_eq!(cpu.cycles(), 0);
    }

    #[test]
    fn adc_immediate_overflow_scenario() {
        // A=0x50 + #$50: V and N set, C and Z clear.
        let mut cpu = cpu_with_program(0x8000, &[0x69, 0x50]);
        cpu.set_a(0x50);
        let info = cpu.step();
        assert_eq!(cpu.a(), 0xA0);
        assert_eq!(info.flags & CARRY, 0);
        assert_eq!(info.flags & ZERO, 0);
        assert_ne!(info.flags & OVERFLOW, 0);
        assert_ne!(info.flags & NEGATIVE, 0);
        assert_eq!(info.cycles, 2);
    }

    #[test]
    fn decimal_adc_scenario() {
        let mut cpu = cpu_with_program(0x8000, &[0xF8, 0x38, 0x69, 0x27]); // SED; SEC; ADC #$27
        cpu.set_a(0x15);
        cpu.step();
        cpu.step();
        let info = cpu.step();
        assert_eq!(cpu.a(), 0x43);
        assert_eq!(info.flags & CARRY, 0);
        assert_eq!(info.flags & ZERO, 0);
        // NMOS charges no decimal surcharge.
        assert_eq!(info.cycles, 2);
    }

    #[test]
    fn decimal_adc_extra_cycle_on_cmos() {
        let mut cpu = cpu_with_program_on(Variant::C02, 0x8000, &[0xF8, 0x69, 0x27]);
        cpu.step();
        let info = cpu.step();
        assert_eq!(info.cycles, 3);
    }

    #[test]
    fn jsr_rts_round_trip_scenario() {
        let mut cpu = cpu_with_program(0x0300, &[0x20, 0x00, 0x04]); // JSR $0400
        cpu.bus_mut().write(0x0400, 0x60); // RTS
        let sp_before = cpu.sp();
        let info = cpu.step();
        assert_eq!(info.pc, 0x0400);
        assert_eq!(info.cycles, 6);
        let info = cpu.step();
        assert_eq!(info.pc, 0x0303);
        assert_eq!(info.cycles, 6);
        assert_eq!(cpu.sp(), sp_before);
    }

    #[test]
    fn irq_entry_scenario() {
        // CLI first so the line is admissible, then assert line 3.
        let mut cpu = cpu_with_program(0x8000, &[0x58, 0xEA, 0xEA]);
        cpu.bus_mut().write(0xFFFE, 0x00);
        cpu.bus_mut().write(0xFFFF, 0x90);
        cpu.bus_mut().write(0x9000, 0xEA); // handler body
        cpu.step(); // CLI
        let pc_before = cpu.pc();
        let sp_before = cpu.sp();
        let p_before = cpu.status();
        cpu.activate_irq(3);

        let info = cpu.step(); // enters the interrupt instead of executing
        assert_eq!(info.pc, 0x9000);
        assert_eq!(info.cycles, 7);
        assert_ne!(info.flags & IRQ_DISABLE, 0);
        // Stack holds PC high, PC low, then P with B clear.
        let stack = |cpu: &mut Cpu, off: u8| cpu.bus_mut().read(0x0100 | (sp_before - off) as u16);
        assert_eq!(stack(&mut cpu, 0), (pc_before >> 8) as u8);
        assert_eq!(stack(&mut cpu, 1), pc_before as u8);
        let pushed = stack(&mut cpu, 2);
        assert_eq!(pushed & BREAK, 0);
        assert_eq!(pushed | BREAK | UNUSED, p_before | BREAK | UNUSED);

        // Line still asserted but I is set again: next step executes code.
        let info = cpu.step();
        assert_eq!(info.pc, 0x9001);
    }

    #[test]
    fn irq_masked_until_cli() {
        let mut cpu = cpu_with_program(0x8000, &[0xEA, 0x58, 0xEA]); // NOP; CLI; NOP
        cpu.bus_mut().write(0xFFFE, 0x00);
        cpu.bus_mut().write(0xFFFF, 0x90);
        cpu.activate_irq(0);
        let info = cpu.step(); // NOP executes, I still set from reset
        assert_eq!(info.pc, 0x8001);
        cpu.step(); // CLI
        let info = cpu.step(); // poll takes the interrupt before the NOP
        assert_eq!(info.pc, 0x9000);
        assert_eq!(info.cycles, 7);
    }

    #[test]
    fn deactivated_line_is_not_taken() {
        let mut cpu = cpu_with_program(0x8000, &[0x58, 0xEA]);
        cpu.step(); // CLI
        cpu.activate_irq(5);
        cpu.deactivate_irq(5);
        let info = cpu.step();
        assert_eq!(info.pc, 0x8002); // the NOP ran
    }

    #[test]
    fn branch_page_cross_scenario() {
        let mut cpu = cpu_with_program(0x02FE, &[0xF0, 0x04]); // BEQ +4
        cpu.set_status(cpu.status() | ZERO);
        let info = cpu.step();
        assert_eq!(info.pc, 0x0304);
        assert_eq!(info.cycles, 4); // base 2 + taken + page cross
    }

    #[test]
    fn branch_not_taken_costs_base() {
        let mut cpu = cpu_with_program(0x8000, &[0xF0, 0x04]);
        cpu.set_status(cpu.status() & !ZERO);
        let info = cpu.step();
        assert_eq!(info.pc, 0x8002);
        assert_eq!(info.cycles, 2);
    }

    #[test]
    fn nmos_indirect_jump_bug_scenario() {
        for (variant, expected) in [(Variant::Base, 0x4080), (Variant::C02, 0x5080)] {
            let mut cpu = cpu_with_program_on(variant, 0x8000, &[0x6C, 0xFF, 0x02]);
            cpu.bus_mut().write(0x02FF, 0x80);
            cpu.bus_mut().write(0x0200, 0x40);
            cpu.bus_mut().write(0x0300, 0x50);
            let info = cpu.step();
            assert_eq!(info.pc, expected, "variant {variant:?}");
        }
    }

    #[test]
    fn brk_rti_round_trip() {
        let mut cpu = cpu_with_program(0x8000, &[0x00, 0xFF, 0xEA]); // BRK; pad; NOP
        cpu.bus_mut().write(0xFFFE, 0x00);
        cpu.bus_mut().write(0xFFFF, 0x90);
        cpu.bus_mut().write(0x9000, 0x40); // RTI
        let p_before = cpu.status();
        let info = cpu.step(); // BRK
        assert_eq!(info.pc, 0x9000);
        assert_eq!(info.cycles, 7);
        let info = cpu.step(); // RTI
        assert_eq!(info.pc, 0x8002); // BRK address + 2
        assert_eq!(info.flags, p_before);
    }

    #[test]
    fn pha_pla_identity() {
        let mut cpu = cpu_with_program(0x8000, &[0x48, 0xA9, 0x00, 0x68]); // PHA; LDA #0; PLA
        cpu.set_a(0xC7);
        let sp_before = cpu.sp();
        cpu.run(3);
        assert_eq!(cpu.a(), 0xC7);
        assert_eq!(cpu.sp(), sp_before);
        assert_ne!(cpu.status() & NEGATIVE, 0);
    }

    #[test]
    fn variant_gated_opcode_is_sized_nop() {
        // STZ zp (0x64) does not exist on the NMOS part: two-byte NOP.
        let mut cpu = cpu_with_program(0x8000, &[0x64, 0x40, 0xEA]);
        cpu.bus_mut().write(0x0040, 0x55);
        let info = cpu.step();
        assert_eq!(info.pc, 0x8002);
        assert_eq!(cpu.bus_mut().read(0x0040), 0x55); // untouched

        // Same bytes on a 65C02 store zero.
        let mut cpu = cpu_with_program_on(Variant::C02, 0x8000, &[0x64, 0x40]);
        cpu.bus_mut().write(0x0040, 0x55);
        cpu.step();
        assert_eq!(cpu.bus_mut().read(0x0040), 0x00);
    }

    #[test]
    fn undocumented_nmos_bytes_advance_by_inferred_length() {
        // Each undefined byte advances PC by the operand length of the
        // NMOS illegal form occupying its slot, keeping decode in sync.
        let cases: &[(u8, u16)] = &[
            (0x02, 2), // JAM slot, sized as immediate
            (0x03, 2), // SLO (zp,X)
            (0x13, 2), // SLO (zp),Y
            (0x0B, 2), // ANC #imm
            (0x1B, 3), // SLO abs,Y
            (0x9B, 3), // TAS abs,Y
            (0xBB, 3), // LAS abs,Y
            (0xEB, 2), // SBC #imm
            (0xFB, 3), // ISC abs,Y
        ];
        for &(op, advance) in cases {
            let mut cpu = cpu_with_program(0x8000, &[op, 0xFF, 0xFF, 0xEA]);
            let info = cpu.step();
            assert_eq!(info.pc, 0x8000 + advance, "opcode {op:#04x}");
            assert_ne!(info.cycles, 0, "opcode {op:#04x}");
        }
    }

    #[test]
    fn wai_stp_bytes_gate_to_nmos_lengths_below_wdc() {
        // 0xCB/0xDB shadow AXS #imm and DCP abs,Y; on anything short of
        // the WDC part they must skip those operand bytes, not park.
        for variant in [Variant::Base, Variant::C02, Variant::Rockwell] {
            let mut cpu = cpu_with_program_on(variant, 0x8000, &[0xCB, 0x01, 0xDB, 0x34, 0x12]);
            let info = cpu.step();
            assert_eq!(info.pc, 0x8002, "variant {variant:?}");
            assert_eq!(cpu.run_mode(), RunMode::Running, "variant {variant:?}");
            let info = cpu.step();
            assert_eq!(info.pc, 0x8005, "variant {variant:?}");
            assert_eq!(cpu.run_mode(), RunMode::Running, "variant {variant:?}");
        }
    }

    #[test]
    fn wai_waits_until_interrupt() {
        let mut cpu = cpu_with_program_on(Variant::Wdc, 0x8000, &[0x58, 0xCB, 0xEA]); // CLI; WAI; NOP
        cpu.bus_mut().write(0xFFFE, 0x00);
        cpu.bus_mut().write(0xFFFF, 0x90);
        cpu.step(); // CLI
        let info = cpu.step(); // WAI
        assert_ne!(info.cycles, 0);
        assert_eq!(cpu.run_mode(), RunMode::Waiting);
        assert_eq!(info.pc, 0x8001); // parked on the WAI byte

        // Subsequent steps are free while waiting.
        assert_eq!(cpu.step().cycles, 0);
        assert_eq!(cpu.step().cycles, 0);

        cpu.activate_irq(0);
        let info = cpu.step();
        assert_eq!(info.pc, 0x9000);
        assert_eq!(cpu.run_mode(), RunMode::Running);
        // Return address on the stack is the byte after WAI.
        let sp = cpu.sp();
        let lo = cpu.bus_mut().read(0x0100 | sp.wrapping_add(2) as u16);
        let hi = cpu.bus_mut().read(0x0100 | sp.wrapping_add(3) as u16);
        assert_eq!((hi as u16) << 8 | lo as u16, 0x8002);
    }

    #[test]
    fn nmi_wakes_waiting_processor_regardless_of_mask() {
        let mut cpu = cpu_with_program_on(Variant::Wdc, 0x8000, &[0xCB, 0xEA]); // WAI (I set)
        cpu.bus_mut().write(0xFFFA, 0x00);
        cpu.bus_mut().write(0xFFFB, 0xA0);
        cpu.step();
        assert_eq!(cpu.run_mode(), RunMode::Waiting);
        cpu.nmi_interrupt();
        assert_eq!(cpu.pc(), 0xA000);
        assert_eq!(cpu.run_mode(), RunMode::Running);
    }

    #[test]
    fn stp_survives_interrupts_until_reset() {
        let mut cpu = cpu_with_program_on(Variant::Wdc, 0x8000, &[0x58, 0xDB]); // CLI; STP
        cpu.step();
        cpu.step();
        assert_eq!(cpu.run_mode(), RunMode::Stopped);

        cpu.activate_irq(0);
        let info = cpu.step();
        assert_eq!(info.cycles, 0); // IRQ ignored even with I clear
        assert_eq!(cpu.run_mode(), RunMode::Stopped);

        cpu.nmi_interrupt();
        assert_eq!(cpu.run_mode(), RunMode::Stopped);

        cpu.reset(None);
        assert_eq!(cpu.run_mode(), RunMode::Running);
    }

    #[test]
    fn decimal_flag_cleared_by_brk_on_cmos_only() {
        for (variant, expect_d) in [(Variant::Base, true), (Variant::C02, false)] {
            let mut cpu = cpu_with_program_on(variant, 0x8000, &[0xF8, 0x00]); // SED; BRK
            cpu.bus_mut().write(0xFFFE, 0x00);
            cpu.bus_mut().write(0xFFFF, 0x90);
            cpu.step();
            cpu.step();
            assert_eq!(cpu.status() & DECIMAL != 0, expect_d, "variant {variant:?}");
        }
    }

    #[test]
    fn run_until_self_loop_detects_hang() {
        // JMP * at 0x8003 after three NOPs.
        let mut cpu = cpu_with_program(0x8000, &[0xEA, 0xEA, 0xEA, 0x4C, 0x03, 0x80]);
        let info = cpu.run_until_self_loop();
        assert_eq!(info.pc, 0x8003);
    }

    #[test]
    fn sp_and_pc_stay_in_range_across_stack_wrap() {
        // Push more than the stack holds; SP wraps within page 1.
        let mut prg = vec![0x48; 300]; // PHA x 300
        prg.push(0x4C);
        prg.push(0x2C);
        prg.push(0x81); // JMP * at 0x812C
        let mut cpu = cpu_with_program(0x8000, &prg);
        cpu.run(300);
        // SP wrapped but stayed a u8; PC advanced one byte per PHA.
        assert_eq!(cpu.pc(), 0x8000 + 300);
    }

    #[test]
    fn read_program_delegates_to_loader() {
        let dir = std::env::temp_dir().join("m6502-readprog-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("image.bin");
        std::fs::write(&path, [0xA9u8, 0x7F]).unwrap();

        let mut cpu = Cpu::new();
        let info = cpu.read_program(&path, Format::Bin, 0x8000).unwrap();
        assert_eq!(info.bytes, 2);
        cpu.bus_mut().write(RESET_VECTOR, 0x00);
        cpu.bus_mut().write(RESET_VECTOR + 1, 0x80);
        cpu.reset(None);
        cpu.step();
        assert_eq!(cpu.a(), 0x7F);
    }
}
