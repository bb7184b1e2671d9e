/*!
dispatch - Orchestrator for executing one decoded instruction.

Overview
========
`execute` receives the opcode-table entry for an already-fetched opcode
(PC points at the first operand byte) and routes it through the family
handlers in turn:

1. `load_store` - LDA/LDX/LDY, STA/STX/STY, STZ
2. `logical`    - AND/ORA/EOR, BIT, TSB/TRB
3. `arithmetic` - ADC/SBC (binary and decimal)
4. `compare`    - CMP/CPX/CPY
5. `branches`   - conditional relative branches and BRA
6. `rmw`        - shifts/rotates and INC/DEC (accumulator and memory)
7. `control_flow` - JMP/JSR/RTS/RTI/BRK
8. `misc`       - transfers, register inc/dec, stack ops, flag ops
9. `cmos`       - Rockwell bit ops and the WDC WAI/STP states

Anything left over is a NOP row (documented 0xEA or a sized undefined
byte): PC advances over the operand bytes and the base cycles stand.

Cycle Rules
===========
- `*cycles` starts at the entry's base cycles.
- Handlers add +1 for page crossings on read-type indexed modes, +1/+2 for
  taken branches, and +1 for decimal-mode ADC/SBC on CMOS variants.
- Variant-gated entries bypass the families entirely: they execute as NOPs
  sized by the entry's `gated_mode` (the NMOS operand length for bytes a
  later part repurposed), charging the base cycles.
*/

pub(crate) mod arithmetic;
pub(crate) mod branches;
pub(crate) mod cmos;
pub(crate) mod compare;
pub(crate) mod control_flow;
pub(crate) mod load_store;
pub(crate) mod logical;
pub(crate) mod misc;
pub(crate) mod rmw;

use crate::bus::Bus;
use crate::cpu::addressing::{Mode, Operand, resolve};
use crate::cpu::state::{CpuState, Variant};
use crate::cpu::table::OpInfo;

/// Execute one instruction whose opcode byte has been fetched (PC is past
/// it). Returns total cycles consumed including penalties.
pub(crate) fn execute(
    st: &mut CpuState,
    bus: &mut Bus,
    variant: Variant,
    entry: &OpInfo,
    gated: bool,
) -> u32 {
    let mut cycles = entry.base_cycles as u32;

    if !gated
        && (load_store::handle(entry, st, bus, variant, &mut cycles)
            || logical::handle(entry, st, bus, variant, &mut cycles)
            || arithmetic::handle(entry, st, bus, variant, &mut cycles)
            || compare::handle(entry, st, bus, variant, &mut cycles)
            || branches::handle(entry, st, bus, variant, &mut cycles)
            || rmw::handle(entry, st, bus, variant, &mut cycles)
            || control_flow::handle(entry, st, bus, variant, &mut cycles)
            || misc::handle(entry, st, bus, variant, &mut cycles)
            || cmos::handle(entry, st, bus, variant, &mut cycles))
    {
        return cycles;
    }

    // NOP row, or an entry gated above the active variant: consume the
    // operand bytes the addressing mode implies and charge base cycles.
    let mode = if gated { entry.gated_mode } else { entry.mode };
    st.advance_pc(mode.operand_len());
    cycles
}

/// Resolve and read a data operand, charging the +1 page-cross penalty
/// read-type instructions pay on ABS,X / ABS,Y / (zp),Y.
pub(super) fn fetch_data(
    st: &mut CpuState,
    bus: &mut Bus,
    mode: Mode,
    variant: Variant,
    cycles: &mut u32,
) -> u8 {
    let r = resolve(st, bus, mode, variant);
    if r.page_crossed {
        *cycles += 1;
    }
    match r.operand {
        Operand::Mem(addr) => bus.read(addr),
        Operand::Acc => st.a,
        Operand::None => 0,
    }
}

/// Resolve a destination address for stores and memory RMW. No page-cross
/// penalty: those instructions carry the cost in their base cycles.
pub(super) fn dest_addr(st: &mut CpuState, bus: &mut Bus, mode: Mode, variant: Variant) -> u16 {
    match resolve(st, bus, mode, variant).operand {
        Operand::Mem(addr) => addr,
        // Table rows route Acc/Non operands before asking for an address.
        Operand::Acc | Operand::None => unreachable!("address-less mode in dest_addr"),
    }
}
