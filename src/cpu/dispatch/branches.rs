/*!
branches.rs - Relative branch opcode family.

Covers the eight conditional branches plus the 65C02 unconditional BRA.
`branch_cond` fetches the displacement, applies the branch when the
condition holds, and reports the extra cycles: +1 taken, +2 taken across a
page boundary. BRA always takes, so it lands at 3 cycles (4 crossing).
*/

use crate::bus::Bus;
use crate::cpu::execute::branch_cond;
use crate::cpu::state::{CARRY, CpuState, NEGATIVE, OVERFLOW, Variant, ZERO};
use crate::cpu::table::{Mnemonic, OpInfo};

pub(super) fn handle(
    entry: &OpInfo,
    st: &mut CpuState,
    bus: &mut Bus,
    _variant: Variant,
    cycles: &mut u32,
) -> bool {
    let take = match entry.mnemonic {
        Mnemonic::Bpl => !st.is_flag_set(NEGATIVE),
        Mnemonic::Bmi => st.is_flag_set(NEGATIVE),
        Mnemonic::Bvc => !st.is_flag_set(OVERFLOW),
        Mnemonic::Bvs => st.is_flag_set(OVERFLOW),
        Mnemonic::Bcc => !st.is_flag_set(CARRY),
        Mnemonic::Bcs => st.is_flag_set(CARRY),
        Mnemonic::Bne => !st.is_flag_set(ZERO),
        Mnemonic::Beq => st.is_flag_set(ZERO),
        Mnemonic::Bra => true,
        _ => return false,
    };
    *cycles += branch_cond(st, bus, take);
    true
}
