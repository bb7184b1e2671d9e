/*!
compare.rs - Compare opcode family (CMP/CPX/CPY).

Computes register minus operand in 8 bits: C set when the register is >=
the operand, Z on equality, N from bit 7 of the difference. The accumulator
compare pays the indexed-read page-cross penalty like any other read.
*/

use crate::bus::Bus;
use crate::cpu::dispatch::fetch_data;
use crate::cpu::execute::compare;
use crate::cpu::state::{CpuState, Variant};
use crate::cpu::table::{Mnemonic, OpInfo};

pub(super) fn handle(
    entry: &OpInfo,
    st: &mut CpuState,
    bus: &mut Bus,
    variant: Variant,
    cycles: &mut u32,
) -> bool {
    match entry.mnemonic {
        Mnemonic::Cmp => {
            let v = fetch_data(st, bus, entry.mode, variant, cycles);
            let r = st.a;
            compare(st, r, v);
        }
        Mnemonic::Cpx => {
            let v = fetch_data(st, bus, entry.mode, variant, cycles);
            let r = st.x;
            compare(st, r, v);
        }
        Mnemonic::Cpy => {
            let v = fetch_data(st, bus, entry.mode, variant, cycles);
            let r = st.y;
            compare(st, r, v);
        }
        _ => return false,
    }
    true
}
