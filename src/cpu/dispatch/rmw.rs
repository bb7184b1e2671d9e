/*!
rmw.rs - Shift / rotate / increment / decrement opcode family.

Handles ASL/LSR/ROL/ROR and INC/DEC in both their accumulator and memory
forms (the accumulator INC/DEC are 65C02 additions). Memory forms go
through the single read + write RMW choreography in `execute`; no
page-cross penalty applies, the indexed forms carry it in base cycles.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Mode;
use crate::cpu::dispatch::dest_addr;
use crate::cpu::execute::{
    asl_acc, asl_mem, dec_mem, inc_mem, lsr_acc, lsr_mem, rol_acc, rol_mem, ror_acc, ror_mem,
};
use crate::cpu::state::{CpuState, Variant};
use crate::cpu::table::{Mnemonic, OpInfo};

pub(super) fn handle(
    entry: &OpInfo,
    st: &mut CpuState,
    bus: &mut Bus,
    variant: Variant,
    _cycles: &mut u32,
) -> bool {
    let acc = entry.mode == Mode::Acc;
    match entry.mnemonic {
        Mnemonic::Asl if acc => asl_acc(st),
        Mnemonic::Lsr if acc => lsr_acc(st),
        Mnemonic::Rol if acc => rol_acc(st),
        Mnemonic::Ror if acc => ror_acc(st),
        Mnemonic::Inc if acc => {
            st.a = st.a.wrapping_add(1);
            st.update_zn(st.a);
        }
        Mnemonic::Dec if acc => {
            st.a = st.a.wrapping_sub(1);
            st.update_zn(st.a);
        }
        Mnemonic::Asl => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            asl_mem(st, bus, addr);
        }
        Mnemonic::Lsr => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            lsr_mem(st, bus, addr);
        }
        Mnemonic::Rol => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            rol_mem(st, bus, addr);
        }
        Mnemonic::Ror => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            ror_mem(st, bus, addr);
        }
        Mnemonic::Inc => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            inc_mem(st, bus, addr);
        }
        Mnemonic::Dec => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            dec_mem(st, bus, addr);
        }
        _ => return false,
    }
    true
}
