/*!
control_flow.rs - Jump / subroutine / interrupt-return family (JMP/JSR/RTS/RTI/BRK).

Semantics:
- JMP sets PC to the resolved target. The indirect form carries the NMOS
  page-wrap quirk on `Base` (resolved inside `addressing`); the 65C02 adds
  the (abs,X) form.
- JSR pushes (PC - 1) high-then-low and jumps; RTS pops and adds one.
- RTI pops P (reserved bit set, B clear) then PC, with no increment.
- BRK skips its pad byte, pushes PC then P with B and the reserved bit set,
  masks IRQs, and takes the 0xFFFE/F vector; the CMOS parts also clear D.
*/

use crate::bus::Bus;
use crate::cpu::dispatch::dest_addr;
use crate::cpu::execute::plp;
use crate::cpu::state::{CpuState, DECIMAL, IRQ_DISABLE, IRQ_VECTOR, Variant};
use crate::cpu::table::{Mnemonic, OpInfo};

pub(super) fn handle(
    entry: &OpInfo,
    st: &mut CpuState,
    bus: &mut Bus,
    variant: Variant,
    _cycles: &mut u32,
) -> bool {
    match entry.mnemonic {
        Mnemonic::Jmp => {
            st.pc = dest_addr(st, bus, entry.mode, variant);
        }
        Mnemonic::Jsr => {
            let target = dest_addr(st, bus, entry.mode, variant);
            let ret = st.pc.wrapping_sub(1);
            st.push_u16(bus, ret);
            st.pc = target;
        }
        Mnemonic::Rts => {
            st.pc = st.pop_u16(bus).wrapping_add(1);
        }
        Mnemonic::Rti => {
            plp(st, bus);
            st.pc = st.pop_u16(bus);
        }
        Mnemonic::Brk => {
            // Pad byte: the return address skips the byte after BRK.
            st.advance_pc_one();
            let pc = st.pc;
            st.push_u16(bus, pc);
            let p = st.compose_status_for_push(true);
            st.push_u8(bus, p);
            st.assign_flag(IRQ_DISABLE, true);
            if variant >= Variant::C02 {
                st.assign_flag(DECIMAL, false);
            }
            st.pc = bus.read_word(IRQ_VECTOR);
        }
        _ => return false,
    }
    true
}
