/*!
load_store.rs - Load / store opcode family (LDA/LDX/LDY, STA/STX/STY, STZ).

Loads fetch their operand (paying the page-cross penalty on indexed reads)
and set Z/N. Stores resolve the destination and write a register; they never
touch flags and never pay a cross penalty (it is folded into their base
cycles). STZ is the 65C02 store-zero form.
*/

use crate::bus::Bus;
use crate::cpu::dispatch::{dest_addr, fetch_data};
use crate::cpu::execute::{lda, ldx, ldy};
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
        Mnemonic::Lda => {
            let v = fetch_data(st, bus, entry.mode, variant, cycles);
            lda(st, v);
        }
        Mnemonic::Ldx => {
            let v = fetch_data(st, bus, entry.mode, variant, cycles);
            ldx(st, v);
        }
        Mnemonic::Ldy => {
            let v = fetch_data(st, bus, entry.mode, variant, cycles);
            ldy(st, v);
        }
        Mnemonic::Sta => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            bus.write(addr, st.a);
        }
        Mnemonic::Stx => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            bus.write(addr, st.x);
        }
        Mnemonic::Sty => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            bus.write(addr, st.y);
        }
        Mnemonic::Stz => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            bus.write(addr, 0);
        }
        _ => return false,
    }
    true
}
