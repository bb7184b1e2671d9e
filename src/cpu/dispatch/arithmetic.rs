/*!
arithmetic.rs - ADC / SBC opcode family.

Fetches the operand (paying indexed-read page-cross penalties) and defers
to the binary or decimal add/subtract in `execute`. The CMOS variants
charge one extra cycle in decimal mode; that surcharge comes back from the
helper and is added here.
*/

use crate::bus::Bus;
use crate::cpu::dispatch::fetch_data;
use crate::cpu::execute::{adc, sbc};
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
        Mnemonic::Adc => {
            let v = fetch_data(st, bus, entry.mode, variant, cycles);
            *cycles += adc(st, v, variant);
        }
        Mnemonic::Sbc => {
            let v = fetch_data(st, bus, entry.mode, variant, cycles);
            *cycles += sbc(st, v, variant);
        }
        _ => return false,
    }
    true
}
