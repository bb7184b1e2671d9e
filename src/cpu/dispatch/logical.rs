/*!
logical.rs - Bitwise opcode family (AND/ORA/EOR, BIT, TSB/TRB).

AND/ORA/EOR combine into A with Z/N. BIT is mode-sensitive: the immediate
form (65C02) affects only Z, the memory forms also copy the operand's bits
7/6 into N/V. TSB/TRB are the 65C02 test-and-set / test-and-reset memory
ops, setting Z from A & M before the write.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Mode;
use crate::cpu::dispatch::{dest_addr, fetch_data};
use crate::cpu::execute::{and, bit, bit_imm, eor, ora, trb, tsb};
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
        Mnemonic::And => {
            let v = fetch_data(st, bus, entry.mode, variant, cycles);
            and(st, v);
        }
        Mnemonic::Ora => {
            let v = fetch_data(st, bus, entry.mode, variant, cycles);
            ora(st, v);
        }
        Mnemonic::Eor => {
            let v = fetch_data(st, bus, entry.mode, variant, cycles);
            eor(st, v);
        }
        Mnemonic::Bit => {
            let v = fetch_data(st, bus, entry.mode, variant, cycles);
            if entry.mode == Mode::Imm {
                bit_imm(st, v);
            } else {
                bit(st, v);
            }
        }
        Mnemonic::Tsb => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            tsb(st, bus, addr);
        }
        Mnemonic::Trb => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            trb(st, bus, addr);
        }
        _ => return false,
    }
    true
}
