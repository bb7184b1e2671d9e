/*!
misc.rs - Transfers, register steps, stack traffic and flag-direct opcodes.

Everything here is implied-operand: TAX/TAY/TXA/TYA/TSX/TXS, INX/INY/DEX/
DEY, PHA/PHP/PLA/PLP (plus the 65C02 PHX/PHY/PLX/PLY), and the seven
flag-direct instructions. The IRQ re-check that CLI and PLP require happens
at the top of the next step, before any instruction byte is fetched.
*/

use crate::bus::Bus;
use crate::cpu::execute::{
    dex, dey, inx, iny, pha, php, phx, phy, pla, plp, plx, ply, tax, tay, tsx, txa, txs, tya,
};
use crate::cpu::state::{CARRY, CpuState, DECIMAL, IRQ_DISABLE, OVERFLOW, Variant};
use crate::cpu::table::{Mnemonic, OpInfo};

pub(super) fn handle(
    entry: &OpInfo,
    st: &mut CpuState,
    bus: &mut Bus,
    _variant: Variant,
    _cycles: &mut u32,
) -> bool {
    match entry.mnemonic {
        Mnemonic::Tax => tax(st),
        Mnemonic::Tay => tay(st),
        Mnemonic::Txa => txa(st),
        Mnemonic::Tya => tya(st),
        Mnemonic::Tsx => tsx(st),
        Mnemonic::Txs => txs(st),

        Mnemonic::Inx => inx(st),
        Mnemonic::Iny => iny(st),
        Mnemonic::Dex => dex(st),
        Mnemonic::Dey => dey(st),

        Mnemonic::Pha => pha(st, bus),
        Mnemonic::Php => php(st, bus),
        Mnemonic::Pla => pla(st, bus),
        Mnemonic::Plp => plp(st, bus),
        Mnemonic::Phx => phx(st, bus),
        Mnemonic::Phy => phy(st, bus),
        Mnemonic::Plx => plx(st, bus),
        Mnemonic::Ply => ply(st, bus),

        Mnemonic::Clc => st.assign_flag(CARRY, false),
        Mnemonic::Sec => st.assign_flag(CARRY, true),
        Mnemonic::Cli => st.assign_flag(IRQ_DISABLE, false),
        Mnemonic::Sei => st.assign_flag(IRQ_DISABLE, true),
        Mnemonic::Clv => st.assign_flag(OVERFLOW, false),
        Mnemonic::Cld => st.assign_flag(DECIMAL, false),
        Mnemonic::Sed => st.assign_flag(DECIMAL, true),

        _ => return false,
    }
    true
}
