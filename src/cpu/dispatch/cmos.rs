/*!
cmos.rs - Rockwell bit instructions and the WDC quiescent states.

SMBn/RMBn set or clear bit n of a zero-page byte; no flags change. BBSn/
BBRn use the zero-page-relative mode: the handler consumes both operand
bytes itself (the resolver leaves PC alone for `Zpr`), tests the bit, and
branches with the usual +1 / +2 (page cross) surcharge.

WAI parks the processor on its own opcode byte in the Waiting state; only
an interrupt moves it on, and until then further steps cost nothing. STP
parks in Stopped, which only reset leaves.
*/

use crate::bus::Bus;
use crate::cpu::dispatch::dest_addr;
use crate::cpu::execute::set_zp_bit;
use crate::cpu::state::{CpuState, RunMode, Variant};
use crate::cpu::table::{Mnemonic, OpInfo};

pub(super) fn handle(
    entry: &OpInfo,
    st: &mut CpuState,
    bus: &mut Bus,
    variant: Variant,
    cycles: &mut u32,
) -> bool {
    match entry.mnemonic {
        Mnemonic::Smb(n) => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            set_zp_bit(bus, addr, n, true);
        }
        Mnemonic::Rmb(n) => {
            let addr = dest_addr(st, bus, entry.mode, variant);
            set_zp_bit(bus, addr, n, false);
        }
        Mnemonic::Bbs(n) => *cycles += bit_branch(st, bus, n, true),
        Mnemonic::Bbr(n) => *cycles += bit_branch(st, bus, n, false),
        Mnemonic::Wai => {
            // Park on the WAI byte itself; the interrupt entry advances
            // past it when the processor wakes.
            st.pc = st.pc.wrapping_sub(1);
            st.mode = RunMode::Waiting;
            log::debug!("wai: waiting at {:#06x}", st.pc);
        }
        Mnemonic::Stp => {
            st.pc = st.pc.wrapping_sub(1);
            st.mode = RunMode::Stopped;
            log::debug!("stp: stopped at {:#06x}", st.pc);
        }
        _ => return false,
    }
    true
}

/// BBS/BBR: test bit `n` of a zero-page byte and branch on `set`.
/// Returns the branch surcharge (0 / 1 / 2).
fn bit_branch(st: &mut CpuState, bus: &mut Bus, n: u8, set: bool) -> u32 {
    let zp = st.fetch_u8(bus);
    let m = bus.read(zp as u16);
    let offset = st.fetch_u8(bus) as i8;
    let take = ((m >> n) & 1 == 1) == set;
    if !take {
        return 0;
    }
    let fallthrough = st.pc;
    st.pc = fallthrough.wrapping_add(offset as u16);
    let mut extra = 1;
    if (fallthrough & 0xFF00) != (st.pc & 0xFF00) {
        extra += 1;
    }
    extra
}
