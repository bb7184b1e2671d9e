/*!
addressing.rs - Addressing modes and operand resolution.

Overview
========
Provides the canonical helpers for:
- Instruction-stream byte/word fetch
- Effective address calculation for every addressing mode of the 6502,
  65C02 and WDC supersets
- Page-cross reporting so dispatch can apply +1 cycle penalties
- The NMOS `JMP (indirect)` page-wrap quirk (fixed from the 65C02 on)

Scope
=====
- Pure address / operand resolution only; no cycle accounting.
- PC is advanced past all operand bytes by `resolve`, with one exception:
  `Zpr` (the Rockwell bit-branch mode) leaves PC untouched, since its
  handler consumes the zero-page operand and displacement itself.

Caller Assumptions
==================
- PC points at the first operand byte when `resolve` is invoked (the opcode
  byte has already been fetched).
- Handlers never do manual PC arithmetic for operands; they go through here.
*/

use crate::bus::Bus;
use crate::cpu::state::{CpuState, Variant};

/// Addressing mode of an opcode-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Immediate: operand is the next instruction byte.
    Imm,
    /// Zero page.
    Zpg,
    /// Zero page indexed by X (wraps within page 0).
    Zpx,
    /// Zero page indexed by Y (wraps within page 0).
    Zpy,
    /// Absolute 16-bit address.
    Abs,
    /// Absolute indexed by X.
    Abx,
    /// Absolute indexed by Y.
    Aby,
    /// Indirect via a 16-bit pointer (JMP only).
    Ind,
    /// Indexed indirect: pointer at (zp + X) & 0xFF.
    Idx,
    /// Indirect indexed: pointer at zp, then + Y.
    Idy,
    /// Indirect zero page, no index (65C02).
    Idz,
    /// Absolute indexed indirect: pointer at (abs + X) (65C02, JMP only).
    Iax,
    /// Relative branch displacement.
    Rel,
    /// Zero page + relative displacement (Rockwell BBS/BBR).
    Zpr,
    /// Accumulator operand.
    Acc,
    /// No operand.
    Non,
}

impl Mode {
    /// Number of operand bytes following the opcode. Drives PC advancement
    /// for variant-gated NOP substitution and the trace formatter.
    pub fn operand_len(self) -> u16 {
        match self {
            Mode::Imm | Mode::Zpg | Mode::Zpx | Mode::Zpy => 1,
            Mode::Idx | Mode::Idy | Mode::Idz | Mode::Rel => 1,
            Mode::Abs | Mode::Abx | Mode::Aby | Mode::Ind | Mode::Iax => 2,
            Mode::Zpr => 2,
            Mode::Acc | Mode::Non => 0,
        }
    }
}

/// What an instruction operates on, as produced by `resolve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// A memory location.
    Mem(u16),
    /// The accumulator.
    Acc,
    /// Nothing (implied operand or handler-resolved mode).
    None,
}

/// Resolution result: the operand plus whether an indexed computation
/// crossed a page boundary (penalty decisions stay with the dispatcher).
#[derive(Debug, Clone, Copy)]
pub struct Resolved {
    pub operand: Operand,
    pub page_crossed: bool,
}

impl Resolved {
    fn mem(addr: u16) -> Self {
        Self {
            operand: Operand::Mem(addr),
            page_crossed: false,
        }
    }

    fn mem_crossed(addr: u16, crossed: bool) -> Self {
        Self {
            operand: Operand::Mem(addr),
            page_crossed: crossed,
        }
    }
}

/// Resolve the operand for `mode`, advancing PC past the operand bytes.
///
/// For `Rel` the returned address is the branch target and `page_crossed`
/// compares it against the instruction's fall-through PC. For `Zpr` no
/// bytes are consumed here.
pub(crate) fn resolve(st: &mut CpuState, bus: &mut Bus, mode: Mode, variant: Variant) -> Resolved {
    match mode {
        Mode::Imm => {
            let addr = st.pc;
            st.advance_pc_one();
            Resolved::mem(addr)
        }
        Mode::Zpg => Resolved::mem(st.fetch_u8(bus) as u16),
        Mode::Zpx => Resolved::mem(st.fetch_u8(bus).wrapping_add(st.x) as u16),
        Mode::Zpy => Resolved::mem(st.fetch_u8(bus).wrapping_add(st.y) as u16),
        Mode::Abs => Resolved::mem(st.fetch_u16(bus)),
        Mode::Abx => {
            let base = st.fetch_u16(bus);
            let addr = base.wrapping_add(st.x as u16);
            Resolved::mem_crossed(addr, pages_differ(base, addr))
        }
        Mode::Aby => {
            let base = st.fetch_u16(bus);
            let addr = base.wrapping_add(st.y as u16);
            Resolved::mem_crossed(addr, pages_differ(base, addr))
        }
        Mode::Ind => {
            let ptr = st.fetch_u16(bus);
            let addr = if variant == Variant::Base {
                read_word_indirect_bug(bus, ptr)
            } else {
                bus.read_word(ptr)
            };
            Resolved::mem(addr)
        }
        Mode::Idx => {
            let zp = st.fetch_u8(bus).wrapping_add(st.x);
            Resolved::mem(read_word_zp(bus, zp))
        }
        Mode::Idy => {
            let zp = st.fetch_u8(bus);
            let base = read_word_zp(bus, zp);
            let addr = base.wrapping_add(st.y as u16);
            Resolved::mem_crossed(addr, pages_differ(base, addr))
        }
        Mode::Idz => {
            let zp = st.fetch_u8(bus);
            Resolved::mem(read_word_zp(bus, zp))
        }
        Mode::Iax => {
            let ptr = st.fetch_u16(bus).wrapping_add(st.x as u16);
            Resolved::mem(bus.read_word(ptr))
        }
        Mode::Rel => {
            let offset = st.fetch_u8(bus) as i8;
            let next = st.pc;
            let target = next.wrapping_add(offset as u16);
            Resolved::mem_crossed(target, pages_differ(next, target))
        }
        // The bit-branch handler consumes its own operand bytes.
        Mode::Zpr => Resolved {
            operand: Operand::None,
            page_crossed: false,
        },
        Mode::Acc => Resolved {
            operand: Operand::Acc,
            page_crossed: false,
        },
        Mode::Non => Resolved {
            operand: Operand::None,
            page_crossed: false,
        },
    }
}

#[inline]
fn pages_differ(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

/// Read a 16-bit little-endian pointer from zero page; the high byte wraps
/// within page 0 (standard zero-page indirect behavior).
#[inline]
pub(crate) fn read_word_zp(bus: &mut Bus, base: u8) -> u16 {
    let lo = bus.read(base as u16) as u16;
    let hi = bus.read(base.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// NMOS `JMP (indirect)` hardware bug: when the pointer's low byte is 0xFF
/// the high byte is fetched from the start of the same page rather than the
/// next one.
#[inline]
pub(crate) fn read_word_indirect_bug(bus: &mut Bus, ptr: u16) -> u16 {
    let lo = bus.read(ptr) as u16;
    let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
    let hi = bus.read(hi_addr) as u16;
    (hi << 8) | lo
}
