//! Shared test builders: place a program in memory, point the reset vector
//! at it, and hand back a freshly reset processor.

use crate::cpu::Cpu;
use crate::cpu::state::{RESET_VECTOR, Variant};

/// NMOS processor with `prg` at `org` and PC reset to `org`.
pub fn cpu_with_program(org: u16, prg: &[u8]) -> Cpu {
    cpu_with_program_on(Variant::Base, org, prg)
}

/// Same, for a chosen variant.
pub fn cpu_with_program_on(variant: Variant, org: u16, prg: &[u8]) -> Cpu {
    let mut cpu = Cpu::with_variant(variant);
    cpu.bus_mut().load_bytes(org, prg);
    cpu.bus_mut().write(RESET_VECTOR, org as u8);
    cpu.bus_mut().write(RESET_VECTOR.wrapping_add(1), (org >> 8) as u8);
    cpu.reset(None);
    cpu
}
