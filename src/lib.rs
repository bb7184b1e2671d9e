#![doc = r#"
m6502 library crate.

A cycle-counting instruction-set simulator for the MOS 6502 family,
covering the NMOS 6502 and the CMOS 65C02 / Rockwell / WDC W65C02S
supersets, including documented hardware quirks, decimal-mode arithmetic,
the 16-line wired-OR IRQ latch and the WDC WAI/STP quiescent states.

Modules:
- bus: 64 KiB memory behind a read/write facade, with host memory hooks
- cpu: processor facade, register state, addressing, opcode table,
  per-family instruction dispatch and the interrupt controller
- loader: raw binary, Intel HEX and Motorola S-record image loading
- trace: execution-trace observer and disassembly line formatter

Embedding sketch:

```no_run
use m6502::{Cpu, Variant};

let mut cpu = Cpu::with_variant(Variant::Wdc);
cpu.bus_mut().load_bytes(0x8000, &[0xA9, 0x01, 0x4C, 0x02, 0x80]);
cpu.bus_mut().write(0xFFFC, 0x00);
cpu.bus_mut().write(0xFFFD, 0x80);
cpu.reset(None);
let halted_at = cpu.run_until_self_loop();
assert_eq!(halted_at.pc, 0x8002);
```
"#]

pub mod bus;
pub mod cpu;
pub mod loader;
pub mod trace;

// Re-export the embedding surface at the crate root.
pub use bus::{Bus, MemoryHooks};
pub use cpu::state::{RunMode, Variant};
pub use cpu::{Cpu, StepInfo};
pub use loader::{Format, LoadError, LoadInfo};
pub use trace::{Disassembler, TraceRecord, TraceSink};

// Shared test builders (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
