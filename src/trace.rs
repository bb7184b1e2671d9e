/*!
trace.rs - Execution-trace observer and disassembly formatter.

Overview
========
The core is trace-agnostic: it optionally holds a `TraceSink` and hands it
one `TraceRecord` per executed instruction (pre-execution register
snapshot, instruction bytes, cycle cost). `Disassembler` is the stock sink:
it renders classic disassembly lines to any `io::Write`, so tests capture
into a buffer and the harness points it at stdout or a file.

Line shape:

```text
*8000  A9 50     LDA #$50      a=50 x=00 y=00 sp=ff flags=00110100 (sp)=00
```

- Leading `*` is the discontinuity marker: emitted (when enabled) whenever
  the previous record's sequential next-PC does not match this record's PC,
  i.e. after taken branches, jumps, subroutine traffic and interrupts.
- The mnemonic renders as `???` when the opcode's minimum variant exceeds
  the active one; the operand field still reflects the entry's addressing
  mode, whose length governed the PC advance.
*/

use std::io::{self, Write};

use crate::cpu::addressing::Mode;
use crate::cpu::table::Mnemonic;

/// Everything the sink needs to render one executed instruction. Register
/// fields are the pre-execution snapshot.
#[derive(Debug, Clone)]
pub struct TraceRecord {
    pub pc: u16,
    /// Opcode plus up to two operand bytes (unused slots are zero).
    pub bytes: [u8; 3],
    /// Instruction length in bytes (1 + operand length).
    pub len: u8,
    /// `None` when the entry was variant-gated (rendered as `???`).
    pub mnemonic: Option<Mnemonic>,
    pub mode: Mode,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub status: u8,
    /// Byte currently at 0x0100 | SP.
    pub stack_top: u8,
    /// Cycles consumed by this instruction (with penalties).
    pub cycles: u32,
    pub total_cycles: u64,
    /// Zero-based index of this instruction in the run.
    pub instr_index: u64,
}

/// Observer for executed instructions. The core holds at most one.
pub trait TraceSink {
    fn record(&mut self, rec: &TraceRecord);
}

/// Render an operand field for `mode` from the instruction bytes.
/// `pc` is the address of the opcode byte (relative targets need it).
pub fn format_operand(mode: Mode, pc: u16, bytes: &[u8; 3]) -> String {
    let b1 = bytes[1];
    let w = (bytes[2] as u16) << 8 | bytes[1] as u16;
    match mode {
        Mode::Imm => format!("#${b1:02X}"),
        Mode::Zpg => format!("${b1:02X}"),
        Mode::Zpx => format!("${b1:02X},X"),
        Mode::Zpy => format!("${b1:02X},Y"),
        Mode::Abs => format!("${w:04X}"),
        Mode::Abx => format!("${w:04X},X"),
        Mode::Aby => format!("${w:04X},Y"),
        Mode::Ind => format!("(${w:04X})"),
        Mode::Idx => format!("(${b1:02X},X)"),
        Mode::Idy => format!("(${b1:02X}),Y"),
        Mode::Idz => format!("(${b1:02X})"),
        Mode::Iax => format!("(${w:04X},X)"),
        Mode::Rel => {
            let target = pc.wrapping_add(2).wrapping_add(b1 as i8 as u16);
            format!("${target:04X}")
        }
        Mode::Zpr => {
            let target = pc.wrapping_add(3).wrapping_add(bytes[2] as i8 as u16);
            format!("${b1:02X},${target:04X}")
        }
        Mode::Acc => "A".to_string(),
        Mode::Non => String::new(),
    }
}

/// Stock `TraceSink`: formats each record as one disassembly line.
pub struct Disassembler<W: Write> {
    out: W,
    show_regs: bool,
    jump_marks: bool,
    /// Half-open instruction-index window; records outside it are skipped.
    window: Option<(u64, u64)>,
    expected_pc: Option<u16>,
}

impl<W: Write> Disassembler<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_regs: false,
            jump_marks: false,
            window: None,
            expected_pc: None,
        }
    }

    /// Append the register/flag suffix to every line.
    pub fn with_regs(mut self, on: bool) -> Self {
        self.show_regs = on;
        self
    }

    /// Mark lines whose PC does not follow sequentially from the previous
    /// record with a leading `*`.
    pub fn with_jump_marks(mut self, on: bool) -> Self {
        self.jump_marks = on;
        self
    }

    /// Only emit records whose instruction index lies in [start, stop).
    pub fn with_window(mut self, start: u64, stop: u64) -> Self {
        self.window = Some((start, stop));
        self
    }

    fn write_line(&mut self, rec: &TraceRecord, discontinuous: bool) -> io::Result<()> {
        let marker = if self.jump_marks && discontinuous { '*' } else { ' ' };

        let mut bytes_col = String::new();
        for i in 0..rec.len as usize {
            if i > 0 {
                bytes_col.push(' ');
            }
            bytes_col.push_str(&format!("{:02X}", rec.bytes[i]));
        }

        let mnemonic = match rec.mnemonic {
            Some(m) => m.to_string(),
            None => "???".to_string(),
        };
        let operand = format_operand(rec.mode, rec.pc, &rec.bytes);
        let text = if operand.is_empty() {
            mnemonic
        } else {
            format!("{mnemonic} {operand}")
        };

        write!(self.out, "{marker}{:04X}  {bytes_col:<8}  {text:<14}", rec.pc)?;
        if self.show_regs {
            write!(
                self.out,
                "  a={:02x} x={:02x} y={:02x} sp={:02x} flags={:08b} (sp)={:02x}",
                rec.a, rec.x, rec.y, rec.sp, rec.status, rec.stack_top
            )?;
        }
        writeln!(self.out)
    }
}

impl<W: Write> TraceSink for Disassembler<W> {
    fn record(&mut self, rec: &TraceRecord) {
        let discontinuous = match self.expected_pc {
            Some(expected) => expected != rec.pc,
            None => false,
        };
        // Track sequencing even for skipped records so the first line after
        // a window gap is marked correctly.
        self.expected_pc = Some(rec.pc.wrapping_add(rec.len as u16));

        if let Some((start, stop)) = self.window {
            if rec.instr_index < start || rec.instr_index >= stop {
                return;
            }
        }
        if let Err(e) = self.write_line(rec, discontinuous) {
            log::warn!("trace sink write failed: {e}");
        }
    }
}
