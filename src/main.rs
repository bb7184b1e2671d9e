//! Command-line harness: load a program image, reset, and run until the
//! program parks itself in a deliberate self-loop (or an instruction
//! limit), optionally tracing execution to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use m6502::{Cpu, Disassembler, Format, RunMode, Variant};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImageFormat {
    Bin,
    Hex,
    Srec,
}

impl From<ImageFormat> for Format {
    fn from(f: ImageFormat) -> Self {
        match f {
            ImageFormat::Bin => Format::Bin,
            ImageFormat::Hex => Format::IntelHex,
            ImageFormat::Srec => Format::SRec,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CpuModel {
    /// NMOS 6502
    Base,
    /// CMOS 65C02
    C02,
    /// Rockwell 65C02
    Rockwell,
    /// WDC W65C02S
    Wdc,
}

impl From<CpuModel> for Variant {
    fn from(m: CpuModel) -> Self {
        match m {
            CpuModel::Base => Variant::Base,
            CpuModel::C02 => Variant::C02,
            CpuModel::Rockwell => Variant::Rockwell,
            CpuModel::Wdc => Variant::Wdc,
        }
    }
}

/// Cycle-counting 6502 / 65C02 / W65C02S simulator.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Program image to load.
    image: PathBuf,

    /// Image format.
    #[arg(long, value_enum, default_value = "bin")]
    format: ImageFormat,

    /// Load base address (binary) or record-address offset (hex/srec).
    #[arg(long, default_value = "0x0000", value_parser = parse_addr)]
    base: u16,

    /// Processor model to simulate.
    #[arg(long, value_enum, default_value = "base")]
    variant: CpuModel,

    /// Trace executed instructions to stdout.
    #[arg(long)]
    trace: bool,

    /// Append register state to each trace line.
    #[arg(long)]
    regs: bool,

    /// Mark non-sequential trace lines with '*'.
    #[arg(long)]
    jump_marks: bool,

    /// First instruction index to trace.
    #[arg(long, default_value_t = 0)]
    trace_from: u64,

    /// Number of instructions to trace (unlimited when omitted).
    #[arg(long)]
    trace_count: Option<u64>,

    /// Stop after this many instructions instead of waiting for a hang.
    #[arg(long)]
    limit: Option<u64>,
}

fn parse_addr(s: &str) -> Result<u16, String> {
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    u16::from_str_radix(digits, radix).map_err(|e| format!("bad address {s:?}: {e}"))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut cpu = Cpu::with_variant(args.variant.into());
    if let Err(e) = cpu.read_program(&args.image, args.format.into(), args.base) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    cpu.reset(None);

    if args.trace {
        let mut sink = Disassembler::new(std::io::stdout())
            .with_regs(args.regs)
            .with_jump_marks(args.jump_marks);
        if let Some(count) = args.trace_count {
            sink = sink.with_window(args.trace_from, args.trace_from.saturating_add(count));
        } else if args.trace_from > 0 {
            sink = sink.with_window(args.trace_from, u64::MAX);
        }
        cpu.set_trace_sink(Box::new(sink));
    }

    let stopped_at = match args.limit {
        Some(limit) => {
            cpu.run(limit);
            cpu.pc()
        }
        None => cpu.run_until_self_loop().pc,
    };

    let reason = match cpu.run_mode() {
        RunMode::Running if args.limit.is_some() => "instruction limit",
        RunMode::Running => "self-loop",
        RunMode::Waiting => "waiting (WAI)",
        RunMode::Stopped => "stopped (STP)",
    };
    println!(
        "halted: {reason} at {:#06x} after {} cycles",
        stopped_at,
        cpu.cycles()
    );
    println!(
        "a={:02x} x={:02x} y={:02x} sp={:02x} flags={:08b}",
        cpu.a(),
        cpu.x(),
        cpu.y(),
        cpu.sp(),
        cpu.status()
    );
    ExitCode::SUCCESS
}
