//! Command line driver for the RISC-4 emulator

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use risc4_core::{assemble, MachineConfig, NibbleAddr, DEFAULT_MEM_SIZE};
use risc4emu::{programs, Emu, EmuOptions, StopReason, DEFAULT_MAX_STEPS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Demo {
    /// Recursive bubble sort over five nibbles
    BubbleSort,
    /// 8-bit addition built from nibble pieces
    MultiNibbleAdd,
    /// Shift a bit across a nibble and back
    Shift,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "RISC-4 instruction set emulator")]
struct Args {
    /// Built-in demo program to run
    #[arg(long, value_enum, conflicts_with = "image")]
    demo: Option<Demo>,

    /// Program image: one hexadecimal instruction word per line
    #[arg(long)]
    image: Option<PathBuf>,

    /// Nibble data file loaded at --data-base, one hex digit per line
    #[arg(long)]
    data: Option<PathBuf>,

    /// Byte address the data file is loaded at
    #[arg(long, default_value_t = 0x80)]
    data_base: usize,

    /// Memory size in bytes
    #[arg(long, default_value_t = DEFAULT_MEM_SIZE)]
    mem_size: usize,

    /// Step budget
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: u64,

    /// Stop when the pc reaches this instruction index
    #[arg(long)]
    stop_at: Option<u16>,

    /// Log the machine state after every step (requires RUST_LOG=trace)
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let words = match (&args.demo, &args.image) {
        (Some(demo), None) => match demo {
            Demo::BubbleSort => assemble(&programs::bubble_sort()),
            Demo::MultiNibbleAdd => assemble(&programs::multi_nibble_add()),
            Demo::Shift => assemble(&programs::shift_demo()),
        },
        (None, Some(path)) => read_image(path)?,
        _ => bail!("exactly one of --demo or --image is required"),
    };

    let stop_pc = match (args.demo, args.stop_at) {
        (_, Some(index)) => Some(NibbleAddr::from_inst_index(index)),
        // The bubble sort parks on its own done loop.
        (Some(Demo::BubbleSort), None) => Some(programs::bubble_sort_halt_pc()),
        _ => None,
    };

    let mut emu = Emu::new(
        MachineConfig { mem_size: args.mem_size },
        EmuOptions { max_steps: args.max_steps, stop_pc, trace: args.trace },
    );
    emu.load_program(&words);

    if args.demo == Some(Demo::BubbleSort) && args.data.is_none() {
        emu.load_data(programs::BUBBLE_SORT_DATA_BASE, &[0x7, 0x2, 0x9, 0x1, 0x5]);
    }
    if let Some(path) = &args.data {
        let nibbles = read_nibbles(path)?;
        emu.load_data(args.data_base, &nibbles);
    }

    let result = emu.run()?;

    match result.reason {
        StopReason::PcReached => {
            tracing::info!(steps = result.steps, "run completed");
        }
        StopReason::StepLimit => {
            tracing::warn!(steps = result.steps, "step budget exhausted");
        }
    }
    println!("{}", emu.machine().to_text());

    if args.demo == Some(Demo::BubbleSort) {
        let mem = emu.machine().mem();
        let sorted: Vec<u8> =
            (0..5).map(|i| mem.read_byte(programs::BUBBLE_SORT_DATA_BASE + i)).collect();
        println!("array: {sorted:?}");
    }

    Ok(())
}

fn read_image(path: &PathBuf) -> Result<Vec<u16>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading program image {}", path.display()))?;
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            u16::from_str_radix(line.trim_start_matches("0x"), 16)
                .with_context(|| format!("bad instruction word {line:?}"))
        })
        .collect()
}

fn read_nibbles(path: &PathBuf) -> Result<Vec<u8>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading data file {}", path.display()))?;
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            u8::from_str_radix(line.trim_start_matches("0x"), 16)
                .with_context(|| format!("bad nibble {line:?}"))
        })
        .collect()
}
