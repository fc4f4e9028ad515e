//! wordvm CLI: run, step, inspect and snapshot Chip-8 programs.
//!
//! Exit codes are documented in the library crate; see [`wordvm_cli::exit_code`].

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

/// Table-driven 16-bit VM running the Chip-8 CPU
#[derive(Parser)]
#[command(name = "wordvm", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a ROM and run it
    Run {
        rom: PathBuf,

        /// Override a setting, e.g. `--set max_steps=1000`
        #[arg(long = "set", value_name = "NAME=VALUE")]
        overrides: Vec<String>,

        /// Write a JSON snapshot of the final state to this file
        #[arg(long, value_name = "FILE")]
        snapshot_out: Option<PathBuf>,
    },
    /// Execute a ROM one instruction at a time, printing each
    Step {
        rom: PathBuf,

        /// Number of instructions to execute
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u64,
    },
    /// List a ROM as instructions
    Disassemble { rom: PathBuf },
    /// List the Chip-8 instruction catalog
    Isa,
    /// Resume from a snapshot written by `run --snapshot-out`
    Restore {
        snapshot: PathBuf,

        /// Number of instructions to execute after restoring
        #[arg(short = 'n', long, default_value_t = 0)]
        count: u64,
    },
    /// Print the blake3 digest of a ROM
    Hash { rom: PathBuf },
    /// List the settings accepted by `run --set`
    Settings,
}

fn main() {
    let env = env_logger::Env::default().filter_or("WORDVM_LOG", "warn");
    env_logger::init_from_env(env);

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };

    let result = match cli.command {
        Command::Run {
            rom,
            overrides,
            snapshot_out,
        } => commands::run(&rom, &overrides, snapshot_out.as_deref()),
        Command::Step { rom, count } => commands::step(&rom, count),
        Command::Disassemble { rom } => commands::disassemble(&rom),
        Command::Isa => commands::isa(),
        Command::Restore { snapshot, count } => commands::restore(&snapshot, count),
        Command::Hash { rom } => commands::hash(&rom),
        Command::Settings => commands::settings(),
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        process::exit(wordvm_cli::exit_code(&err));
    }
}
