//! CLI command implementations.

use std::fs;
use std::ops::ControlFlow;
use std::path::Path;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use wordvm_chip8::Chip8;
use wordvm_vm::{Architecture, ProgramSource, Snapshot, Vm};

use wordvm_cli::config::{Config, SETTINGS};
use wordvm_cli::loader::FileLoader;

fn new_vm() -> Result<Vm<Chip8>> {
    Vm::new(Chip8::new()).context("Chip-8 instruction catalog is invalid")
}

fn load_rom(rom: &Path) -> Result<Vm<Chip8>> {
    let mut vm = new_vm()?;
    vm.load(&FileLoader, &ProgramSource::File(rom.to_path_buf()))
        .with_context(|| format!("failed to load {}", rom.display()))?;
    Ok(vm)
}

fn write_snapshot(vm: &Vm<Chip8>, path: &Path) -> Result<()> {
    let text = vm.snapshot()?.to_json_pretty()?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    info!("snapshot written to {}", path.display());
    Ok(())
}

/// Execute `count` instructions, printing each before it runs.
fn trace_steps(vm: &mut Vm<Chip8>, count: u64) -> Result<()> {
    for _ in 0..count {
        let line = vm.current_instruction();
        vm.step().context("step failed")?;
        if let Some(line) = line {
            println!("{line}");
        }
    }
    Ok(())
}

fn print_registers(vm: &Vm<Chip8>) {
    let chip = vm.arch();
    let registers: Vec<String> = (0..16u16)
        .map(|x| format!("V{x:X}={:02x}", chip.v(x)))
        .collect();
    println!("{}", registers.join(" "));
    println!(
        "pc={:04x} I={:03x} DT={:02x} ST={:02x} stack={:x?}",
        vm.pc(),
        chip.index,
        chip.delay_timer,
        chip.sound_timer,
        vm.core().stack.inspect()
    );
}

/// Run a ROM in 60 Hz frames until `max_steps` or an error.
pub fn run(rom: &Path, overrides: &[String], snapshot_out: Option<&Path>) -> Result<()> {
    let config = Config::from_overrides(overrides).context("invalid --set")?;
    let mut vm = load_rom(rom)?;
    let per_frame = config.steps_per_frame();
    let frame = config.frame_duration();
    info!(
        "running {} at {} instructions/s ({per_frame} per frame)",
        rom.display(),
        config.cpu_speed
    );

    let result = loop {
        let started = Instant::now();
        let budget = match config.max_steps {
            0 => per_frame,
            max => per_frame.min(max.saturating_sub(vm.steps())),
        };
        if budget == 0 {
            break Ok(());
        }

        let target = vm.steps() + budget;
        let mut pending = config.trace.then(|| vm.current_instruction()).flatten();
        let outcome = vm.run(|vm| {
            if config.trace {
                if let Some(line) = pending.take() {
                    println!("{line}");
                }
                pending = vm.current_instruction();
            }
            if vm.steps() >= target {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        if let Err(err) = outcome {
            break Err(err);
        }

        vm.arch_mut().tick_timers();
        if let Some(rest) = frame.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    };

    println!("halted at pc {:#06x} after {} steps", vm.pc(), vm.steps());
    if let Some(path) = snapshot_out {
        write_snapshot(&vm, path)?;
    }
    result.context("run failed")
}

/// Step a ROM `count` times, then dump the machine state.
pub fn step(rom: &Path, count: u64) -> Result<()> {
    let mut vm = load_rom(rom)?;
    trace_steps(&mut vm, count)?;
    print_registers(&vm);
    Ok(())
}

/// Print one line per instruction word of a ROM.
pub fn disassemble(rom: &Path) -> Result<()> {
    let vm = load_rom(rom)?;
    let start = Chip8::LOAD_OFFSET;
    let len = vm.program().len();
    for offset in (0..len).step_by(2) {
        let address = start + offset as u16;
        if let Some(line) = vm.disassemble_at(address) {
            println!("{line}");
        }
    }
    Ok(())
}

/// List every instruction the Chip-8 catalog accepts.
pub fn isa() -> Result<()> {
    let vm = new_vm()?;
    for op in vm.isa().iter() {
        println!("{}  {}", op.pattern().template(), op.mnemonic());
    }
    Ok(())
}

/// Restore a snapshot file, then step `count` times.
pub fn restore(snapshot: &Path, count: u64) -> Result<()> {
    let text = fs::read_to_string(snapshot)
        .with_context(|| format!("cannot read '{}'", snapshot.display()))?;
    let snapshot = Snapshot::from_json(&text)?;
    let mut vm = new_vm()?;
    vm.restore(&snapshot).context("restore failed")?;
    println!("restored at pc {:#06x}", vm.pc());
    trace_steps(&mut vm, count)?;
    print_registers(&vm);
    Ok(())
}

/// Print the blake3 digest of a ROM file.
pub fn hash(rom: &Path) -> Result<()> {
    let bytes = fs::read(rom).with_context(|| format!("cannot read '{}'", rom.display()))?;
    println!("{}  {}", blake3::hash(&bytes).to_hex(), rom.display());
    Ok(())
}

/// Print the settings table.
pub fn settings() -> Result<()> {
    for spec in SETTINGS {
        println!("{:<10} {:<6} {}", spec.name, spec.default, spec.effect);
    }
    Ok(())
}
