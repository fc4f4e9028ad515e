//! The virtual machine: lifecycle, fetch-decode-execute and snapshots.

use std::fmt;
use std::ops::ControlFlow;

use log::{debug, info, trace, warn};
use wordvm_common::instruction::fetch_word;
use wordvm_common::{Word, INSTRUCTION_WIDTH};

use crate::arch::{Architecture, Core};
use crate::context::Context;
use crate::error::{IsaError, LoaderError, RuntimeError, SnapshotError};
use crate::isa::Isa;
use crate::program::{BytesLoader, Program, ProgramLoader, ProgramSource};
use crate::registers::Registers;
use crate::snapshot::{Snapshot, SnapshotState, SNAPSHOT_VERSION};
use crate::stack::CallStack;

const KEY_REGISTERS: &str = "registers";
const KEY_MEMORY: &str = "memory";
const KEY_STACK: &str = "stack";
const KEY_PC: &str = "program_counter";
const KEY_PROGRAM: &str = "program";

/// Lifecycle of a [`Vm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmState {
    /// No program has been loaded.
    Unloaded,
    /// A program is installed and the machine is at its entry point.
    Ready,
    /// At least one step has executed since the last reset or restore.
    Running,
    /// A run stopped, by the host or by an error.
    Halted,
}

/// Result of a [`Vm::run`] that the host stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Steps executed by this run.
    pub steps: u64,
}

/// One decoded instruction, for traces and listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disassembly {
    pub address: u16,
    pub word: Word,
    pub text: String,
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}  {:04x}  {}", self.address, self.word, self.text)
    }
}

/// A virtual machine running one architecture.
pub struct Vm<A: Architecture> {
    arch: A,
    isa: Isa<A>,
    program: Program,
    state: VmState,
    steps: u64,
}

impl<A: Architecture> Vm<A> {
    /// Build a VM around `arch`, validating its instruction catalog.
    pub fn new(arch: A) -> Result<Self, IsaError> {
        let isa = Isa::new(A::catalog())?;
        let mut vm = Self {
            arch,
            isa,
            program: Program::new(),
            state: VmState::Unloaded,
            steps: 0,
        };
        vm.reset();
        Ok(vm)
    }

    /// Largest program image that fits above the load offset.
    pub fn program_capacity() -> usize {
        A::MEMORY_SIZE.saturating_sub(usize::from(A::LOAD_OFFSET))
    }

    /// Load a program through `loader` and reset.
    ///
    /// Nothing changes unless the load succeeds and the image fits.
    pub fn load(
        &mut self,
        loader: &dyn ProgramLoader,
        source: &ProgramSource,
    ) -> Result<(), LoaderError> {
        self.program
            .load_within(loader, source, Self::program_capacity())?;
        info!(
            "loaded {} bytes from {} source into {}",
            self.program.len(),
            source.kind(),
            A::ID
        );
        self.reset();
        Ok(())
    }

    /// Load an in-memory image and reset.
    pub fn load_bytes(&mut self, bytes: Vec<u8>) -> Result<(), LoaderError> {
        self.load(&BytesLoader, &ProgramSource::Bytes(bytes))
    }

    /// Return to power-on state with the loaded program reinstalled.
    pub fn reset(&mut self) {
        let core = self.arch.core_mut();
        core.clear(A::ENTRY_POINT);
        if let Some(bytes) = self.program.data() {
            let offset = usize::from(A::LOAD_OFFSET);
            if let Some(dest) = core.memory.get_mut(offset..offset + bytes.len()) {
                dest.copy_from_slice(bytes);
            }
        }
        self.arch.reset_peripherals();
        self.steps = 0;
        self.state = if self.program.is_loaded() {
            VmState::Ready
        } else {
            VmState::Unloaded
        };
        info!("reset {} (pc {:#06x})", A::ID, A::ENTRY_POINT);
    }

    /// Execute one instruction.
    ///
    /// The program counter is advanced past the instruction before its
    /// behavior runs. A failing behavior leaves the program counter on the
    /// faulting instruction.
    pub fn step(&mut self) -> Result<(), RuntimeError> {
        let at = self.arch.core().pc;
        if !self.program.is_loaded() {
            return Err(RuntimeError::Bounds {
                address: at,
                len: 0,
            });
        }

        let memory = &self.arch.core().memory;
        let word = fetch_word(memory, usize::from(at)).ok_or(RuntimeError::Bounds {
            address: at,
            len: memory.len(),
        })?;
        let op = self
            .isa
            .dispatch(word)
            .map_err(|source| RuntimeError::Decode { at, source })?;
        let operands = op.decode(word);
        trace!("{at:04x}  {word:04x}  {}", op.disassemble(word));

        self.arch.core_mut().pc = at.wrapping_add(INSTRUCTION_WIDTH);
        let mut context = Context::new(&mut self.arch, at, word);
        if let Err(err) = op.execute(&mut context, operands) {
            self.arch.core_mut().pc = at;
            return Err(err);
        }

        self.steps += 1;
        self.state = VmState::Running;
        Ok(())
    }

    /// Step until the host breaks or a step fails.
    ///
    /// `host` is called after every successful step and is the only place
    /// a run can be stopped from. Either way the machine ends `Halted`.
    pub fn run<F>(&mut self, mut host: F) -> Result<RunOutcome, RuntimeError>
    where
        F: FnMut(&Self) -> ControlFlow<()>,
    {
        let mut steps = 0;
        loop {
            if let Err(err) = self.step() {
                self.state = VmState::Halted;
                debug!("{} halted after {steps} steps: {err}", A::ID);
                return Err(err);
            }
            steps += 1;
            if host(&*self).is_break() {
                self.state = VmState::Halted;
                debug!("{} stopped by host after {steps} steps", A::ID);
                return Ok(RunOutcome { steps });
            }
        }
    }

    /// Mark the machine halted. The next `step` resumes it.
    pub fn halt(&mut self) {
        self.state = VmState::Halted;
        debug!("{} halted at {:#06x}", A::ID, self.pc());
    }

    // --- Inspection ---

    pub fn state(&self) -> VmState {
        self.state
    }

    /// Successful steps since the last reset or restore.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn pc(&self) -> u16 {
        self.arch.core().pc
    }

    pub fn arch(&self) -> &A {
        &self.arch
    }

    pub fn arch_mut(&mut self) -> &mut A {
        &mut self.arch
    }

    pub fn core(&self) -> &Core {
        self.arch.core()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn isa(&self) -> &Isa<A> {
        &self.isa
    }

    /// Decode the word stored in memory at `address`.
    pub fn disassemble_at(&self, address: u16) -> Option<Disassembly> {
        let word = fetch_word(&self.arch.core().memory, usize::from(address))?;
        Some(Disassembly {
            address,
            word,
            text: self.isa.disassemble(word),
        })
    }

    /// The instruction the next `step` will execute.
    pub fn current_instruction(&self) -> Option<Disassembly> {
        self.disassemble_at(self.pc())
    }

    // --- Snapshots ---

    /// Capture the full machine state.
    pub fn snapshot(&self) -> Result<Snapshot, SnapshotError> {
        let core = self.arch.core();
        let mut state = SnapshotState::new();
        state.put(KEY_REGISTERS, &core.registers.as_slice())?;
        state.put(KEY_MEMORY, &core.memory)?;
        state.put(KEY_STACK, &core.stack.inspect())?;
        state.put(KEY_PC, &core.pc)?;
        state.put(KEY_PROGRAM, &self.program.data())?;
        self.arch.save_state(&mut state)?;
        Ok(Snapshot::new(A::ID, state))
    }

    /// Replace the machine state with `snapshot` and zero the step count.
    ///
    /// Every key is decoded into a staged copy first; on any error the
    /// live machine is untouched.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        if snapshot.arch != A::ID || snapshot.version != SNAPSHOT_VERSION {
            warn!(
                "rejected snapshot for {} v{} (running {} v{})",
                snapshot.arch,
                snapshot.version,
                A::ID,
                SNAPSHOT_VERSION
            );
            return Err(SnapshotError::Mismatch {
                expected_arch: A::ID.to_string(),
                expected_version: SNAPSHOT_VERSION,
                found_arch: snapshot.arch.clone(),
                found_version: snapshot.version,
            });
        }

        let state = &snapshot.state;
        let registers = state.get_exact::<u16>(KEY_REGISTERS, A::REGISTER_COUNT)?;
        let registers = Registers::from_values(registers, A::REGISTER_WIDTH).ok_or_else(|| {
            SnapshotError::Malformed {
                key: KEY_REGISTERS.to_string(),
                reason: format!("value wider than {}", A::REGISTER_WIDTH),
            }
        })?;
        let memory = state.get_exact::<u8>(KEY_MEMORY, A::MEMORY_SIZE)?;
        let stack = CallStack::from_entries(A::STACK_DEPTH, state.get(KEY_STACK)?).map_err(
            |_| SnapshotError::Malformed {
                key: KEY_STACK.to_string(),
                reason: format!("deeper than capacity {}", A::STACK_DEPTH),
            },
        )?;
        let pc: u16 = state.get(KEY_PC)?;
        let image: Option<Vec<u8>> = state.get(KEY_PROGRAM)?;
        if let Some(bytes) = &image {
            if bytes.len() > Self::program_capacity() {
                return Err(SnapshotError::Malformed {
                    key: KEY_PROGRAM.to_string(),
                    reason: format!(
                        "{} bytes does not fit in {}",
                        bytes.len(),
                        Self::program_capacity()
                    ),
                });
            }
        }

        let mut staged = self.arch.clone();
        *staged.core_mut() = Core {
            registers,
            memory,
            stack,
            pc,
        };
        staged.load_state(state)?;

        let mut program = Program::new();
        if let Some(bytes) = image {
            program.set(bytes);
        }
        self.arch = staged;
        self.program = program;
        self.steps = 0;
        self.state = if self.program.is_loaded() {
            VmState::Ready
        } else {
            VmState::Unloaded
        };
        info!("restored {} snapshot (pc {pc:#06x})", A::ID);
        Ok(())
    }
}
