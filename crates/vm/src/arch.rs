//! Architecture contract and the core state every architecture owns.

use wordvm_common::Width;

use crate::error::SnapshotError;
use crate::op::Op;
use crate::registers::Registers;
use crate::snapshot::SnapshotState;
use crate::stack::CallStack;

/// A concrete machine that can be plugged into the engine.
///
/// An architecture declares its capacities, supplies its instruction
/// catalog, and owns a [`Core`] holding registers, memory, call stack and
/// program counter. Peripheral state (timers, index registers, ...) lives in
/// the implementing type beside the core.
pub trait Architecture: Clone + Sized {
    /// Identifier written into snapshots.
    const ID: &'static str;
    /// Bytes of addressable memory.
    const MEMORY_SIZE: usize;
    /// Number of data registers.
    const REGISTER_COUNT: usize;
    /// Width of each data register.
    const REGISTER_WIDTH: Width;
    /// Maximum call depth.
    const STACK_DEPTH: usize;
    /// Program counter after reset.
    const ENTRY_POINT: u16;
    /// Memory offset the program image is copied to.
    const LOAD_OFFSET: u16;

    /// The instruction catalog. Validated once when a VM is built.
    fn catalog() -> Vec<Op<Self>>;

    fn core(&self) -> &Core;

    fn core_mut(&mut self) -> &mut Core;

    /// Reset state that lives outside the core.
    fn reset_peripherals(&mut self) {}

    /// Write architecture-defined keys into a snapshot.
    fn save_state(&self, _state: &mut SnapshotState) -> Result<(), SnapshotError> {
        Ok(())
    }

    /// Read architecture-defined keys back from a snapshot.
    ///
    /// Called on a staged copy; an error discards the copy.
    fn load_state(&mut self, _state: &SnapshotState) -> Result<(), SnapshotError> {
        Ok(())
    }
}

/// State shared by every architecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Core {
    pub registers: Registers,
    pub memory: Vec<u8>,
    pub stack: CallStack,
    pub pc: u16,
}

impl Core {
    /// Zeroed state sized for `A`, with the program counter at its entry point.
    pub fn new<A: Architecture>() -> Self {
        Self {
            registers: Registers::new(A::REGISTER_COUNT, A::REGISTER_WIDTH),
            memory: vec![0; A::MEMORY_SIZE],
            stack: CallStack::new(A::STACK_DEPTH),
            pc: A::ENTRY_POINT,
        }
    }

    /// Zero registers and memory, empty the stack and move the program
    /// counter to `entry`.
    pub fn clear(&mut self, entry: u16) {
        self.registers.clear();
        self.memory.fill(0);
        self.stack.clear();
        self.pc = entry;
    }

    pub fn read(&self, address: usize) -> Option<u8> {
        self.memory.get(address).copied()
    }

    pub fn write(&mut self, address: usize, value: u8) -> Option<()> {
        let slot = self.memory.get_mut(address)?;
        *slot = value;
        Some(())
    }

    /// Whether `len` bytes starting at `address` are all addressable.
    pub fn in_bounds(&self, address: usize, len: usize) -> bool {
        address
            .checked_add(len)
            .is_some_and(|end| end <= self.memory.len())
    }
}
