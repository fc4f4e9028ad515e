//! The execution context an instruction runs against.

use std::ops::{Deref, DerefMut};

use wordvm_common::math::{self, Width};
use wordvm_common::{Word, INSTRUCTION_WIDTH};

use crate::arch::{Architecture, Core};
use crate::error::{RuntimeError, StackError};

/// A live view of the architecture for the instruction currently executing.
///
/// The context borrows the VM's architecture; it never copies state. It
/// adds program-counter control and accessors that tie failures to the
/// executing instruction.
pub struct Context<'a, A> {
    arch: &'a mut A,
    at: u16,
    word: Word,
}

impl<'a, A: Architecture> Context<'a, A> {
    /// Wrap `arch` for executing `word`, fetched from address `at`.
    pub fn new(arch: &'a mut A, at: u16, word: Word) -> Self {
        Self { arch, at, word }
    }

    /// Address the executing instruction was fetched from.
    pub fn at(&self) -> u16 {
        self.at
    }

    /// The executing instruction word.
    pub fn word(&self) -> Word {
        self.word
    }

    pub fn core(&self) -> &Core {
        self.arch.core()
    }

    pub fn core_mut(&mut self) -> &mut Core {
        self.arch.core_mut()
    }

    // --- Program counter ---

    /// Address of the next instruction to fetch.
    pub fn pc(&self) -> u16 {
        self.core().pc
    }

    /// Set the program counter. Not checked here; a bad target fails on the
    /// next fetch.
    pub fn jump(&mut self, address: u16) {
        self.core_mut().pc = address;
    }

    /// Move the program counter by `delta` instructions, wrapping at 16 bits.
    pub fn hop(&mut self, delta: i32) {
        let target = i64::from(self.pc()) + i64::from(delta) * i64::from(INSTRUCTION_WIDTH);
        self.core_mut().pc = math::cast(target, Width::U16);
    }

    pub fn hop_forwards(&mut self, count: u16) {
        self.hop(i32::from(count));
    }

    pub fn hop_backwards(&mut self, count: u16) {
        self.hop(-i32::from(count));
    }

    // --- Registers ---

    pub fn register(&self, index: u16) -> Result<u16, RuntimeError> {
        self.core()
            .registers
            .get(usize::from(index))
            .ok_or_else(|| self.register_error(index))
    }

    /// Store `value`, truncated to the register width.
    pub fn set_register(&mut self, index: u16, value: u16) -> Result<(), RuntimeError> {
        match self.core_mut().registers.set(usize::from(index), value) {
            Some(_) => Ok(()),
            None => Err(self.register_error(index)),
        }
    }

    /// Fail unless every index names a register.
    pub fn check_registers(&self, indices: &[u16]) -> Result<(), RuntimeError> {
        for &index in indices {
            self.register(index)?;
        }
        Ok(())
    }

    fn register_error(&self, index: u16) -> RuntimeError {
        RuntimeError::RegisterOutOfRange {
            at: self.at,
            index: usize::from(index),
            count: self.core().registers.len(),
        }
    }

    // --- Memory ---

    pub fn read(&self, address: usize) -> Result<u8, RuntimeError> {
        self.core()
            .read(address)
            .ok_or_else(|| self.memory_error(address))
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), RuntimeError> {
        match self.core_mut().write(address, value) {
            Some(()) => Ok(()),
            None => Err(self.memory_error(address)),
        }
    }

    /// Fail unless `len` bytes from `address` are addressable.
    pub fn check_memory(&self, address: usize, len: usize) -> Result<(), RuntimeError> {
        if self.core().in_bounds(address, len) {
            Ok(())
        } else {
            let end = address.saturating_add(len.saturating_sub(1));
            Err(self.memory_error(end.max(address)))
        }
    }

    fn memory_error(&self, address: usize) -> RuntimeError {
        RuntimeError::MemoryOutOfBounds {
            at: self.at,
            address,
            size: self.core().memory.len(),
        }
    }

    // --- Call stack ---

    pub fn push_return(&mut self, address: u16) -> Result<(), RuntimeError> {
        let (at, word) = (self.at, self.word);
        self.core_mut()
            .stack
            .push(address)
            .map_err(|err| stack_error(err, at, word))
    }

    pub fn pop_return(&mut self) -> Result<u16, RuntimeError> {
        let (at, word) = (self.at, self.word);
        self.core_mut()
            .stack
            .pop()
            .map_err(|err| stack_error(err, at, word))
    }
}

fn stack_error(err: StackError, at: u16, word: Word) -> RuntimeError {
    match err {
        StackError::Overflow { capacity } => RuntimeError::StackOverflow { at, word, capacity },
        StackError::Underflow => RuntimeError::StackUnderflow { at, word },
    }
}

impl<A> Deref for Context<'_, A> {
    type Target = A;

    fn deref(&self) -> &A {
        self.arch
    }
}

impl<A> DerefMut for Context<'_, A> {
    fn deref_mut(&mut self) -> &mut A {
        self.arch
    }
}
