//! Bounded call stack of return addresses.

use crate::error::StackError;

/// Fixed-capacity LIFO of return addresses.
///
/// The capacity is set when the architecture is built and never grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStack {
    entries: Vec<u16>,
    capacity: usize,
}

impl CallStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild a stack from its entries, bottom first.
    pub fn from_entries(capacity: usize, entries: Vec<u16>) -> Result<Self, StackError> {
        if entries.len() > capacity {
            return Err(StackError::Overflow { capacity });
        }
        Ok(Self { entries, capacity })
    }

    pub fn push(&mut self, address: u16) -> Result<(), StackError> {
        if self.entries.len() >= self.capacity {
            return Err(StackError::Overflow {
                capacity: self.capacity,
            });
        }
        self.entries.push(address);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, StackError> {
        self.entries.pop().ok_or(StackError::Underflow)
    }

    /// The most recently pushed address.
    pub fn top(&self) -> Option<u16> {
        self.entries.last().copied()
    }

    /// All entries, bottom first.
    pub fn inspect(&self) -> &[u16] {
        &self.entries
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
