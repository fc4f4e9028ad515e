//! Fixed-width register file.

use wordvm_common::math::{self, Width};

/// A register file whose values are truncated to one width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    values: Vec<u16>,
    width: Width,
}

impl Registers {
    /// A zeroed register file.
    pub fn new(count: usize, width: Width) -> Self {
        Self {
            values: vec![0; count],
            width,
        }
    }

    /// Rebuild a register file from saved values.
    ///
    /// Returns `None` if any value does not fit the width.
    pub fn from_values(values: Vec<u16>, width: Width) -> Option<Self> {
        if values.iter().any(|&v| v > width.max()) {
            return None;
        }
        Some(Self { values, width })
    }

    pub fn get(&self, index: usize) -> Option<u16> {
        self.values.get(index).copied()
    }

    /// Store `value` truncated to the register width.
    ///
    /// Returns the stored value, or `None` if the register does not exist.
    pub fn set(&mut self, index: usize, value: u16) -> Option<u16> {
        let slot = self.values.get_mut(index)?;
        *slot = math::cast(i64::from(value), self.width);
        Some(*slot)
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub fn clear(&mut self) {
        self.values.fill(0);
    }
}
