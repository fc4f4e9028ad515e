//! Operand fields within an instruction word.

use crate::instruction::Word;

/// What an operand field means to the instruction that reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// Index into the register file.
    Register,
    /// A memory address.
    Address,
    /// An immediate constant.
    Constant,
    /// A field that is decoded but carries no meaning.
    None,
}

/// A bit mask selecting one operand field, plus its meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandSpec {
    pub mask: Word,
    pub kind: OperandKind,
}

impl OperandSpec {
    pub const fn new(mask: Word, kind: OperandKind) -> Self {
        Self { mask, kind }
    }

    pub const fn register(mask: Word) -> Self {
        Self::new(mask, OperandKind::Register)
    }

    pub const fn address(mask: Word) -> Self {
        Self::new(mask, OperandKind::Address)
    }

    pub const fn constant(mask: Word) -> Self {
        Self::new(mask, OperandKind::Constant)
    }

    /// Extract this operand from `word`.
    pub fn extract(&self, word: Word) -> u16 {
        extract(word, self.mask)
    }

    /// Number of hex digits needed to print the widest value of this field.
    pub fn hex_digits(&self) -> usize {
        let bits = self.mask.count_ones() as usize;
        bits.div_ceil(4).max(1)
    }
}

/// Extract the field selected by `mask`, right-aligned.
///
/// `extract(0x3a10, 0x0f00) == 0xa`. No validation is performed on the
/// resulting value.
pub fn extract(word: Word, mask: Word) -> u16 {
    if mask == 0 {
        return 0;
    }
    (word & mask) >> mask.trailing_zeros()
}
