//! Verification errors for opcode catalogs.
//!
//! Every error names the catalog position (`at`) and mnemonic of the
//! offending entry. The verifier collects ALL errors, not just the first.

use thiserror::Error;

/// Problems found while validating a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    // --- Shape ---
    /// More operands than an instruction may carry.
    #[error("{mnemonic} (entry {at}) declares {count} operands (max 3)")]
    TooManyOperands {
        at: usize,
        mnemonic: String,
        count: usize,
    },

    /// An operand selects no bits at all.
    #[error("{mnemonic} (entry {at}) operand {index} has an empty mask")]
    EmptyOperandMask {
        at: usize,
        mnemonic: String,
        index: usize,
    },

    /// Two operand masks of the same instruction share bits.
    #[error("{mnemonic} (entry {at}) operand masks {first:#06x} and {second:#06x} overlap")]
    OverlappingOperands {
        at: usize,
        mnemonic: String,
        first: u16,
        second: u16,
    },

    /// The pattern sets bits that belong to an operand, so it can never match.
    #[error("{mnemonic} (entry {at}) pattern sets operand bits {bits:#06x}")]
    PatternBitsInOperand {
        at: usize,
        mnemonic: String,
        bits: u16,
    },

    // --- Ambiguity ---
    /// Two instructions both accept at least one word.
    #[error(
        "{first_mnemonic} (entry {first}) and {second_mnemonic} (entry {second}) both match {witness:#06x}"
    )]
    AmbiguousPair {
        first: usize,
        first_mnemonic: String,
        second: usize,
        second_mnemonic: String,
        witness: u16,
    },
}
