//! Decode errors for instruction words.

use thiserror::Error;

/// Errors that occur while dispatching a word to an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No instruction in the catalog accepts this word.
    #[error("unknown opcode {word:#06x}")]
    UnknownOpcode { word: u16 },

    /// More than one instruction accepts this word. This is a catalog bug.
    #[error("ambiguous opcode {word:#06x}: matches {}", mnemonics.join(", "))]
    AmbiguousOpcode { word: u16, mnemonics: Vec<String> },
}
