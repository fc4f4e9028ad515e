//! Errors for the wordvm engine.
//!
//! Runtime errors carry the address (`at`) of the instruction that raised
//! them. None of these are retried; they surface to the caller of the
//! operation that triggered them.

use std::path::PathBuf;

use thiserror::Error;
use wordvm_common::DecodeError;
use wordvm_verifier::VerifyError;

/// Errors that abort a single step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The fetched word did not dispatch to exactly one instruction.
    #[error("{source} at {at:#06x}")]
    Decode {
        at: u16,
        #[source]
        source: DecodeError,
    },

    /// Instruction fetch outside the loaded image.
    #[error("fetch at {address:#06x} is out of bounds (length {len})")]
    Bounds { address: u16, len: usize },

    /// An instruction touched memory outside the architecture's memory.
    #[error("memory access at {address:#06x} out of bounds (size {size}) at {at:#06x}")]
    MemoryOutOfBounds { at: u16, address: usize, size: usize },

    /// An instruction named a register that does not exist.
    #[error("register {index} out of range (count {count}) at {at:#06x}")]
    RegisterOutOfRange { at: u16, index: usize, count: usize },

    /// A call-type instruction found the call stack full.
    #[error("stack overflow (capacity {capacity}) executing {word:#06x} at {at:#06x}")]
    StackOverflow { at: u16, word: u16, capacity: usize },

    /// A return-type instruction found the call stack empty.
    #[error("stack underflow executing {word:#06x} at {at:#06x}")]
    StackUnderflow { at: u16, word: u16 },
}

/// Errors from the call stack itself, before they are tied to an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StackError {
    #[error("stack overflow (capacity {capacity})")]
    Overflow { capacity: usize },

    #[error("stack underflow")]
    Underflow,
}

/// Errors from loading a program.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The loader does not handle this kind of source.
    #[error("no program loader for source kind '{kind}'")]
    Unsupported { kind: &'static str },

    /// The program does not fit in memory above the load offset.
    #[error("program of {len} bytes does not fit in {capacity} bytes of memory")]
    TooLarge { len: usize, capacity: usize },

    /// The source could not be read.
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from taking or restoring a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// Architecture identifier or format version differ from the live VM.
    #[error(
        "snapshot is for {found_arch} v{found_version}, expected {expected_arch} v{expected_version}"
    )]
    Mismatch {
        expected_arch: String,
        expected_version: u32,
        found_arch: String,
        found_version: u32,
    },

    /// A required key is absent.
    #[error("snapshot is missing key '{key}'")]
    MissingKey { key: String },

    /// A key holds a value of the wrong shape.
    #[error("snapshot key '{key}' is malformed: {reason}")]
    Malformed { key: String, reason: String },

    /// A key holds a sequence of the wrong length.
    #[error("snapshot key '{key}' has {found} entries, expected {expected}")]
    SizeMismatch {
        key: String,
        expected: usize,
        found: usize,
    },

    /// The snapshot text is not valid JSON.
    #[error("invalid snapshot JSON: {0}")]
    Json(String),
}

/// The catalog handed to an ISA failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid instruction catalog ({} problems)", errors.len())]
pub struct IsaError {
    pub errors: Vec<VerifyError>,
}
