//! wordvm common types and instruction-word decoding.
//!
//! This crate provides the leaf building blocks of the engine:
//!
//! - [`math`]: overflow-reporting fixed-width arithmetic ([`Width`], [`MathFlag`])
//! - [`instruction`]: the 16-bit big-endian instruction word
//! - [`OperandSpec`]: a bit mask plus semantic tag for one operand field
//! - [`OpPattern`]: the fixed bits and operand layout of one instruction
//! - [`DecodeError`]: errors from dispatching a word
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime cost)
//! and has no other dependencies.

pub mod error;
pub mod instruction;
pub mod math;
pub mod operand;
pub mod pattern;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use instruction::{Word, INSTRUCTION_WIDTH};
pub use math::{MathFlag, Width};
pub use operand::{OperandKind, OperandSpec};
pub use pattern::{OpPattern, Operands, MAX_OPERANDS};
