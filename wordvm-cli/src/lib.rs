//! Support code for the `wordvm` binary.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input, load, configuration or snapshot error
//! - 2: Instruction catalog failed verification
//! - 3: Runtime error

pub mod config;
pub mod loader;

use wordvm_vm::{IsaError, RuntimeError};

/// Map a command failure to the process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.chain().any(|cause| cause.is::<IsaError>()) {
        2
    } else if err.chain().any(|cause| cause.is::<RuntimeError>()) {
        3
    } else {
        1
    }
}
