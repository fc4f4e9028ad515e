//! wordvm verifier, static validation of opcode catalogs.
//!
//! The verifier checks a catalog BEFORE any instruction executes, so that
//! dispatch can rely on at most one entry matching any word. It collects
//! ALL errors (not just the first) and returns them.
//!
//! # Usage
//!
//! ```
//! use wordvm_common::{OpPattern, OperandSpec};
//! use wordvm_verifier::{verify_catalog, CatalogEntry};
//!
//! let jp = OpPattern::new(0x1000, vec![OperandSpec::address(0x0fff)]);
//! let call = OpPattern::new(0x2000, vec![OperandSpec::address(0x0fff)]);
//!
//! let entries = [CatalogEntry::new("JP", &jp), CatalogEntry::new("CALL", &call)];
//! assert!(verify_catalog(&entries).is_ok());
//! ```
//!
//! # Passes
//!
//! 1. **Shape**: operand count, empty and overlapping masks, stray pattern bits
//! 2. **Ambiguity**: no two entries may accept the same word

pub mod ambiguity;
pub mod error;
pub mod shape;

pub use ambiguity::witness;
pub use error::VerifyError;

use wordvm_common::OpPattern;

/// One catalog entry as seen by the verifier.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry<'a> {
    pub mnemonic: &'a str,
    pub pattern: &'a OpPattern,
}

impl<'a> CatalogEntry<'a> {
    pub fn new(mnemonic: &'a str, pattern: &'a OpPattern) -> Self {
        Self { mnemonic, pattern }
    }
}

/// Verify a catalog.
///
/// Returns `Ok(())` if the catalog passes all checks, or
/// `Err(Vec<VerifyError>)` with all errors found.
pub fn verify_catalog(entries: &[CatalogEntry<'_>]) -> Result<(), Vec<VerifyError>> {
    let mut all_errors = Vec::new();

    // Pass 1: Shape
    all_errors.extend(shape::check_shape(entries));

    // Pass 2: Ambiguity
    all_errors.extend(ambiguity::check_ambiguity(entries));

    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(all_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordvm_common::OperandSpec;

    #[test]
    fn empty_catalog_is_valid() {
        assert!(verify_catalog(&[]).is_ok());
    }

    #[test]
    fn multiple_errors_collected() {
        let bad_shape = OpPattern::new(
            0x8000,
            vec![OperandSpec::register(0x0f00), OperandSpec::register(0x0f00)],
        );
        let wildcard = OpPattern::new(0x0000, vec![OperandSpec::address(0x0fff)]);
        let exact = OpPattern::new(0x00e0, vec![]);
        let entries = [
            CatalogEntry::new("BAD", &bad_shape),
            CatalogEntry::new("SYS", &wildcard),
            CatalogEntry::new("CLS", &exact),
        ];

        let errors = verify_catalog(&entries).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, VerifyError::OverlappingOperands { .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, VerifyError::AmbiguousPair { witness: 0x00e0, .. })));
    }
}
