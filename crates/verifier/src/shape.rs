//! Per-instruction shape checks.
//!
//! Each entry must declare at most three operands, every operand must select
//! at least one bit, operand masks must be disjoint, and the fixed pattern
//! must not set bits that belong to an operand.

use crate::error::VerifyError;
use crate::CatalogEntry;
use wordvm_common::MAX_OPERANDS;

/// Run the shape check over every entry.
pub fn check_shape(entries: &[CatalogEntry<'_>]) -> Vec<VerifyError> {
    let mut errors = Vec::new();

    for (at, entry) in entries.iter().enumerate() {
        let operands = &entry.pattern.operands;

        if operands.len() > MAX_OPERANDS {
            errors.push(VerifyError::TooManyOperands {
                at,
                mnemonic: entry.mnemonic.to_string(),
                count: operands.len(),
            });
        }

        for (index, spec) in operands.iter().enumerate() {
            if spec.mask == 0 {
                errors.push(VerifyError::EmptyOperandMask {
                    at,
                    mnemonic: entry.mnemonic.to_string(),
                    index,
                });
            }
        }

        for (i, first) in operands.iter().enumerate() {
            for second in &operands[i + 1..] {
                if first.mask & second.mask != 0 {
                    errors.push(VerifyError::OverlappingOperands {
                        at,
                        mnemonic: entry.mnemonic.to_string(),
                        first: first.mask,
                        second: second.mask,
                    });
                }
            }
        }

        let stray = entry.pattern.stray_bits();
        if stray != 0 {
            errors.push(VerifyError::PatternBitsInOperand {
                at,
                mnemonic: entry.mnemonic.to_string(),
                bits: stray,
            });
        }
    }

    errors
}
