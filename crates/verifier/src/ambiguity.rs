//! Pairwise ambiguity check.
//!
//! Two entries can both match some word exactly when their patterns agree
//! on every bit that is fixed in both. Entries whose pattern sets operand
//! bits never match anything and are left to the shape check.

use crate::error::VerifyError;
use crate::CatalogEntry;
use wordvm_common::OpPattern;

/// A word accepted by both patterns, if one exists.
pub fn witness(a: &OpPattern, b: &OpPattern) -> Option<u16> {
    if a.stray_bits() != 0 || b.stray_bits() != 0 {
        return None;
    }
    let shared = a.fixed_mask() & b.fixed_mask();
    if (a.pattern ^ b.pattern) & shared != 0 {
        return None;
    }
    // Each pattern only sets its own fixed bits and they agree where both
    // are fixed, so the union satisfies both.
    Some(a.pattern | b.pattern)
}

/// Run the ambiguity check over every pair of entries.
pub fn check_ambiguity(entries: &[CatalogEntry<'_>]) -> Vec<VerifyError> {
    let mut errors = Vec::new();

    for (i, first) in entries.iter().enumerate() {
        for (j, second) in entries.iter().enumerate().skip(i + 1) {
            if let Some(word) = witness(first.pattern, second.pattern) {
                errors.push(VerifyError::AmbiguousPair {
                    first: i,
                    first_mnemonic: first.mnemonic.to_string(),
                    second: j,
                    second_mnemonic: second.mnemonic.to_string(),
                    witness: word,
                });
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordvm_common::OperandSpec;

    fn sys() -> OpPattern {
        OpPattern::new(0x0000, vec![OperandSpec::address(0x0fff)])
    }

    fn ret() -> OpPattern {
        OpPattern::new(0x00ee, vec![])
    }

    fn jp() -> OpPattern {
        OpPattern::new(0x1000, vec![OperandSpec::address(0x0fff)])
    }

    #[test]
    fn disjoint_prefixes_are_unambiguous() {
        assert_eq!(witness(&sys(), &jp()), None);
        assert_eq!(witness(&ret(), &jp()), None);
    }

    #[test]
    fn wildcard_overlapping_exact_word() {
        let w = witness(&sys(), &ret()).unwrap();
        assert_eq!(w, 0x00ee);
        assert!(sys().matches(w));
        assert!(ret().matches(w));
    }

    #[test]
    fn identical_patterns_collide() {
        assert_eq!(witness(&jp(), &jp()), Some(0x1000));
    }

    #[test]
    fn pairs_are_reported_once_in_catalog_order() {
        let (a, b, c) = (sys(), ret(), jp());
        let entries = [
            CatalogEntry::new("SYS", &a),
            CatalogEntry::new("RET", &b),
            CatalogEntry::new("JP", &c),
        ];
        assert_eq!(
            check_ambiguity(&entries),
            vec![VerifyError::AmbiguousPair {
                first: 0,
                first_mnemonic: "SYS".into(),
                second: 1,
                second_mnemonic: "RET".into(),
                witness: 0x00ee,
            }]
        );
    }

    #[test]
    fn never_matching_pattern_is_not_ambiguous() {
        let broken = OpPattern::new(0x1200, vec![OperandSpec::address(0x0fff)]);
        assert_eq!(witness(&broken, &jp()), None);
    }
}
