//! Decode patterns: which words an instruction accepts and where its
//! operands live.

use crate::instruction::Word;
use crate::operand::OperandSpec;

/// Maximum number of operands an instruction may declare.
pub const MAX_OPERANDS: usize = 3;

/// Operand values extracted from a word, in declared order. Unused slots are 0.
pub type Operands = [u16; MAX_OPERANDS];

/// The fixed bits of an instruction together with its operand layout.
///
/// A word matches when every bit not covered by an operand mask equals the
/// corresponding bit of `pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpPattern {
    pub pattern: Word,
    pub operands: Vec<OperandSpec>,
}

impl OpPattern {
    pub fn new(pattern: Word, operands: Vec<OperandSpec>) -> Self {
        Self { pattern, operands }
    }

    /// Union of all operand masks.
    pub fn operand_mask(&self) -> Word {
        self.operands.iter().fold(0, |acc, op| acc | op.mask)
    }

    /// Bits that must equal `pattern` for a word to match.
    pub fn fixed_mask(&self) -> Word {
        !self.operand_mask()
    }

    pub fn matches(&self, word: Word) -> bool {
        word & self.fixed_mask() == self.pattern
    }

    /// Extract each operand of `word` in declared order.
    ///
    /// Operands past [`MAX_OPERANDS`] are ignored; catalogs are checked for
    /// that before use.
    pub fn decode(&self, word: Word) -> Operands {
        let mut values = [0; MAX_OPERANDS];
        for (slot, spec) in values.iter_mut().zip(&self.operands) {
            *slot = spec.extract(word);
        }
        values
    }

    /// Pattern bits that fall inside an operand mask. Non-zero means no word
    /// can ever match.
    pub fn stray_bits(&self) -> Word {
        self.pattern & self.operand_mask()
    }

    /// Render the pattern as hex with operand nibbles shown as `?`.
    ///
    /// `0x8004` with operands `0x0f00` and `0x00f0` renders as `8??4`.
    pub fn template(&self) -> String {
        let mask = self.operand_mask();
        (0..4)
            .rev()
            .map(|nibble| {
                let shift = nibble * 4;
                if (mask >> shift) & 0xf != 0 {
                    '?'
                } else {
                    let digit = (self.pattern >> shift) & 0xf;
                    char::from_digit(u32::from(digit), 16).unwrap_or('?')
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_reg_reg() -> OpPattern {
        OpPattern::new(
            0x8004,
            vec![OperandSpec::register(0x0f00), OperandSpec::register(0x00f0)],
        )
    }

    #[test]
    fn fixed_mask_is_complement_of_operands() {
        let p = add_reg_reg();
        assert_eq!(p.operand_mask(), 0x0ff0);
        assert_eq!(p.fixed_mask(), 0xf00f);
    }

    #[test]
    fn matches_on_fixed_bits_only() {
        let p = add_reg_reg();
        assert!(p.matches(0x8ab4));
        assert!(p.matches(0x8004));
        assert!(!p.matches(0x8ab5));
        assert!(!p.matches(0x9ab4));
    }

    #[test]
    fn decode_in_declared_order() {
        let p = add_reg_reg();
        assert_eq!(p.decode(0x8ab4), [0xa, 0xb, 0]);
    }

    #[test]
    fn no_operands_matches_exact_word() {
        let p = OpPattern::new(0x00ee, vec![]);
        assert_eq!(p.fixed_mask(), 0xffff);
        assert!(p.matches(0x00ee));
        assert!(!p.matches(0x00e0));
        assert_eq!(p.decode(0x00ee), [0, 0, 0]);
    }

    #[test]
    fn stray_bits_detected() {
        let p = OpPattern::new(0x1200, vec![OperandSpec::address(0x0fff)]);
        assert_eq!(p.stray_bits(), 0x0200);
        assert!(!p.matches(0x1200));
    }

    #[test]
    fn template_rendering() {
        assert_eq!(add_reg_reg().template(), "8??4");
        assert_eq!(OpPattern::new(0x00ee, vec![]).template(), "00ee");
        assert_eq!(
            OpPattern::new(0x1000, vec![OperandSpec::address(0x0fff)]).template(),
            "1???"
        );
    }
}
