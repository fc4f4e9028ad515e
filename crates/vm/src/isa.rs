//! Instruction set: a validated catalog of ops and word dispatch.

use log::debug;
use wordvm_common::{DecodeError, Word};
use wordvm_verifier::{verify_catalog, CatalogEntry};

use crate::error::IsaError;
use crate::op::Op;

/// An ordered catalog of instructions in which no word matches more than
/// one entry.
pub struct Isa<A> {
    ops: Vec<Op<A>>,
}

impl<A> Isa<A> {
    /// Validate `ops` and build the instruction set.
    ///
    /// Every shape and ambiguity problem in the catalog is reported at once.
    pub fn new(ops: Vec<Op<A>>) -> Result<Self, IsaError> {
        let entries: Vec<CatalogEntry<'_>> = ops
            .iter()
            .map(|op| CatalogEntry::new(op.mnemonic(), op.pattern()))
            .collect();
        verify_catalog(&entries).map_err(|errors| IsaError { errors })?;
        debug!("instruction set built with {} ops", ops.len());
        Ok(Self { ops })
    }

    /// Build an instruction set without validating it.
    ///
    /// Dispatch still refuses ambiguous words at runtime.
    pub fn new_unchecked(ops: Vec<Op<A>>) -> Self {
        Self { ops }
    }

    /// Find the one instruction that accepts `word`.
    pub fn dispatch(&self, word: Word) -> Result<&Op<A>, DecodeError> {
        let mut matching = self.ops.iter().filter(|op| op.matches(word));
        let first = matching
            .next()
            .ok_or(DecodeError::UnknownOpcode { word })?;

        let rest: Vec<&Op<A>> = matching.collect();
        if rest.is_empty() {
            return Ok(first);
        }

        let mnemonics = std::iter::once(first)
            .chain(rest)
            .map(|op| op.mnemonic().to_string())
            .collect();
        Err(DecodeError::AmbiguousOpcode { word, mnemonics })
    }

    /// Render `word` as assembly text, or as a data word if nothing matches.
    pub fn disassemble(&self, word: Word) -> String {
        match self.dispatch(word) {
            Ok(op) => op.disassemble(word),
            Err(_) => format!("DW 0x{word:04x}"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Op<A>> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Toy;
    use wordvm_common::OperandSpec;
    use wordvm_verifier::VerifyError;

    fn toy_isa() -> Isa<Toy> {
        Isa::new(Toy::catalog_ops()).unwrap()
    }

    #[test]
    fn dispatch_finds_unique_match() {
        let isa = toy_isa();
        assert_eq!(isa.dispatch(0x1204).unwrap().mnemonic(), "JP");
        assert_eq!(isa.dispatch(0x00ee).unwrap().mnemonic(), "RET");
        assert_eq!(isa.dispatch(0x0000).unwrap().mnemonic(), "NOP");
    }

    #[test]
    fn dispatch_unknown_word() {
        let isa = toy_isa();
        assert_eq!(
            isa.dispatch(0xffff).unwrap_err(),
            DecodeError::UnknownOpcode { word: 0xffff }
        );
    }

    #[test]
    fn dispatch_is_order_independent() {
        let forward = toy_isa();
        let mut ops = Toy::catalog_ops();
        ops.reverse();
        let backward = Isa::new(ops).unwrap();
        for word in [0x0000, 0x00ee, 0x1204, 0x2204, 0x30aa, 0x6aaa, 0x8ab4, 0xa123] {
            assert_eq!(
                forward.dispatch(word).unwrap().mnemonic(),
                backward.dispatch(word).unwrap().mnemonic(),
                "word {word:#06x}"
            );
        }
    }

    #[test]
    fn new_rejects_ambiguous_catalog() {
        let mut ops = Toy::catalog_ops();
        ops.push(Op::new(
            "SYS",
            0x0000,
            vec![OperandSpec::address(0x0fff)],
            |_, _| Ok(()),
        ));
        let err = Isa::new(ops).err().unwrap();
        assert!(err
            .errors
            .iter()
            .all(|e| matches!(e, VerifyError::AmbiguousPair { .. })));
        assert_eq!(err.errors.len(), 2, "collides with NOP and RET");
    }

    #[test]
    fn unchecked_dispatch_reports_ambiguity() {
        let mut ops = Toy::catalog_ops();
        ops.push(Op::new(
            "SYS",
            0x0000,
            vec![OperandSpec::address(0x0fff)],
            |_, _| Ok(()),
        ));
        let isa = Isa::new_unchecked(ops);
        assert_eq!(
            isa.dispatch(0x00ee).unwrap_err(),
            DecodeError::AmbiguousOpcode {
                word: 0x00ee,
                mnemonics: vec!["RET".into(), "SYS".into()],
            }
        );
        assert_eq!(isa.dispatch(0x0123).unwrap().mnemonic(), "SYS");
    }

    #[test]
    fn disassemble_words() {
        let isa = toy_isa();
        assert_eq!(isa.disassemble(0x1204), "JP 0x204");
        assert_eq!(isa.disassemble(0x30aa), "SE V0, 0xaa");
        assert_eq!(isa.disassemble(0x8ab4), "ADD VA, VB");
        assert_eq!(isa.disassemble(0x00ee), "RET");
        assert_eq!(isa.disassemble(0xffff), "DW 0xffff");
    }
}
