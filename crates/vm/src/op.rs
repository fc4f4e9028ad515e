//! One instruction: decode pattern, mnemonic and behavior.

use std::fmt;

use wordvm_common::{OpPattern, OperandKind, OperandSpec, Operands, Word};

use crate::context::Context;
use crate::error::RuntimeError;

/// The effect of an instruction, applied through the execution context.
///
/// Behaviors validate their operands before mutating anything, so a failing
/// behavior leaves the architecture untouched.
pub type Behavior<A> = fn(&mut Context<'_, A>, Operands) -> Result<(), RuntimeError>;

/// A single instruction of an instruction set. Immutable once built.
pub struct Op<A> {
    mnemonic: &'static str,
    pattern: OpPattern,
    behavior: Behavior<A>,
}

impl<A> Op<A> {
    /// Build an instruction from its fixed bits, mnemonic, operand layout
    /// and behavior.
    pub fn new(
        mnemonic: &'static str,
        pattern: Word,
        operands: Vec<OperandSpec>,
        behavior: Behavior<A>,
    ) -> Self {
        Self {
            mnemonic,
            pattern: OpPattern::new(pattern, operands),
            behavior,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        self.mnemonic
    }

    pub fn pattern(&self) -> &OpPattern {
        &self.pattern
    }

    pub fn matches(&self, word: Word) -> bool {
        self.pattern.matches(word)
    }

    pub fn decode(&self, word: Word) -> Operands {
        self.pattern.decode(word)
    }

    pub fn execute(
        &self,
        context: &mut Context<'_, A>,
        operands: Operands,
    ) -> Result<(), RuntimeError> {
        (self.behavior)(context, operands)
    }

    /// Render `word` as assembly text, e.g. `ADD VA, VB`.
    pub fn disassemble(&self, word: Word) -> String {
        let operands: Vec<String> = self
            .pattern
            .operands
            .iter()
            .map(|spec| format_operand(spec, spec.extract(word)))
            .collect();
        if operands.is_empty() {
            self.mnemonic.to_string()
        } else {
            format!("{} {}", self.mnemonic, operands.join(", "))
        }
    }
}

fn format_operand(spec: &OperandSpec, value: u16) -> String {
    match spec.kind {
        OperandKind::Register => format!("V{value:X}"),
        OperandKind::Address | OperandKind::Constant => {
            format!("0x{value:0width$x}", width = spec.hex_digits())
        }
        OperandKind::None => value.to_string(),
    }
}

impl<A> Clone for Op<A> {
    fn clone(&self) -> Self {
        Self {
            mnemonic: self.mnemonic,
            pattern: self.pattern.clone(),
            behavior: self.behavior,
        }
    }
}

impl<A> fmt::Debug for Op<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Op")
            .field("mnemonic", &self.mnemonic)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}
