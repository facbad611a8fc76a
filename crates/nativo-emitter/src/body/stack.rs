//! The simulated evaluation stack.

use nativo_common::TranslateErrorKind;
use nativo_metadata::OpCode;

use crate::ir::Expr;

#[derive(Debug, Default)]
pub struct EvalStack {
    values: Vec<Expr>,
}

impl EvalStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Expr) {
        self.values.push(value);
    }

    pub fn pop(&mut self, opcode: &OpCode) -> Result<Expr, TranslateErrorKind> {
        self.values
            .pop()
            .ok_or_else(|| TranslateErrorKind::StackUnderflow {
                mnemonic: opcode.mnemonic().to_string(),
            })
    }

    /// Pop `count` values and return them in push order, so the first
    /// element is the deepest value.
    pub fn pop_n(&mut self, count: usize, opcode: &OpCode) -> Result<Vec<Expr>, TranslateErrorKind> {
        if count > self.values.len() {
            return Err(TranslateErrorKind::StackUnderflow {
                mnemonic: opcode.mnemonic().to_string(),
            });
        }
        Ok(self.values.split_off(self.values.len() - count))
    }

    pub fn peek(&self, opcode: &OpCode) -> Result<&Expr, TranslateErrorKind> {
        self.values
            .last()
            .ok_or_else(|| TranslateErrorKind::StackUnderflow {
                mnemonic: opcode.mnemonic().to_string(),
            })
    }

    pub fn depth(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
