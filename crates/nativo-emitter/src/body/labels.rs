//! Jump-target pre-scan.

use nativo_common::TranslateErrorKind;
use nativo_metadata::{Instruction, OpCode};
use rustc_hash::FxHashMap;

use crate::names::label_name;

pub fn is_branch(opcode: &OpCode) -> bool {
    matches!(
        opcode,
        OpCode::Br
            | OpCode::BrS
            | OpCode::Brtrue
            | OpCode::BrtrueS
            | OpCode::Brfalse
            | OpCode::BrfalseS
            | OpCode::Beq
            | OpCode::BeqS
            | OpCode::BneUn
            | OpCode::BneUnS
            | OpCode::Bge
            | OpCode::BgeS
            | OpCode::Bgt
            | OpCode::BgtS
            | OpCode::Ble
            | OpCode::BleS
            | OpCode::Blt
            | OpCode::BltS
    )
}

/// Instruction positions that need a label, plus the offset → position map
/// branches are resolved through.
#[derive(Debug, Default)]
pub struct LabelTable {
    positions: FxHashMap<u32, usize>,
    labels: FxHashMap<usize, String>,
}

/// A scan failure and the offset of the branch that caused it.
pub type ScanError = (u32, TranslateErrorKind);

impl LabelTable {
    /// Register a label for every branch target that is not the instruction
    /// right after its branch.
    pub fn scan(instructions: &[Instruction]) -> Result<Self, ScanError> {
        let positions: FxHashMap<u32, usize> = instructions
            .iter()
            .enumerate()
            .map(|(i, ins)| (ins.offset, i))
            .collect();
        let mut labels = FxHashMap::default();

        for (i, ins) in instructions.iter().enumerate() {
            if !is_branch(&ins.opcode) {
                continue;
            }
            let target = ins.branch_target().ok_or_else(|| {
                (
                    ins.offset,
                    TranslateErrorKind::MalformedOperand {
                        mnemonic: ins.opcode.mnemonic().to_string(),
                        expected: "a branch target",
                    },
                )
            })?;
            let Some(&target_index) = positions.get(&target) else {
                return Err((ins.offset, TranslateErrorKind::MalformedBranchTarget { target }));
            };
            if target_index != i + 1 {
                labels.insert(target_index, label_name(target));
            }
        }

        Ok(Self { positions, labels })
    }

    pub fn position_of(&self, offset: u32) -> Option<usize> {
        self.positions.get(&offset).copied()
    }

    pub fn label_at(&self, position: usize) -> Option<&str> {
        self.labels.get(&position).map(String::as_str)
    }

    /// Labelled positions in ascending order.
    pub fn labelled_positions(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = self.labels.keys().copied().collect();
        positions.sort_unstable();
        positions
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
