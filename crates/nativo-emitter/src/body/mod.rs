//! Body transpiler: one method's instruction stream → statement IR.
//!
//! A single linear pass simulates the evaluation stack. Loads, constants and
//! arithmetic only push [`Expr`] trees; nothing is emitted until a store,
//! call statement, branch or return consumes them. Branches become gotos onto
//! labels registered by a pre-scan ([`LabelTable::scan`]), so no control-flow
//! graph is built.
//!
//! The pass stops at the first `ret`. Values may not stay pending across a
//! label or a branch; such bodies are rejected rather than mistranslated. A
//! stream without a `ret` must end in an unconditional branch.

mod labels;
mod stack;

pub use labels::{LabelTable, is_branch};
pub use stack::EvalStack;

use nativo_common::{Location, TranslateError, TranslateErrorKind};
use nativo_metadata::{
    AssemblyGraph, FieldDef, Instruction, MethodDef, OpCode, Operand, TypeDef, TypeSig,
};
use tracing::trace;

use crate::ir::{BinaryOp, Callee, DeclType, Expr, Stmt};
use crate::names::{
    ARRAY_CLASS, OBJECT_TYPE, STRING_TYPE, field_name, local_name, method_name, parameter_name,
    resolve_type, size_of_target, type_name,
};
use crate::options::TranslateOptions;
use crate::roles::{MethodRole, classify_method};

const BOX_METHOD: &str = "Box";
const UNBOX_METHOD: &str = "Unbox";
const NEW_ARRAY_METHOD: &str = "NewArray";
const BYTE_POINTER: &str = "uint8_t*";

/// What the driver loop does after an instruction.
enum Flow {
    Next,
    /// The following `pop` was folded into this instruction.
    SkipNext,
    Return,
}

/// Translate the body of `method`, declared on `owner`, into statements.
///
/// The result starts with one declaration per local slot.
#[tracing::instrument(level = "debug", skip_all, fields(method = %method.name))]
pub fn transpile_method(
    graph: &AssemblyGraph,
    owner: &TypeDef,
    method: &MethodDef,
    options: &TranslateOptions,
) -> Result<Vec<Stmt>, TranslateError> {
    let owner_name = type_name(owner);
    BodyTranspiler {
        graph,
        owner_name: &owner_name,
        method,
        options,
        stack: EvalStack::new(),
        stmts: Vec::with_capacity(method.locals.len() + method.instructions().len()),
    }
    .run()
}

struct BodyTranspiler<'a> {
    graph: &'a AssemblyGraph,
    owner_name: &'a str,
    method: &'a MethodDef,
    options: &'a TranslateOptions,
    stack: EvalStack,
    stmts: Vec<Stmt>,
}

impl<'a> BodyTranspiler<'a> {
    fn run(mut self) -> Result<Vec<Stmt>, TranslateError> {
        let method = self.method;
        let instructions = method.instructions();
        let labels =
            LabelTable::scan(instructions).map_err(|(offset, kind)| self.error_at(offset, kind))?;

        for (slot, local) in method.locals.iter().enumerate() {
            self.stmts
                .push(Stmt::declare(resolve_type(local), local_name(slot as u32)));
        }

        let mut position = 0;
        let mut returned_at = None;
        while let Some(ins) = instructions.get(position) {
            if let Some(label) = labels.label_at(position) {
                if !self.stack.is_empty() {
                    let depth = self.stack.depth();
                    return Err(
                        self.error_at(ins.offset, TranslateErrorKind::PendingValuesAtJump { depth })
                    );
                }
                self.stmts.push(Stmt::Label(label.to_string()));
            }

            let next_discards = instructions
                .get(position + 1)
                .is_some_and(|next| next.opcode == OpCode::Pop)
                && labels.label_at(position + 1).is_none();

            trace!(
                offset = ins.offset,
                opcode = %ins.opcode,
                depth = self.stack.depth(),
                "instruction"
            );
            let flow = self
                .step(ins, position, &labels, next_discards)
                .map_err(|kind| self.error_at(ins.offset, kind))?;
            match flow {
                Flow::Next => position += 1,
                Flow::SkipNext => position += 2,
                Flow::Return => {
                    returned_at = Some(position);
                    break;
                }
            }
        }

        match returned_at {
            Some(stop) => {
                if let Some(&past) = labels.labelled_positions().iter().find(|&&p| p > stop) {
                    let target = instructions[past].offset;
                    return Err(self.error_at(
                        instructions[stop].offset,
                        TranslateErrorKind::BranchPastReturn { target },
                    ));
                }
            }
            None => self.check_fall_through(instructions)?,
        }

        Ok(self.stmts)
    }

    /// Without a `ret`, the stream may only end in an unconditional branch.
    fn check_fall_through(&self, instructions: &[Instruction]) -> Result<(), TranslateError> {
        let last = instructions.last();
        let pending = self.stack.depth();
        let ends_in_jump = last.is_some_and(|ins| matches!(ins.opcode, OpCode::Br | OpCode::BrS));
        if pending == 0 && ends_in_jump {
            return Ok(());
        }
        let kind = TranslateErrorKind::MissingReturn { pending };
        Err(match last {
            Some(ins) => self.error_at(ins.offset, kind),
            None => TranslateError::new(
                kind,
                Location::in_method(self.owner_name, self.method.name.as_str()),
            ),
        })
    }

    fn error_at(&self, offset: u32, kind: TranslateErrorKind) -> TranslateError {
        TranslateError::new(
            kind,
            Location::in_method(self.owner_name, self.method.name.as_str()).at_offset(offset),
        )
    }

    fn step(
        &mut self,
        ins: &'a Instruction,
        position: usize,
        labels: &LabelTable,
        next_discards: bool,
    ) -> Result<Flow, TranslateErrorKind> {
        let op = &ins.opcode;
        match op {
            OpCode::Nop => {}
            OpCode::Ldnull => self.stack.push(Expr::Int(0)),
            OpCode::LdcI4M1 => self.stack.push(Expr::Int(-1)),
            OpCode::LdcI4_0 => self.stack.push(Expr::Int(0)),
            OpCode::LdcI4_1 => self.stack.push(Expr::Int(1)),
            OpCode::LdcI4_2 => self.stack.push(Expr::Int(2)),
            OpCode::LdcI4_3 => self.stack.push(Expr::Int(3)),
            OpCode::LdcI4_4 => self.stack.push(Expr::Int(4)),
            OpCode::LdcI4_5 => self.stack.push(Expr::Int(5)),
            OpCode::LdcI4_6 => self.stack.push(Expr::Int(6)),
            OpCode::LdcI4_7 => self.stack.push(Expr::Int(7)),
            OpCode::LdcI4_8 => self.stack.push(Expr::Int(8)),
            OpCode::LdcI4S | OpCode::LdcI4 | OpCode::LdcI8 => {
                let value = int_operand(ins)?;
                self.stack.push(Expr::Int(value));
            }

            OpCode::Ldarg0 => self.load_argument(0)?,
            OpCode::Ldarg1 => self.load_argument(1)?,
            OpCode::Ldarg2 => self.load_argument(2)?,
            OpCode::Ldarg3 => self.load_argument(3)?,
            OpCode::LdargS | OpCode::Ldarg => self.load_argument(arg_operand(ins)?)?,
            OpCode::LdargaS | OpCode::Ldarga => {
                let arg = self.argument(arg_operand(ins)?)?;
                // The receiver already is an address.
                let address = match arg {
                    Expr::This => Expr::This,
                    other => Expr::address_of(other),
                };
                self.stack.push(address);
            }

            OpCode::Ldloc0 => self.load_local(0)?,
            OpCode::Ldloc1 => self.load_local(1)?,
            OpCode::Ldloc2 => self.load_local(2)?,
            OpCode::Ldloc3 => self.load_local(3)?,
            OpCode::LdlocS | OpCode::Ldloc => self.load_local(local_operand(ins)?)?,
            OpCode::LdlocaS | OpCode::Ldloca => {
                let slot = local_operand(ins)?;
                self.local_type(slot)?;
                self.stack.push(Expr::address_of(Expr::Ident(local_name(slot))));
            }
            OpCode::Stloc0 => self.store_local(0, op)?,
            OpCode::Stloc1 => self.store_local(1, op)?,
            OpCode::Stloc2 => self.store_local(2, op)?,
            OpCode::Stloc3 => self.store_local(3, op)?,
            OpCode::StlocS | OpCode::Stloc => self.store_local(local_operand(ins)?, op)?,

            OpCode::Ldstr => match &ins.operand {
                Some(Operand::String(text)) => self.stack.push(Expr::Str(text.clone())),
                _ => return Err(malformed(ins, "a string")),
            },

            OpCode::Ldsfld => {
                let (owner, field) = self.field(ins)?;
                self.stack.push(static_field(owner, field));
            }
            OpCode::Stsfld => {
                let (owner, field) = self.field(ins)?;
                let value = self.stack.pop(op)?;
                self.stmts.push(Stmt::assign(
                    static_field(owner, field),
                    coerce(&resolve_type(&field.field_type), value),
                ));
            }
            OpCode::Ldfld => {
                let (owner, field) = self.field(ins)?;
                let object = self.stack.pop(op)?;
                self.stack.push(instance_field(owner, field, object));
            }
            OpCode::Stfld => {
                let (owner, field) = self.field(ins)?;
                let value = self.stack.pop(op)?;
                let object = self.stack.pop(op)?;
                self.stmts.push(Stmt::assign(
                    instance_field(owner, field, object),
                    coerce(&resolve_type(&field.field_type), value),
                ));
            }

            OpCode::LdindI1
            | OpCode::LdindU1
            | OpCode::LdindI2
            | OpCode::LdindU2
            | OpCode::LdindI4
            | OpCode::LdindU4
            | OpCode::LdindI8
            | OpCode::LdindI
            | OpCode::LdindR4
            | OpCode::LdindR8
            | OpCode::LdindRef => {
                let addr = self.stack.pop(op)?;
                self.stack.push(Expr::Deref {
                    ty: indirect_type(op).to_string(),
                    addr: Box::new(addr),
                });
            }
            OpCode::StindI1
            | OpCode::StindI2
            | OpCode::StindI4
            | OpCode::StindI8
            | OpCode::StindI
            | OpCode::StindR4
            | OpCode::StindR8
            | OpCode::StindRef => {
                let ty = indirect_type(op);
                let value = self.stack.pop(op)?;
                let addr = self.stack.pop(op)?;
                self.stmts.push(Stmt::assign(
                    Expr::Deref {
                        ty: ty.to_string(),
                        addr: Box::new(addr),
                    },
                    coerce(ty, value),
                ));
            }

            OpCode::Add => self.binary(BinaryOp::Add, op)?,
            OpCode::Sub => self.binary(BinaryOp::Sub, op)?,
            OpCode::Mul => self.binary(BinaryOp::Mul, op)?,
            OpCode::Div => self.binary(BinaryOp::Div, op)?,
            OpCode::Rem => self.binary(BinaryOp::Rem, op)?,
            OpCode::And => self.binary(BinaryOp::And, op)?,
            OpCode::Or => self.binary(BinaryOp::Or, op)?,
            OpCode::Xor => self.binary(BinaryOp::Xor, op)?,
            OpCode::Shl => self.binary(BinaryOp::Shl, op)?,
            OpCode::Shr => self.binary(BinaryOp::Shr, op)?,
            OpCode::Ceq => self.binary(BinaryOp::Eq, op)?,
            OpCode::Cgt => self.binary(BinaryOp::Gt, op)?,
            OpCode::Clt => self.binary(BinaryOp::Lt, op)?,
            OpCode::CgtUn | OpCode::CltUn => {
                let rhs = self.stack.pop(op)?;
                let lhs = self.stack.pop(op)?;
                let cmp = if *op == OpCode::CgtUn {
                    BinaryOp::Gt
                } else {
                    BinaryOp::Lt
                };
                self.stack.push(Expr::binary(
                    cmp,
                    Expr::cast("uintptr_t", lhs),
                    Expr::cast("uintptr_t", rhs),
                ));
            }

            OpCode::ConvI1
            | OpCode::ConvI2
            | OpCode::ConvI4
            | OpCode::ConvI8
            | OpCode::ConvU1
            | OpCode::ConvU2
            | OpCode::ConvU4
            | OpCode::ConvU8
            | OpCode::ConvR4
            | OpCode::ConvR8
            | OpCode::ConvI
            | OpCode::ConvU => {
                let value = self.stack.pop(op)?;
                self.stack.push(Expr::cast(conversion_type(op), value));
            }

            OpCode::Box => {
                let ty = resolve_type(type_operand(ins)?);
                let value = self.stack.pop(op)?;
                let temp = format!("box_{}", ins.offset);
                self.stmts.push(Stmt::declare(ty.as_str(), temp.as_str()));
                self.stmts
                    .push(Stmt::assign(Expr::ident(temp.as_str()), coerce(&ty, value)));
                self.stack.push(Expr::static_call(
                    OBJECT_TYPE,
                    BOX_METHOD,
                    vec![
                        Expr::Int(0),
                        Expr::cast(BYTE_POINTER, Expr::address_of(Expr::Ident(temp))),
                        Expr::SizeOf(ty),
                    ],
                ));
            }
            OpCode::UnboxAny => {
                let ty = resolve_type(type_operand(ins)?);
                let object = self.stack.pop(op)?;
                let temp = format!("unbox_{}", ins.offset);
                self.stmts.push(Stmt::declare(ty.as_str(), temp.as_str()));
                self.stmts.push(Stmt::Expr(Expr::static_call(
                    OBJECT_TYPE,
                    UNBOX_METHOD,
                    vec![
                        coerce(&format!("{OBJECT_TYPE}*"), object),
                        Expr::cast(BYTE_POINTER, Expr::address_of(Expr::ident(temp.as_str()))),
                        Expr::SizeOf(ty),
                    ],
                )));
                self.stack.push(Expr::Ident(temp));
            }
            OpCode::Newarr => {
                let element = resolve_type(type_operand(ins)?);
                let count = self.stack.pop(op)?;
                self.stack.push(Expr::static_call(
                    ARRAY_CLASS,
                    NEW_ARRAY_METHOD,
                    vec![count, Expr::SizeOf(element)],
                ));
            }
            OpCode::Sizeof => {
                let sig = type_operand(ins)?;
                self.stack.push(Expr::SizeOf(size_of_target(sig)));
            }

            OpCode::Call | OpCode::Callvirt => return self.call(ins, next_discards),
            OpCode::Newobj => return self.new_object(ins, next_discards),

            OpCode::Dup => {
                let top = self.stack.peek(op)?.clone();
                if self.options.materialize_dup && top.has_side_effects() {
                    self.stack.pop(op)?;
                    let temp = format!("dup_{}", ins.offset);
                    self.stmts.push(Stmt::Declare {
                        ty: DeclType::Of(top.clone()),
                        name: temp.clone(),
                    });
                    self.stmts.push(Stmt::assign(Expr::ident(temp.as_str()), top));
                    self.stack.push(Expr::ident(temp.as_str()));
                    self.stack.push(Expr::Ident(temp));
                } else {
                    self.stack.push(top);
                }
            }
            OpCode::Pop => {
                let value = self.stack.pop(op)?;
                if value.has_side_effects() {
                    self.stmts.push(Stmt::Expr(value));
                }
            }

            OpCode::Ret => {
                self.ret(op)?;
                return Ok(Flow::Return);
            }

            OpCode::Br | OpCode::BrS => {
                self.require_empty_stack()?;
                if let Some(label) = self.jump_label(ins, position, labels)? {
                    self.stmts.push(Stmt::Goto(label));
                }
            }
            OpCode::Brtrue | OpCode::BrtrueS | OpCode::Brfalse | OpCode::BrfalseS => {
                let cond = self.stack.pop(op)?;
                let negate = matches!(op, OpCode::Brfalse | OpCode::BrfalseS);
                self.conditional_jump(ins, position, labels, cond, negate)?;
            }
            OpCode::Beq
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
            | OpCode::BltS => {
                let rhs = self.stack.pop(op)?;
                let lhs = self.stack.pop(op)?;
                let cond = Expr::binary(branch_comparison(op), lhs, rhs);
                self.conditional_jump(ins, position, labels, cond, false)?;
            }

            OpCode::Other(mnemonic) => {
                return Err(TranslateErrorKind::UnsupportedInstruction {
                    mnemonic: mnemonic.clone(),
                });
            }
        }
        Ok(Flow::Next)
    }

    fn argument(&self, slot: u32) -> Result<Expr, TranslateErrorKind> {
        let index = if self.method.is_static {
            slot as usize
        } else if slot == 0 {
            return Ok(Expr::This);
        } else {
            slot as usize - 1
        };
        let param = self
            .method
            .parameters
            .get(index)
            .ok_or(TranslateErrorKind::InvalidArgumentSlot { index: slot })?;
        Ok(Expr::Ident(parameter_name(param, index).into_owned()))
    }

    fn load_argument(&mut self, slot: u32) -> Result<(), TranslateErrorKind> {
        let arg = self.argument(slot)?;
        self.stack.push(arg);
        Ok(())
    }

    fn local_type(&self, slot: u32) -> Result<&'a TypeSig, TranslateErrorKind> {
        self.method
            .locals
            .get(slot as usize)
            .ok_or(TranslateErrorKind::InvalidLocalSlot { index: slot })
    }

    fn load_local(&mut self, slot: u32) -> Result<(), TranslateErrorKind> {
        self.local_type(slot)?;
        self.stack.push(Expr::Ident(local_name(slot)));
        Ok(())
    }

    fn store_local(&mut self, slot: u32, op: &OpCode) -> Result<(), TranslateErrorKind> {
        let ty = resolve_type(self.local_type(slot)?);
        let value = self.stack.pop(op)?;
        self.stmts
            .push(Stmt::assign(Expr::Ident(local_name(slot)), coerce(&ty, value)));
        Ok(())
    }

    fn field(&self, ins: &Instruction) -> Result<(&'a TypeDef, &'a FieldDef), TranslateErrorKind> {
        let Some(Operand::Field(field)) = &ins.operand else {
            return Err(malformed(ins, "a field reference"));
        };
        let graph: &'a AssemblyGraph = self.graph;
        graph
            .resolve_field(field)
            .ok_or_else(|| TranslateErrorKind::UnresolvedReference {
                reference: field.to_string(),
            })
    }

    fn binary(&mut self, op: BinaryOp, opcode: &OpCode) -> Result<(), TranslateErrorKind> {
        // The value pushed last is the right-hand operand.
        let rhs = self.stack.pop(opcode)?;
        let lhs = self.stack.pop(opcode)?;
        self.stack.push(Expr::binary(op, lhs, rhs));
        Ok(())
    }

    /// Pop one argument per parameter type and return them left to right.
    fn pop_arguments(
        &mut self,
        param_types: &[String],
        op: &OpCode,
    ) -> Result<Vec<Expr>, TranslateErrorKind> {
        let values = self.stack.pop_n(param_types.len(), op)?;
        Ok(values
            .into_iter()
            .zip(param_types)
            .map(|(value, ty)| {
                if ty.ends_with('*') {
                    coerce(ty, value)
                } else {
                    value
                }
            })
            .collect())
    }

    fn call(&mut self, ins: &Instruction, next_discards: bool) -> Result<Flow, TranslateErrorKind> {
        let op = &ins.opcode;
        let (owner, callee) = self.method_target(ins)?;
        let callee_owner = type_name(owner);
        let role = classify_method(&callee_owner, callee).map_err(|err| err.kind)?;

        let (param_types, returns_void) = match role {
            MethodRole::RuntimeImport(import) => (
                import
                    .parameters()
                    .iter()
                    .map(|(ty, _)| (*ty).to_string())
                    .collect::<Vec<_>>(),
                import.return_type() == "void",
            ),
            _ => (
                callee
                    .parameters
                    .iter()
                    .map(|p| resolve_type(&p.param_type))
                    .collect(),
                callee.return_type.is_void(),
            ),
        };
        let args = self.pop_arguments(&param_types, op)?;
        let receiver = if callee.is_static {
            None
        } else {
            Some(self.stack.pop(op)?)
        };

        if role == MethodRole::Constructor {
            // Chained constructor on an instance that already exists.
            trace!(callee = %callee_owner, "elided constructor call");
            return Ok(Flow::Next);
        }

        let method = method_name(callee).to_string();
        let call = match receiver {
            None => Expr::Call {
                callee: Callee::Static {
                    type_name: callee_owner,
                    method,
                },
                args,
            },
            Some(receiver) => Expr::Call {
                callee: Callee::Instance {
                    receiver: Box::new(typed_receiver(&callee_owner, receiver)),
                    method,
                },
                args,
            },
        };
        Ok(self.push_or_emit(call, returns_void, next_discards))
    }

    fn new_object(
        &mut self,
        ins: &Instruction,
        next_discards: bool,
    ) -> Result<Flow, TranslateErrorKind> {
        let (owner, ctor) = self.method_target(ins)?;
        let param_types: Vec<String> = ctor
            .parameters
            .iter()
            .map(|p| resolve_type(&p.param_type))
            .collect();
        let args = self.pop_arguments(&param_types, &ins.opcode)?;
        let value = Expr::New {
            type_name: type_name(owner),
            args,
        };
        Ok(self.push_or_emit(value, false, next_discards))
    }

    fn method_target(
        &self,
        ins: &Instruction,
    ) -> Result<(&'a TypeDef, &'a MethodDef), TranslateErrorKind> {
        let Some(Operand::Method(method)) = &ins.operand else {
            return Err(malformed(ins, "a method reference"));
        };
        let graph: &'a AssemblyGraph = self.graph;
        graph
            .resolve_method(method)
            .ok_or_else(|| TranslateErrorKind::UnresolvedReference {
                reference: method.to_string(),
            })
    }

    /// Void results and results dropped by the next `pop` become statements;
    /// anything else stays pending on the stack.
    fn push_or_emit(&mut self, value: Expr, returns_void: bool, next_discards: bool) -> Flow {
        if returns_void {
            self.stmts.push(Stmt::Expr(value));
            Flow::Next
        } else if next_discards {
            self.stmts.push(Stmt::Expr(value));
            Flow::SkipNext
        } else {
            self.stack.push(value);
            Flow::Next
        }
    }

    fn ret(&mut self, op: &OpCode) -> Result<(), TranslateErrorKind> {
        let stmt = match self.stack.depth() {
            0 => Stmt::Return(None),
            1 => {
                let value = self.stack.pop(op)?;
                if self.method.is_constructor() || self.method.return_type.is_void() {
                    if value.has_side_effects() {
                        self.stmts.push(Stmt::Expr(value));
                    }
                    Stmt::Return(None)
                } else {
                    let ty = resolve_type(&self.method.return_type);
                    Stmt::Return(Some(coerce(&ty, value)))
                }
            }
            depth => return Err(TranslateErrorKind::UnbalancedStack { depth }),
        };
        self.stmts.push(stmt);
        Ok(())
    }

    fn require_empty_stack(&self) -> Result<(), TranslateErrorKind> {
        if self.stack.is_empty() {
            Ok(())
        } else {
            Err(TranslateErrorKind::PendingValuesAtJump {
                depth: self.stack.depth(),
            })
        }
    }

    /// The label a branch jumps to, or `None` when the target is the next
    /// instruction and the jump can be dropped.
    fn jump_label(
        &self,
        ins: &Instruction,
        position: usize,
        labels: &LabelTable,
    ) -> Result<Option<String>, TranslateErrorKind> {
        let target = ins
            .branch_target()
            .ok_or_else(|| malformed(ins, "a branch target"))?;
        let target_position = labels
            .position_of(target)
            .ok_or(TranslateErrorKind::MalformedBranchTarget { target })?;
        if target_position == position + 1 {
            return Ok(None);
        }
        labels
            .label_at(target_position)
            .map(|label| Some(label.to_string()))
            .ok_or(TranslateErrorKind::MalformedBranchTarget { target })
    }

    fn conditional_jump(
        &mut self,
        ins: &Instruction,
        position: usize,
        labels: &LabelTable,
        cond: Expr,
        negate: bool,
    ) -> Result<(), TranslateErrorKind> {
        self.require_empty_stack()?;
        match self.jump_label(ins, position, labels)? {
            Some(label) => self.stmts.push(Stmt::IfGoto {
                cond,
                negate,
                label,
            }),
            None if cond.has_side_effects() => self.stmts.push(Stmt::Expr(cond)),
            None => {}
        }
        Ok(())
    }
}

fn malformed(ins: &Instruction, expected: &'static str) -> TranslateErrorKind {
    TranslateErrorKind::MalformedOperand {
        mnemonic: ins.opcode.mnemonic().to_string(),
        expected,
    }
}

fn int_operand(ins: &Instruction) -> Result<i64, TranslateErrorKind> {
    match ins.operand {
        Some(Operand::Int(value)) => Ok(value),
        _ => Err(malformed(ins, "an integer")),
    }
}

fn slot_operand(ins: &Instruction, expected: &'static str) -> Result<u32, TranslateErrorKind> {
    match ins.operand {
        Some(Operand::Local(slot) | Operand::Arg(slot)) => Ok(slot),
        Some(Operand::Int(value)) => u32::try_from(value).map_err(|_| malformed(ins, expected)),
        _ => Err(malformed(ins, expected)),
    }
}

fn arg_operand(ins: &Instruction) -> Result<u32, TranslateErrorKind> {
    slot_operand(ins, "an argument slot")
}

fn local_operand(ins: &Instruction) -> Result<u32, TranslateErrorKind> {
    slot_operand(ins, "a local slot")
}

fn type_operand(ins: &Instruction) -> Result<&TypeSig, TranslateErrorKind> {
    match &ins.operand {
        Some(Operand::Type(sig)) => Ok(sig),
        _ => Err(malformed(ins, "a type")),
    }
}

/// Cast `value` to `ty` unless it already has that type.
fn coerce(ty: &str, value: Expr) -> Expr {
    let already_typed = match &value {
        Expr::Cast { ty: cast, .. } => cast == ty,
        Expr::New { type_name, .. } => ty.strip_suffix('*') == Some(type_name.as_str()),
        Expr::Str(_) => ty.strip_suffix('*') == Some(STRING_TYPE),
        _ => false,
    };
    if already_typed {
        value
    } else {
        Expr::cast(ty, value)
    }
}

fn typed_receiver(owner_name: &str, object: Expr) -> Expr {
    match object {
        Expr::This => Expr::This,
        other => coerce(&format!("{owner_name}*"), other),
    }
}

fn static_field(owner: &TypeDef, field: &FieldDef) -> Expr {
    Expr::StaticRef {
        type_name: type_name(owner),
        member: field_name(&field.name).into_owned(),
    }
}

fn instance_field(owner: &TypeDef, field: &FieldDef, object: Expr) -> Expr {
    Expr::Field {
        object: Box::new(typed_receiver(&type_name(owner), object)),
        name: field_name(&field.name).into_owned(),
    }
}

fn indirect_type(op: &OpCode) -> &'static str {
    match op {
        OpCode::LdindI1 | OpCode::StindI1 => "int8_t",
        OpCode::LdindU1 => "uint8_t",
        OpCode::LdindI2 | OpCode::StindI2 => "int16_t",
        OpCode::LdindU2 => "uint16_t",
        OpCode::LdindI4 | OpCode::StindI4 => "int32_t",
        OpCode::LdindU4 => "uint32_t",
        OpCode::LdindI8 | OpCode::StindI8 => "int64_t",
        OpCode::LdindR4 | OpCode::StindR4 => "float",
        OpCode::LdindR8 | OpCode::StindR8 => "double",
        OpCode::LdindRef | OpCode::StindRef => "void*",
        _ => "intptr_t",
    }
}

fn conversion_type(op: &OpCode) -> &'static str {
    match op {
        OpCode::ConvI1 => "int8_t",
        OpCode::ConvI2 => "int16_t",
        OpCode::ConvI4 => "int32_t",
        OpCode::ConvI8 => "int64_t",
        OpCode::ConvU1 => "uint8_t",
        OpCode::ConvU2 => "uint16_t",
        OpCode::ConvU4 => "uint32_t",
        OpCode::ConvU8 => "uint64_t",
        OpCode::ConvR4 => "float",
        OpCode::ConvR8 => "double",
        OpCode::ConvU => "uintptr_t",
        _ => "intptr_t",
    }
}

fn branch_comparison(op: &OpCode) -> BinaryOp {
    match op {
        OpCode::Beq | OpCode::BeqS => BinaryOp::Eq,
        OpCode::BneUn | OpCode::BneUnS => BinaryOp::Ne,
        OpCode::Bge | OpCode::BgeS => BinaryOp::Ge,
        OpCode::Bgt | OpCode::BgtS => BinaryOp::Gt,
        OpCode::Ble | OpCode::BleS => BinaryOp::Le,
        _ => BinaryOp::Lt,
    }
}
