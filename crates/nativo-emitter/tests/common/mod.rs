//! Test-only interpreter for translated method bodies.
//!
//! Executes the statement IR the body transpiler produces so tests can check
//! what a translated method computes rather than how it is spelled. Only the
//! subset the fixtures use is modelled: scalar locals and arguments, gotos,
//! boxing through `System_Object::Box`/`Unbox`, and opaque static calls that
//! are counted and return their invocation number.

#![allow(dead_code)]

use nativo_emitter::body::transpile_method;
use nativo_emitter::ir::{BinaryOp, Callee, DeclType, Expr, Stmt};
use nativo_emitter::TranslateOptions;
use nativo_metadata::AssemblyGraph;
use rustc_hash::FxHashMap;

const STEP_LIMIT: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    /// Address of a named variable.
    Addr(String),
    /// Handle into the interpreter heap.
    Object(usize),
}

impl Value {
    fn int(&self) -> i64 {
        match self {
            Value::Int(value) => *value,
            other => panic!("expected an integer, got {other:?}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Machine {
    vars: FxHashMap<String, Value>,
    types: FxHashMap<String, String>,
    heap: Vec<Vec<u8>>,
    /// Invocations per `Type::method` of opaque static calls.
    pub calls: FxHashMap<String, i64>,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: &str, ty: &str, value: Value) {
        self.types.insert(name.to_string(), ty.to_string());
        self.vars.insert(name.to_string(), value);
    }

    pub fn call_count(&self, qualified: &str) -> i64 {
        self.calls.get(qualified).copied().unwrap_or(0)
    }

    /// Run `stmts` to the first `return` and yield the returned value.
    pub fn run(&mut self, stmts: &[Stmt]) -> Option<Value> {
        let labels: FxHashMap<&str, usize> = stmts
            .iter()
            .enumerate()
            .filter_map(|(index, stmt)| match stmt {
                Stmt::Label(name) => Some((name.as_str(), index)),
                _ => None,
            })
            .collect();

        let mut pc = 0;
        for _ in 0..STEP_LIMIT {
            let Some(stmt) = stmts.get(pc) else {
                return None;
            };
            pc += 1;
            match stmt {
                Stmt::Declare { ty, name } => {
                    let ty = match ty {
                        DeclType::Named(ty) => ty.clone(),
                        DeclType::Of(_) => "int64_t".to_string(),
                    };
                    self.bind(name, &ty, Value::Int(0));
                }
                Stmt::Assign { target, value } => {
                    let value = self.eval(value);
                    self.store(target, value);
                }
                Stmt::Expr(expr) => {
                    self.eval(expr);
                }
                Stmt::Label(_) => {}
                Stmt::Goto(label) => pc = labels[label.as_str()],
                Stmt::IfGoto {
                    cond,
                    negate,
                    label,
                } => {
                    if (self.eval(cond).int() != 0) != *negate {
                        pc = labels[label.as_str()];
                    }
                }
                Stmt::Return(value) => return value.as_ref().map(|expr| self.eval(expr)),
            }
        }
        panic!("step limit exceeded");
    }

    fn store(&mut self, target: &Expr, value: Value) {
        let name = match target {
            Expr::Ident(name) => name.clone(),
            Expr::Deref { addr, .. } => match self.eval(addr) {
                Value::Addr(name) => name,
                other => panic!("store through non-address {other:?}"),
            },
            other => panic!("unsupported store target {other:?}"),
        };
        let value = match (&value, self.types.get(&name)) {
            (Value::Int(raw), Some(ty)) => Value::Int(truncate(ty, *raw)),
            _ => value,
        };
        self.vars.insert(name, value);
    }

    fn eval(&mut self, expr: &Expr) -> Value {
        match expr {
            Expr::Int(value) => Value::Int(*value),
            Expr::Ident(name) => self
                .vars
                .get(name)
                .cloned()
                .unwrap_or_else(|| panic!("read of undeclared '{name}'")),
            Expr::AddressOf(inner) => match inner.as_ref() {
                Expr::Ident(name) => Value::Addr(name.clone()),
                other => panic!("address of {other:?}"),
            },
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs).int();
                let rhs = self.eval(rhs).int();
                Value::Int(binary(*op, lhs, rhs))
            }
            Expr::Cast { ty, expr } => match self.eval(expr) {
                Value::Int(raw) if !ty.ends_with('*') => Value::Int(truncate(ty, raw)),
                other => other,
            },
            Expr::Deref { ty, addr } => match self.eval(addr) {
                Value::Addr(name) => Value::Int(truncate(ty, self.vars[&name].int())),
                other => panic!("deref of {other:?}"),
            },
            Expr::SizeOf(ty) => Value::Int(size_of(ty) as i64),
            Expr::Str(text) => {
                self.heap.push(text.as_bytes().to_vec());
                Value::Object(self.heap.len() - 1)
            }
            Expr::Call {
                callee: Callee::Static { type_name, method },
                args,
            } => {
                let args: Vec<Value> = args.iter().map(|arg| self.eval(arg)).collect();
                self.static_call(type_name, method, args)
            }
            other => panic!("unsupported expression {other:?}"),
        }
    }

    fn static_call(&mut self, type_name: &str, method: &str, args: Vec<Value>) -> Value {
        match (type_name, method, args.as_slice()) {
            ("System_Object", "Box", [_, Value::Addr(source), Value::Int(len)]) => {
                let raw = self.vars[source].int();
                self.heap
                    .push(raw.to_le_bytes()[..*len as usize].to_vec());
                Value::Object(self.heap.len() - 1)
            }
            ("System_Object", "Unbox", [Value::Object(id), Value::Addr(dest), Value::Int(len)]) => {
                let mut bytes = [0u8; 8];
                bytes[..*len as usize].copy_from_slice(&self.heap[*id][..*len as usize]);
                let raw = i64::from_le_bytes(bytes);
                let ty = self.types[dest].clone();
                self.vars.insert(dest.clone(), Value::Int(truncate(&ty, raw)));
                Value::Int(0)
            }
            _ => {
                let count = self
                    .calls
                    .entry(format!("{type_name}::{method}"))
                    .or_insert(0);
                *count += 1;
                Value::Int(*count)
            }
        }
    }
}

fn binary(op: BinaryOp, lhs: i64, rhs: i64) -> i64 {
    match op {
        BinaryOp::Add => lhs.wrapping_add(rhs),
        BinaryOp::Sub => lhs.wrapping_sub(rhs),
        BinaryOp::Mul => lhs.wrapping_mul(rhs),
        BinaryOp::Div => lhs / rhs,
        BinaryOp::Rem => lhs % rhs,
        BinaryOp::And => lhs & rhs,
        BinaryOp::Or => lhs | rhs,
        BinaryOp::Xor => lhs ^ rhs,
        BinaryOp::Shl => lhs << rhs,
        BinaryOp::Shr => lhs >> rhs,
        BinaryOp::Eq => i64::from(lhs == rhs),
        BinaryOp::Ne => i64::from(lhs != rhs),
        BinaryOp::Gt => i64::from(lhs > rhs),
        BinaryOp::Ge => i64::from(lhs >= rhs),
        BinaryOp::Lt => i64::from(lhs < rhs),
        BinaryOp::Le => i64::from(lhs <= rhs),
    }
}

/// Reinterpret `raw` at the width of the scalar type `ty`.
fn truncate(ty: &str, raw: i64) -> i64 {
    match ty {
        "bool" => i64::from(raw != 0),
        "int8_t" | "char" => i64::from(raw as i8),
        "uint8_t" => i64::from(raw as u8),
        "int16_t" => i64::from(raw as i16),
        "uint16_t" => i64::from(raw as u16),
        "int32_t" => i64::from(raw as i32),
        "uint32_t" => i64::from(raw as u32),
        _ => raw,
    }
}

fn size_of(ty: &str) -> usize {
    match ty {
        "bool" | "char" | "int8_t" | "uint8_t" => 1,
        "int16_t" | "uint16_t" => 2,
        "int32_t" | "uint32_t" | "float" => 4,
        _ => 8,
    }
}

/// Translate `Type::method` from `graph` and run it with `args` bound to its
/// parameters (static methods only).
pub fn run_method(
    graph: &AssemblyGraph,
    type_name: &str,
    method: &str,
    options: &TranslateOptions,
    args: &[i64],
) -> (Option<Value>, Machine) {
    let ty = graph.find_type(type_name).expect("type exists");
    let def = ty
        .methods
        .iter()
        .find(|m| m.name == method)
        .expect("method exists");
    let stmts = transpile_method(graph, ty, def, options).expect("method translates");

    let mut machine = Machine::new();
    for ((index, param), value) in def.parameters.iter().enumerate().zip(args) {
        let name = nativo_emitter::names::parameter_name(param, index);
        let ty = nativo_emitter::names::resolve_type(&param.param_type);
        machine.bind(&name, &ty, Value::Int(*value));
    }
    let result = machine.run(&stmts);
    (result, machine)
}
