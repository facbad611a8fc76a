//! C++ rendering of the statement IR.

use std::fmt::Write as _;

use nativo_common::SourceWriter;

use crate::ir::{Callee, DeclType, Expr, Stmt};
use crate::names::STRING_TYPE;

pub struct CppPrinter<'w> {
    writer: &'w mut SourceWriter,
}

impl<'w> CppPrinter<'w> {
    pub fn new(writer: &'w mut SourceWriter) -> Self {
        Self { writer }
    }

    pub fn emit_statements(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.emit_statement(stmt);
        }
    }

    pub fn emit_statement(&mut self, stmt: &Stmt) {
        let text = render_statement(stmt);
        if matches!(stmt, Stmt::Label(_)) {
            // Labels sit one level left of the statements they mark.
            self.writer.decrease_indent();
            self.writer.line(&text);
            self.writer.increase_indent();
        } else {
            self.writer.line(&text);
        }
    }
}

pub fn render_statement(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Declare { ty, name } => match ty {
            DeclType::Named(ty) => format!("{ty} {name};"),
            DeclType::Of(expr) => format!("decltype({}) {name};", render_expr(expr)),
        },
        Stmt::Assign { target, value } => {
            format!("{} = {};", render_expr(target), render_expr(value))
        }
        Stmt::Expr(expr) => format!("{};", render_expr(expr)),
        // A label needs a statement after it even at the end of a body.
        Stmt::Label(label) => format!("{label}: ;"),
        Stmt::Goto(label) => format!("goto {label};"),
        Stmt::IfGoto {
            cond,
            negate,
            label,
        } => {
            let cond = match (negate, cond) {
                (false, Expr::Binary { .. }) => render_expr(cond),
                (false, _) => format!("({})", render_expr(cond)),
                (true, _) => format!("(!{})", render_grouped(cond)),
            };
            format!("if {cond} goto {label};")
        }
        Stmt::Return(None) => "return;".to_string(),
        Stmt::Return(Some(value)) => format!("return {};", render_expr(value)),
    }
}

pub fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Int(value) => render_int(*value),
        Expr::Ident(name) => name.clone(),
        Expr::This => "this".to_string(),
        Expr::AddressOf(inner) => format!("&{}", render_grouped(inner)),
        Expr::StaticRef { type_name, member } => format!("{type_name}::{member}"),
        Expr::Binary { op, lhs, rhs } => {
            format!("({} {} {})", render_expr(lhs), op.symbol(), render_expr(rhs))
        }
        Expr::Cast { ty, expr } => format!("({ty}){}", render_grouped(expr)),
        Expr::Deref { ty, addr } => format!("*({ty}*){}", render_parenthesized(addr)),
        Expr::Field { object, name } => format!("{}->{name}", render_grouped(object)),
        Expr::Call { callee, args } => {
            let args = render_args(args);
            match callee {
                Callee::Static { type_name, method } => format!("{type_name}::{method}({args})"),
                Callee::Instance { receiver, method } => {
                    format!("{}->{method}({args})", render_grouped(receiver))
                }
            }
        }
        Expr::New { type_name, args } => format!("new {type_name}({})", render_args(args)),
        Expr::SizeOf(ty) => format!("sizeof({ty})"),
        Expr::Str(text) => format!(
            "new {STRING_TYPE}((char*){}, {})",
            escape_string(text),
            text.len()
        ),
    }
}

fn render_args(args: &[Expr]) -> String {
    args.iter().map(render_expr).collect::<Vec<_>>().join(", ")
}

/// Render `expr` so it can stand as the operand of a unary or postfix
/// operator.
fn render_grouped(expr: &Expr) -> String {
    match expr {
        Expr::Ident(_)
        | Expr::This
        | Expr::StaticRef { .. }
        | Expr::Binary { .. }
        | Expr::Field { .. }
        | Expr::Call { .. }
        | Expr::SizeOf(_) => render_expr(expr),
        Expr::Int(value) if *value >= 0 => render_expr(expr),
        _ => format!("({})", render_expr(expr)),
    }
}

fn render_parenthesized(expr: &Expr) -> String {
    match expr {
        Expr::Binary { .. } => render_expr(expr),
        _ => format!("({})", render_expr(expr)),
    }
}

fn render_int(value: i64) -> String {
    if value == i64::MIN {
        // The literal 9223372036854775808 has no signed type.
        "(-9223372036854775807LL - 1)".to_string()
    } else if i32::try_from(value).is_ok() {
        value.to_string()
    } else {
        format!("{value}LL")
    }
}

/// A C++ narrow string literal for `text`, escaping byte-wise.
pub fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    let mut previous_was_hex = false;
    for byte in text.bytes() {
        let hex = match byte {
            b'"' => {
                out.push_str("\\\"");
                false
            }
            b'\\' => {
                out.push_str("\\\\");
                false
            }
            b'\n' => {
                out.push_str("\\n");
                false
            }
            b'\r' => {
                out.push_str("\\r");
                false
            }
            b'\t' => {
                out.push_str("\\t");
                false
            }
            0x20..=0x7e => {
                if previous_was_hex && byte.is_ascii_hexdigit() {
                    // Split the literal so the digit does not extend the escape.
                    out.push_str("\"\"");
                }
                out.push(byte as char);
                false
            }
            _ => {
                let _ = write!(out, "\\x{byte:02x}");
                true
            }
        };
        previous_was_hex = hex;
    }
    out.push('"');
    out
}
