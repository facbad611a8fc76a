//! Per-type definition fragments.
//!
//! A fragment depends only on the assembly graph and its own type, so the
//! assembler can build all fragments concurrently.

use nativo_common::{SourceWriter, TranslateError};
use nativo_metadata::{AssemblyGraph, MethodDef, TypeDef};
use tracing::debug;

use crate::body::transpile_method;
use crate::ir_printer::CppPrinter;
use crate::names::{
    STATIC_INITIALIZER_NAME, field_name, method_name, parameter_list, resolve_type, static_reference,
    type_name,
};
use crate::options::TranslateOptions;
use crate::roles::{MethodRole, classify_method};
use crate::runtime_imports::RuntimeImport;

/// Static field storage, runtime-import bodies and translated method bodies
/// of `ty`.
pub fn emit_type_definitions(
    graph: &AssemblyGraph,
    ty: &TypeDef,
    options: &TranslateOptions,
) -> Result<String, TranslateError> {
    let name = type_name(ty);
    let mut writer = SourceWriter::new();

    let mut has_statics = false;
    for field in ty.fields.iter().filter(|f| f.is_static) {
        writer.line(&format!(
            "{} {};",
            resolve_type(&field.field_type),
            static_reference(&ty.full_name(), &field_name(&field.name))
        ));
        has_statics = true;
    }
    if has_statics {
        writer.write_line();
    }

    let mut defined = 0usize;
    for method in &ty.methods {
        match classify_method(&name, method)? {
            MethodRole::RuntimeImport(import) => {
                emit_runtime_import(&mut writer, &name, method, import);
            }
            role => {
                if method.body.is_none() {
                    continue;
                }
                let stmts = transpile_method(graph, ty, method, options)?;
                writer.line(&signature(&name, method, role));
                writer.increase_indent();
                CppPrinter::new(&mut writer).emit_statements(&stmts);
                writer.decrease_indent();
                writer.line("}");
                writer.write_line();
            }
        }
        defined += 1;
    }

    debug!(ty = %name, methods = defined, "defined type");
    Ok(writer.finish())
}

/// Out-of-class function head, up to and including the opening brace.
fn signature(owner: &str, method: &MethodDef, role: MethodRole) -> String {
    match role {
        MethodRole::Constructor => {
            format!("{owner}::{owner}({}) {{", parameter_list(method))
        }
        MethodRole::StaticConstructor => format!("void {owner}::{STATIC_INITIALIZER_NAME}() {{"),
        _ => format!(
            "{} {owner}::{}({}) {{",
            resolve_type(&method.return_type),
            method_name(method),
            parameter_list(method)
        ),
    }
}

fn emit_runtime_import(
    writer: &mut SourceWriter,
    owner: &str,
    method: &MethodDef,
    import: RuntimeImport,
) {
    writer.line(&format!(
        "{} {owner}::{}({}) {{",
        import.return_type(),
        method_name(method),
        import.parameter_list()
    ));
    writer.increase_indent();
    for line in import.body() {
        writer.line(line);
    }
    writer.decrease_indent();
    writer.line("}");
    writer.write_line();
}
