//! Declaration pass.
//!
//! Runs sequentially over the types in global declaration order and writes
//! the header: forward declarations first, then one full class or struct
//! declaration per type. Types that are named somewhere but not translated
//! (attribute types, references outside the assembly) still get a forward
//! declaration, since they resolve to `T*` like every other class. While walking the methods it collects the static
//! initializers and the entrypoint into a [`Registry`], which is returned to
//! the assembler instead of living in shared state.

use nativo_common::{Location, SourceWriter, TranslateError, TranslateErrorKind};
use nativo_metadata::graph::ROOT_REFERENCE_TYPE;
use nativo_metadata::{AssemblyGraph, MethodDef, OpCode, Operand, TypeDef, TypeSig};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::names::{
    STATIC_INITIALIZER_NAME, field_name, method_name, parameter_list, primitive_spelling,
    resolve_type, target_type_name, type_name,
};
use crate::roles::{MethodRole, classify_method, is_entrypoint};

/// The method the process entry procedure invokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrypoint {
    /// Target name of the declaring type.
    pub type_name: String,
    pub method: String,
    pub returns_void: bool,
}

impl Entrypoint {
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.type_name, self.method)
    }
}

/// Bootstrap inputs discovered by the declaration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    /// Target names of types with a static initializer, in registration order.
    pub static_initializers: Vec<String>,
    pub entrypoint: Option<Entrypoint>,
}

impl Registry {
    /// `Type::__static_construct` call paths, in registration order.
    pub fn static_initializer_calls(&self) -> impl Iterator<Item = String> + '_ {
        self.static_initializers
            .iter()
            .map(|ty| format!("{ty}::{STATIC_INITIALIZER_NAME}"))
    }
}

/// Header text plus the registry.
#[derive(Debug, Clone)]
pub struct Declarations {
    pub header: String,
    pub registry: Registry,
}

/// Base type named in the class head, if any. Value types and types whose
/// base is not declared get none.
pub fn base_clause(
    graph: &AssemblyGraph,
    selected: &FxHashSet<String>,
    ty: &TypeDef,
) -> Option<String> {
    if graph.is_value_type(ty) {
        return None;
    }
    ty.base
        .as_deref()
        .filter(|base| selected.contains(*base))
        .map(target_type_name)
}

const STRING_FULL_NAME: &str = "System.String";
const ARRAY_FULL_NAME: &str = "System.Array";

/// Full names of the non-primitive types that `types` name in a field,
/// parameter, return, local or instruction operand but that are not in
/// `declared`, in first-use order.
pub fn referenced_types(types: &[&TypeDef], declared: &FxHashSet<String>) -> Vec<String> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut found = Vec::new();
    let mut note = |full_name: &str| {
        if primitive_spelling(full_name).is_none()
            && !declared.contains(full_name)
            && seen.insert(full_name.to_string())
        {
            found.push(full_name.to_string());
        }
    };

    for ty in types {
        for field in &ty.fields {
            visit_signature(&field.field_type, &mut note);
        }
        for method in &ty.methods {
            visit_signature(&method.return_type, &mut note);
            for param in &method.parameters {
                visit_signature(&param.param_type, &mut note);
            }
            for local in &method.locals {
                visit_signature(local, &mut note);
            }
            for ins in method.instructions() {
                match &ins.operand {
                    Some(Operand::Type(sig)) => visit_signature(sig, &mut note),
                    Some(Operand::Field(field)) => note(field.declaring_type.as_str()),
                    Some(Operand::Method(callee)) => note(callee.declaring_type.as_str()),
                    _ => {}
                }
                // Helpers the body pass calls on its own.
                match ins.opcode {
                    OpCode::Box | OpCode::UnboxAny => note(ROOT_REFERENCE_TYPE),
                    OpCode::Ldstr => note(STRING_FULL_NAME),
                    OpCode::Newarr => note(ARRAY_FULL_NAME),
                    _ => {}
                }
            }
        }
    }
    found
}

fn visit_signature(sig: &TypeSig, note: &mut impl FnMut(&str)) {
    match sig {
        TypeSig::Named(name) => note(name),
        TypeSig::Pointer(inner) => visit_signature(inner, note),
        TypeSig::Array(_) => note(ARRAY_FULL_NAME),
    }
}

pub struct DeclarationEmitter<'a> {
    graph: &'a AssemblyGraph,
    /// Full names of every type that gets declared.
    selected: FxHashSet<String>,
    writer: SourceWriter,
    registry: Registry,
}

impl<'a> DeclarationEmitter<'a> {
    pub fn new(graph: &'a AssemblyGraph, types: &[&TypeDef]) -> Self {
        Self {
            graph,
            selected: types.iter().map(|ty| ty.full_name()).collect(),
            writer: SourceWriter::with_capacity(types.len() * 256),
            registry: Registry::default(),
        }
    }

    /// Emit the whole header for `types`, which must already be in global
    /// declaration order.
    #[tracing::instrument(level = "debug", skip_all, fields(types = types.len()))]
    pub fn emit(mut self, types: &[&TypeDef]) -> Result<Declarations, TranslateError> {
        self.emit_preamble();

        let external = referenced_types(types, &self.selected);
        if !external.is_empty() {
            debug!(count = external.len(), "forward-declaring untranslated types");
            for full_name in &external {
                let value_type = self
                    .graph
                    .find_type(full_name)
                    .is_some_and(|ty| self.graph.is_value_type(ty));
                let keyword = if value_type { "struct" } else { "class" };
                self.writer
                    .line(&format!("{keyword} {};", target_type_name(full_name)));
            }
            self.writer.write_line();
        }

        for ty in types {
            let keyword = if self.graph.is_value_type(ty) {
                "struct"
            } else {
                "class"
            };
            self.writer.line(&format!("{keyword} {};", type_name(ty)));
        }
        self.writer.write_line();

        for ty in types {
            self.emit_type(ty)?;
        }

        Ok(Declarations {
            header: self.writer.finish(),
            registry: self.registry,
        })
    }

    fn emit_preamble(&mut self) {
        self.writer.line("#pragma once");
        self.writer.write_line();
        for header in ["stdint.h", "stdio.h", "stdlib.h", "string.h"] {
            self.writer.line(&format!("#include <{header}>"));
        }
        self.writer.write_line();
    }

    fn emit_type(&mut self, ty: &TypeDef) -> Result<(), TranslateError> {
        let name = type_name(ty);
        debug!(ty = %name, fields = ty.fields.len(), methods = ty.methods.len(), "declare type");

        if self.graph.is_value_type(ty) {
            self.writer.line(&format!("struct {name} {{"));
        } else {
            match base_clause(self.graph, &self.selected, ty) {
                Some(base) => self.writer.line(&format!("class {name} : public {base} {{")),
                None => self.writer.line(&format!("class {name} {{")),
            }
            self.writer.line("public:");
        }
        self.writer.increase_indent();

        for field in &ty.fields {
            let storage = if field.is_static { "static " } else { "" };
            self.writer.line(&format!(
                "{storage}{} {};",
                resolve_type(&field.field_type),
                field_name(&field.name)
            ));
        }

        for method in &ty.methods {
            self.emit_method(&name, method)?;
        }

        self.writer.decrease_indent();
        self.writer.line("};");
        self.writer.write_line();
        Ok(())
    }

    fn emit_method(&mut self, owner: &str, method: &MethodDef) -> Result<(), TranslateError> {
        let role = classify_method(owner, method)?;
        if is_entrypoint(method) {
            self.register_entrypoint(owner, method)?;
        }

        let declaration = match role {
            MethodRole::Constructor => format!("{owner}({});", parameter_list(method)),
            MethodRole::StaticConstructor => {
                self.registry.static_initializers.push(owner.to_string());
                format!("static void {STATIC_INITIALIZER_NAME}();")
            }
            MethodRole::RuntimeImport(import) => import.declaration(method_name(method)),
            MethodRole::Regular => format!(
                "{}{} {}({});",
                if method.is_static { "static " } else { "" },
                resolve_type(&method.return_type),
                method_name(method),
                parameter_list(method)
            ),
        };
        self.writer.line(&declaration);
        Ok(())
    }

    fn register_entrypoint(&mut self, owner: &str, method: &MethodDef) -> Result<(), TranslateError> {
        let location = || Location::in_method(owner, method.name.as_str());
        if let Some(first) = &self.registry.entrypoint {
            return Err(TranslateError::new(
                TranslateErrorKind::DuplicateEntrypoint {
                    first: first.qualified_name(),
                },
                location(),
            ));
        }
        if !method.is_static {
            return Err(TranslateError::new(
                TranslateErrorKind::InvalidEntrypoint {
                    reason: "entrypoint must be static",
                },
                location(),
            ));
        }
        if !method.parameters.is_empty() {
            return Err(TranslateError::new(
                TranslateErrorKind::InvalidEntrypoint {
                    reason: "entrypoint must not take parameters",
                },
                location(),
            ));
        }
        debug!(entrypoint = %format!("{owner}::{}", method.name), "registered entrypoint");
        self.registry.entrypoint = Some(Entrypoint {
            type_name: owner.to_string(),
            method: method_name(method).to_string(),
            returns_void: method.return_type.is_void(),
        });
        Ok(())
    }
}
