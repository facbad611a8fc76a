//! Name resolution: metadata identifiers → target identifiers and spellings.
//!
//! Everything here is a pure function of its arguments. Every reference type
//! (and every non-primitive value type) is represented as a pointer to its
//! flattened type, so `System.String` resolves to `System_String*`.

use std::borrow::Cow;

use nativo_metadata::model::STATIC_CONSTRUCTOR_NAME;
use nativo_metadata::signature::VOID;
use nativo_metadata::{MethodDef, ParamDef, TypeDef, TypeSig};

/// Target name of the synthesized static-initializer procedure.
pub const STATIC_INITIALIZER_NAME: &str = "__static_construct";

/// Target spelling for arrays of any element type.
pub const ARRAY_TYPE: &str = "System_Array*";

pub const OBJECT_TYPE: &str = "System_Object";
pub const STRING_TYPE: &str = "System_String";
pub const ARRAY_CLASS: &str = "System_Array";

/// Fixed-width scalar spellings, keyed by full metadata name.
const PRIMITIVES: &[(&str, &str)] = &[
    ("System.Boolean", "bool"),
    ("System.Char", "char"),
    ("System.SByte", "int8_t"),
    ("System.Byte", "uint8_t"),
    ("System.Int16", "int16_t"),
    ("System.UInt16", "uint16_t"),
    ("System.Int32", "int32_t"),
    ("System.UInt32", "uint32_t"),
    ("System.Int64", "int64_t"),
    ("System.UInt64", "uint64_t"),
    ("System.IntPtr", "intptr_t"),
    ("System.UIntPtr", "uintptr_t"),
    ("System.Single", "float"),
    ("System.Double", "double"),
    (VOID, "void"),
];

pub fn primitive_spelling(full_name: &str) -> Option<&'static str> {
    PRIMITIVES
        .iter()
        .find(|(name, _)| *name == full_name)
        .map(|(_, spelling)| *spelling)
}

/// Flatten a full type name into one identifier:
/// `System.Collections.List`1` → `System_Collections_List_1`.
pub fn target_type_name(full_name: &str) -> String {
    full_name
        .chars()
        .map(|c| match c {
            '.' | '/' | '+' | '`' | '<' | '>' => '_',
            c => c,
        })
        .collect()
}

pub fn type_name(ty: &TypeDef) -> String {
    target_type_name(&ty.full_name())
}

/// Flattened name of a signature, with a trailing `*` per pointer level.
pub fn target_sig_name(sig: &TypeSig) -> String {
    match sig {
        TypeSig::Named(name) => target_type_name(name),
        TypeSig::Pointer(inner) => format!("{}*", target_sig_name(inner)),
        TypeSig::Array(_) => ARRAY_TYPE.to_string(),
    }
}

/// Storage spelling of a signature as used for fields, locals, parameters,
/// return types and casts.
pub fn resolve_type(sig: &TypeSig) -> String {
    match sig {
        TypeSig::Named(name) => match primitive_spelling(name) {
            Some(spelling) => spelling.to_string(),
            None => format!("{}*", target_type_name(name)),
        },
        TypeSig::Pointer(inner) => match inner.as_ref() {
            TypeSig::Named(name) if name == VOID => "uint8_t*".to_string(),
            TypeSig::Named(name) => match primitive_spelling(name) {
                Some(spelling) => format!("{spelling}*"),
                None => format!("{}*", target_type_name(name)),
            },
            nested => format!("{}*", resolve_type(nested)),
        },
        TypeSig::Array(_) => ARRAY_TYPE.to_string(),
    }
}

/// Operand of a `sizeof` expression: the scalar spelling for primitives, the
/// aggregate itself (not its pointer) for other named types.
pub fn size_of_target(sig: &TypeSig) -> String {
    match sig {
        TypeSig::Named(name) => match primitive_spelling(name) {
            Some(spelling) if name != VOID => spelling.to_string(),
            _ => target_type_name(name),
        },
        other => resolve_type(other),
    }
}

/// `Type::member` access path for statics.
pub fn static_reference(declaring_type: &str, member: &str) -> String {
    format!("{}::{}", target_type_name(declaring_type), member)
}

/// Strip the decoration of compiler-generated backing fields:
/// `<Name>k__BackingField` → `Name`.
pub fn field_name(raw: &str) -> Cow<'_, str> {
    if let Some(rest) = raw.strip_prefix('<') {
        if let Some(end) = rest.find('>') {
            return Cow::Owned(rest[..end].to_string());
        }
    }
    Cow::Borrowed(raw)
}

/// Target name of a method. Static constructors become the synthesized
/// static-initializer procedure; everything else keeps its name.
pub fn method_name(method: &MethodDef) -> &str {
    if method.name == STATIC_CONSTRUCTOR_NAME {
        STATIC_INITIALIZER_NAME
    } else {
        &method.name
    }
}

pub fn parameter_name(param: &ParamDef, index: usize) -> Cow<'_, str> {
    if param.name.is_empty() {
        Cow::Owned(format!("arg{index}"))
    } else {
        Cow::Borrowed(&param.name)
    }
}

/// `T a, U b` parameter list for signatures.
pub fn parameter_list(method: &MethodDef) -> String {
    method
        .parameters
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} {}", resolve_type(&p.param_type), parameter_name(p, i)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn local_name(index: u32) -> String {
    format!("var_{index}")
}

pub fn label_name(offset: u32) -> String {
    format!("IL_{offset:04x}")
}
