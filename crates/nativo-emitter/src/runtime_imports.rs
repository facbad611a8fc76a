//! The fixed runtime-import table.
//!
//! A runtime import is a bodyless method whose implementation is supplied by
//! the translator. The marker attribute carries a category and an ordinal; the
//! ordinal selects a fixed signature and a fixed body, independent of what the
//! metadata declares. Changing the runtime ABI means changing this table.

use nativo_metadata::model::AttributeArgument;

/// Simple name of the marker attribute.
pub const RUNTIME_IMPORT_ATTRIBUTE: &str = "RuntimeImportAttribute";

/// Category value (numeric form) for builtins supplied by the translator.
pub const INTERNAL_CATEGORY: i64 = 1;
/// Category value (numeric form) for platform p/invoke.
pub const PINVOKE_CATEGORY: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeImport {
    WriteLine,
    Write,
    Allocate,
    Reallocate,
    Free,
    IdentityCast,
    ObjectHeaderInit,
    Concat2,
    Concat3,
}

/// Category as written in the marker attribute, numeric or symbolic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportCategory {
    Internal,
    Other(String),
}

impl ImportCategory {
    pub fn from_argument(arg: &AttributeArgument) -> Self {
        match arg {
            AttributeArgument::Int(INTERNAL_CATEGORY) => ImportCategory::Internal,
            AttributeArgument::Int(PINVOKE_CATEGORY) => ImportCategory::Other("pinvoke".into()),
            AttributeArgument::Int(other) => ImportCategory::Other(other.to_string()),
            AttributeArgument::String(s)
                if s.eq_ignore_ascii_case("internal")
                    || s.eq_ignore_ascii_case("internalruntime") =>
            {
                ImportCategory::Internal
            }
            AttributeArgument::String(s) => ImportCategory::Other(s.clone()),
            AttributeArgument::Bool(b) => ImportCategory::Other(b.to_string()),
        }
    }
}

impl RuntimeImport {
    pub const ALL: [RuntimeImport; 9] = [
        RuntimeImport::WriteLine,
        RuntimeImport::Write,
        RuntimeImport::Allocate,
        RuntimeImport::Reallocate,
        RuntimeImport::Free,
        RuntimeImport::IdentityCast,
        RuntimeImport::ObjectHeaderInit,
        RuntimeImport::Concat2,
        RuntimeImport::Concat3,
    ];

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|import| import.ordinal() == ordinal)
    }

    pub const fn ordinal(self) -> i64 {
        match self {
            RuntimeImport::WriteLine => 0,
            RuntimeImport::Write => 1,
            RuntimeImport::Allocate => 2,
            RuntimeImport::Reallocate => 3,
            RuntimeImport::Free => 4,
            RuntimeImport::IdentityCast => 5,
            RuntimeImport::ObjectHeaderInit => 100,
            RuntimeImport::Concat2 => 200,
            RuntimeImport::Concat3 => 201,
        }
    }

    pub const fn return_type(self) -> &'static str {
        match self {
            RuntimeImport::WriteLine
            | RuntimeImport::Write
            | RuntimeImport::Free
            | RuntimeImport::ObjectHeaderInit => "void",
            RuntimeImport::Allocate | RuntimeImport::Reallocate | RuntimeImport::IdentityCast => {
                "void*"
            }
            RuntimeImport::Concat2 | RuntimeImport::Concat3 => "System_String*",
        }
    }

    /// `(type, name)` pairs of the fixed parameter list.
    pub const fn parameters(self) -> &'static [(&'static str, &'static str)] {
        match self {
            RuntimeImport::WriteLine | RuntimeImport::Write => &[("System_String*", "str")],
            RuntimeImport::Allocate => &[("int32_t", "size")],
            RuntimeImport::Reallocate => &[("void*", "addr"), ("int32_t", "size")],
            RuntimeImport::Free => &[("void*", "addr")],
            RuntimeImport::IdentityCast | RuntimeImport::ObjectHeaderInit => {
                &[("System_Object*", "obj")]
            }
            RuntimeImport::Concat2 => &[("System_String*", "a"), ("System_String*", "b")],
            RuntimeImport::Concat3 => &[
                ("System_String*", "a"),
                ("System_String*", "b"),
                ("System_String*", "c"),
            ],
        }
    }

    pub fn parameter_list(self) -> String {
        self.parameters()
            .iter()
            .map(|(ty, name)| format!("{ty} {name}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// In-class declaration: `static void WriteLine(System_String* str);`.
    pub fn declaration(self, method_name: &str) -> String {
        format!(
            "static {} {}({});",
            self.return_type(),
            method_name,
            self.parameter_list()
        )
    }

    /// Statement lines of the fixed body.
    pub fn body(self) -> Vec<&'static str> {
        match self {
            RuntimeImport::WriteLine => vec!["fputs(str->data, stdout);", "fputc('\\n', stdout);"],
            RuntimeImport::Write => vec!["fputs(str->data, stdout);"],
            RuntimeImport::Allocate => vec!["return malloc(size);"],
            RuntimeImport::Reallocate => vec!["return realloc(addr, size);"],
            RuntimeImport::Free => vec!["free(addr);"],
            RuntimeImport::IdentityCast => vec!["return (void*)obj;"],
            RuntimeImport::ObjectHeaderInit => vec![
                "obj->m_ObjectTable = new System_ObjectTable();",
                "obj->m_ObjectTable->MethodTable = 0;",
                "obj->m_ObjectTable->AssociatedObject = 0;",
                "obj->m_ObjectTable->GCReferences = 0;",
            ],
            RuntimeImport::Concat2 => vec![
                "int32_t len = a->length + b->length;",
                "char* buf = (char*)malloc(len + 1);",
                "memcpy(buf, a->data, a->length);",
                "memcpy(buf + a->length, b->data, b->length);",
                "buf[len] = 0;",
                "return new System_String(buf, len);",
            ],
            RuntimeImport::Concat3 => vec![
                "int32_t len = a->length + b->length + c->length;",
                "char* buf = (char*)malloc(len + 1);",
                "memcpy(buf, a->data, a->length);",
                "memcpy(buf + a->length, b->data, b->length);",
                "memcpy(buf + a->length + b->length, c->data, c->length);",
                "buf[len] = 0;",
                "return new System_String(buf, len);",
            ],
        }
    }
}
