//! Translation diagnostics.
//!
//! Every failure the translator can report while turning an assembly into
//! target source is a [`TranslateError`]: a [`TranslateErrorKind`] plus the
//! [`Location`] (declaring type, method, instruction offset) it occurred at.
//! There are no warnings and no recovery: the first error aborts the run.

use std::fmt;

/// Where in the assembly a translation error was detected.
///
/// `type_name` is the target (flattened) type name, so diagnostics read the
/// same way as the generated source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub type_name: String,
    pub method: Option<String>,
    pub offset: Option<u32>,
}

impl Location {
    pub fn in_type(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            method: None,
            offset: None,
        }
    }

    pub fn in_method(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            method: Some(method.into()),
            offset: None,
        }
    }

    #[must_use]
    pub fn at_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.type_name.is_empty() {
            write!(f, "<assembly>")?;
        } else {
            write!(f, "{}", self.type_name)?;
        }
        if let Some(method) = &self.method {
            write!(f, "::{method}")?;
        }
        if let Some(offset) = self.offset {
            write!(f, " at IL_{offset:04x}")?;
        }
        Ok(())
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateErrorKind {
    /// The opcode is outside the translatable instruction subset.
    UnsupportedInstruction { mnemonic: String },
    /// The instruction needs an operand of a different shape.
    MalformedOperand { mnemonic: String, expected: &'static str },
    /// An instruction popped more values than the evaluation stack held.
    StackUnderflow { mnemonic: String },
    /// More than one value was pending when the method returned.
    UnbalancedStack { depth: usize },
    /// Values were still pending on the evaluation stack where control flow
    /// joins or leaves (a label or a branch).
    PendingValuesAtJump { depth: usize },
    /// A branch targets an instruction after the first `ret`, which is never
    /// translated.
    BranchPastReturn { target: u32 },
    /// Control can run off the end of the instruction stream without
    /// reaching a `ret`.
    MissingReturn { pending: usize },
    /// A branch operand does not name the offset of any instruction.
    MalformedBranchTarget { target: u32 },
    /// `ldloc`/`stloc`/`ldloca` referenced a slot the method does not declare.
    InvalidLocalSlot { index: u32 },
    /// `ldarg`/`ldarga` referenced a slot the method does not declare.
    InvalidArgumentSlot { index: u32 },
    /// A field, method or type reference did not resolve in the assembly.
    UnresolvedReference { reference: String },
    /// A marker attribute is missing an argument or has one of the wrong shape.
    MalformedAttribute { attribute: String, expected: &'static str },
    /// Runtime-import ordinal with no fixed signature.
    UnknownRuntimeImport { ordinal: i64 },
    /// Runtime-import category the translator cannot bind (e.g. p/invoke).
    UnsupportedRuntimeImportCategory { category: String },
    /// A second method carries the entrypoint marker.
    DuplicateEntrypoint { first: String },
    /// No method carries the entrypoint marker.
    MissingEntrypoint,
    /// The entrypoint cannot be invoked from the process entry procedure.
    InvalidEntrypoint { reason: &'static str },
}

impl fmt::Display for TranslateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateErrorKind::UnsupportedInstruction { mnemonic } => {
                write!(f, "unsupported instruction '{mnemonic}'")
            }
            TranslateErrorKind::MalformedOperand { mnemonic, expected } => {
                write!(f, "instruction '{mnemonic}' expects {expected} operand")
            }
            TranslateErrorKind::StackUnderflow { mnemonic } => {
                write!(f, "evaluation stack underflow at '{mnemonic}'")
            }
            TranslateErrorKind::UnbalancedStack { depth } => {
                write!(
                    f,
                    "evaluation stack holds {depth} values at return (at most 1 allowed)"
                )
            }
            TranslateErrorKind::PendingValuesAtJump { depth } => {
                write!(
                    f,
                    "evaluation stack holds {depth} values across a jump (must be empty)"
                )
            }
            TranslateErrorKind::BranchPastReturn { target } => {
                write!(f, "branch target IL_{target:04x} follows the first return")
            }
            TranslateErrorKind::MissingReturn { pending: 0 } => {
                write!(f, "control falls off the end of the method without a return")
            }
            TranslateErrorKind::MissingReturn { pending } => {
                write!(
                    f,
                    "control falls off the end of the method with {pending} pending values"
                )
            }
            TranslateErrorKind::MalformedBranchTarget { target } => {
                write!(f, "branch target IL_{target:04x} is not an instruction offset")
            }
            TranslateErrorKind::InvalidLocalSlot { index } => {
                write!(f, "local slot {index} is not declared")
            }
            TranslateErrorKind::InvalidArgumentSlot { index } => {
                write!(f, "argument slot {index} is not declared")
            }
            TranslateErrorKind::UnresolvedReference { reference } => {
                write!(f, "cannot resolve '{reference}'")
            }
            TranslateErrorKind::MalformedAttribute {
                attribute,
                expected,
            } => {
                write!(f, "attribute '{attribute}' expects {expected}")
            }
            TranslateErrorKind::UnknownRuntimeImport { ordinal } => {
                write!(f, "unknown runtime-import ordinal {ordinal}")
            }
            TranslateErrorKind::UnsupportedRuntimeImportCategory { category } => {
                write!(f, "unsupported runtime-import category '{category}'")
            }
            TranslateErrorKind::DuplicateEntrypoint { first } => {
                write!(f, "duplicate entrypoint (already registered: {first})")
            }
            TranslateErrorKind::MissingEntrypoint => write!(f, "no entrypoint method found"),
            TranslateErrorKind::InvalidEntrypoint { reason } => {
                write!(f, "invalid entrypoint: {reason}")
            }
        }
    }
}

/// A located translation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateError {
    pub kind: TranslateErrorKind,
    pub location: Location,
}

impl TranslateError {
    pub fn new(kind: TranslateErrorKind, location: Location) -> Self {
        Self { kind, location }
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.kind)
    }
}

impl std::error::Error for TranslateError {}
