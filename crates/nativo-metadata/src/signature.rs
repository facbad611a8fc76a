//! Type signatures as they appear on fields, parameters, locals and operands.
//!
//! Signatures are written as the full type name with optional suffixes:
//! `*` for an unmanaged pointer, `[]` for a single-dimensional array.
//! Suffixes nest left to right, so `System.Int32*[]` is an array of
//! pointers to `System.Int32`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const VOID: &str = "System.Void";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeSig {
    /// A type named by its full name (`Namespace.Name`, `Outer/Inner`).
    Named(String),
    /// `T*`
    Pointer(Box<TypeSig>),
    /// `T[]`
    Array(Box<TypeSig>),
}

impl TypeSig {
    pub fn named(full_name: impl Into<String>) -> Self {
        TypeSig::Named(full_name.into())
    }

    pub fn void() -> Self {
        TypeSig::Named(VOID.to_string())
    }

    pub fn pointer_to(self) -> Self {
        TypeSig::Pointer(Box::new(self))
    }

    pub fn array_of(self) -> Self {
        TypeSig::Array(Box::new(self))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeSig::Named(name) if name == VOID)
    }

    /// The innermost named type (`System.Int32` for `System.Int32*[]`).
    pub fn element_name(&self) -> &str {
        match self {
            TypeSig::Named(name) => name,
            TypeSig::Pointer(inner) | TypeSig::Array(inner) => inner.element_name(),
        }
    }
}

impl Default for TypeSig {
    fn default() -> Self {
        TypeSig::void()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureError {
    pub text: String,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed type signature '{}'", self.text)
    }
}

impl std::error::Error for SignatureError {}

impl FromStr for TypeSig {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if let Some(inner) = text.strip_suffix("[]") {
            return Ok(inner.parse::<TypeSig>()?.array_of());
        }
        if let Some(inner) = text.strip_suffix('*') {
            return Ok(inner.parse::<TypeSig>()?.pointer_to());
        }
        let valid = !text.is_empty()
            && text
                .chars()
                .all(|c| !c.is_whitespace() && !matches!(c, '*' | '[' | ']'));
        if !valid {
            return Err(SignatureError {
                text: s.to_string(),
            });
        }
        Ok(TypeSig::Named(text.to_string()))
    }
}

impl TryFrom<String> for TypeSig {
    type Error = SignatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeSig> for String {
    fn from(value: TypeSig) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TypeSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSig::Named(name) => write!(f, "{name}"),
            TypeSig::Pointer(inner) => write!(f, "{inner}*"),
            TypeSig::Array(inner) => write!(f, "{inner}[]"),
        }
    }
}
