//! Types, fields, methods and custom attributes.

use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;
use crate::signature::TypeSig;

pub const CONSTRUCTOR_NAME: &str = ".ctor";
pub const STATIC_CONSTRUCTOR_NAME: &str = ".cctor";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    /// Full name of the base type; `None` for the root reference type and
    /// interfaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
}

impl TypeDef {
    /// `Namespace.Name`, or just `Name` for types without a namespace.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: TypeSig,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDef {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: TypeSig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeArgument {
    Int(i64),
    Bool(bool),
    String(String),
}

impl AttributeArgument {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeArgument::Int(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAttribute {
    /// Full or simple name of the attribute type.
    #[serde(rename = "type")]
    pub attribute_type: String,
    #[serde(default)]
    pub arguments: Vec<AttributeArgument>,
}

impl CustomAttribute {
    /// Compare by simple name so `System.EntrypointAttribute` and
    /// `EntrypointAttribute` both match `"EntrypointAttribute"`.
    pub fn is(&self, simple_name: &str) -> bool {
        let simple = self
            .attribute_type
            .rsplit(['.', '/'])
            .next()
            .unwrap_or(&self.attribute_type);
        simple == simple_name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub return_type: TypeSig,
    #[serde(default)]
    pub parameters: Vec<ParamDef>,
    #[serde(default)]
    pub locals: Vec<TypeSig>,
    #[serde(default)]
    pub attributes: Vec<CustomAttribute>,
    /// `None` for bodyless (abstract / extern) methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<Instruction>>,
}

impl MethodDef {
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    pub fn is_static_constructor(&self) -> bool {
        self.name == STATIC_CONSTRUCTOR_NAME
    }

    pub fn attribute(&self, simple_name: &str) -> Option<&CustomAttribute> {
        self.attributes.iter().find(|attr| attr.is(simple_name))
    }

    pub fn has_attribute(&self, simple_name: &str) -> bool {
        self.attribute(simple_name).is_some()
    }

    pub fn instructions(&self) -> &[Instruction] {
        self.body.as_deref().unwrap_or(&[])
    }
}
