//! The read-only, indexed assembly graph.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::instruction::{FieldRef, MethodRef};
use crate::model::{FieldDef, MethodDef, TypeDef};
use crate::reader::ReadError;

pub const ROOT_REFERENCE_TYPE: &str = "System.Object";
pub const ROOT_VALUE_TYPE: &str = "System.ValueType";
pub const ROOT_ENUM_TYPE: &str = "System.Enum";

#[derive(Debug, Clone)]
pub struct AssemblyGraph {
    name: String,
    types: Vec<TypeDef>,
    /// Full name → position in `types`.
    index: FxHashMap<String, usize>,
}

/// Serialized form; validated and indexed by [`AssemblyGraph::new`].
#[derive(Deserialize)]
pub(crate) struct RawAssembly {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeDef>,
}

impl AssemblyGraph {
    pub fn new(name: impl Into<String>, types: Vec<TypeDef>) -> Result<Self, ReadError> {
        let mut index = FxHashMap::default();
        for (i, ty) in types.iter().enumerate() {
            let full_name = ty.full_name();
            if index.insert(full_name.clone(), i).is_some() {
                return Err(ReadError::DuplicateType { name: full_name });
            }
        }
        Ok(Self {
            name: name.into(),
            types,
            index,
        })
    }

    pub(crate) fn from_raw(raw: RawAssembly) -> Result<Self, ReadError> {
        Self::new(raw.name, raw.types)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All types in metadata order.
    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }

    pub fn type_index(&self, full_name: &str) -> Option<usize> {
        self.index.get(full_name).copied()
    }

    pub fn find_type(&self, full_name: &str) -> Option<&TypeDef> {
        self.type_index(full_name).map(|i| &self.types[i])
    }

    pub fn resolve_field(&self, field: &FieldRef) -> Option<(&TypeDef, &FieldDef)> {
        let owner = self.find_type(&field.declaring_type)?;
        let def = owner.fields.iter().find(|f| f.name == field.name)?;
        Some((owner, def))
    }

    pub fn resolve_method(&self, method: &MethodRef) -> Option<(&TypeDef, &MethodDef)> {
        let owner = self.find_type(&method.declaring_type)?;
        let def = owner.methods.iter().find(|m| {
            m.name == method.name
                && method
                    .parameters
                    .is_none_or(|arity| m.parameters.len() == arity)
        })?;
        Some((owner, def))
    }

    /// Whether `ty` has `ancestor` somewhere in its base chain (not itself).
    pub fn derives_from(&self, ty: &TypeDef, ancestor: &str) -> bool {
        let mut current = ty.base.as_deref();
        // A malformed dump could contain a base cycle; never walk further
        // than the number of types.
        for _ in 0..=self.types.len() {
            let Some(base) = current else {
                return false;
            };
            if base == ancestor {
                return true;
            }
            current = self.find_type(base).and_then(|t| t.base.as_deref());
        }
        false
    }

    /// Value types descend from the root value type.
    pub fn is_value_type(&self, ty: &TypeDef) -> bool {
        self.derives_from(ty, ROOT_VALUE_TYPE)
    }
}
