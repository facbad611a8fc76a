//! Structural role of a method.

use nativo_common::{Location, TranslateError, TranslateErrorKind};
use nativo_metadata::MethodDef;

use crate::runtime_imports::{ImportCategory, RUNTIME_IMPORT_ATTRIBUTE, RuntimeImport};

/// Simple name of the entrypoint marker attribute.
pub const ENTRYPOINT_ATTRIBUTE: &str = "EntrypointAttribute";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodRole {
    Constructor,
    StaticConstructor,
    RuntimeImport(RuntimeImport),
    Regular,
}

/// Classify `method` declared on the target type `owner`.
///
/// The runtime-import marker wins over the name-based roles. A marked method
/// whose category is not internal or whose ordinal is not in the fixed table
/// is an error.
pub fn classify_method(owner: &str, method: &MethodDef) -> Result<MethodRole, TranslateError> {
    if let Some(attr) = method.attribute(RUNTIME_IMPORT_ATTRIBUTE) {
        let location = || Location::in_method(owner, method.name.as_str());
        let malformed = |expected| {
            TranslateError::new(
                TranslateErrorKind::MalformedAttribute {
                    attribute: attr.attribute_type.clone(),
                    expected,
                },
                location(),
            )
        };

        let category = attr
            .arguments
            .first()
            .map(ImportCategory::from_argument)
            .ok_or_else(|| malformed("a category argument"))?;
        if let ImportCategory::Other(category) = category {
            return Err(TranslateError::new(
                TranslateErrorKind::UnsupportedRuntimeImportCategory { category },
                location(),
            ));
        }

        let ordinal = attr
            .arguments
            .get(1)
            .and_then(|arg| arg.as_int())
            .ok_or_else(|| malformed("a numeric ordinal argument"))?;
        let import = RuntimeImport::from_ordinal(ordinal).ok_or_else(|| {
            TranslateError::new(TranslateErrorKind::UnknownRuntimeImport { ordinal }, location())
        })?;
        return Ok(MethodRole::RuntimeImport(import));
    }

    Ok(if method.is_constructor() {
        MethodRole::Constructor
    } else if method.is_static_constructor() {
        MethodRole::StaticConstructor
    } else {
        MethodRole::Regular
    })
}

pub fn is_entrypoint(method: &MethodDef) -> bool {
    method.has_attribute(ENTRYPOINT_ATTRIBUTE)
}
