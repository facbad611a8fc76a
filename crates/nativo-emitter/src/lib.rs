//! Translation of an [`AssemblyGraph`](nativo_metadata::AssemblyGraph) into
//! C++ declarations and definitions.
//!
//! ```text
//! AssemblyGraph
//!   → select + order types            (assembler)
//!   → declaration pass, sequential    (declarations)   → .hpp + Registry
//!   → body pass, one unit per type    (definitions, body, ir_printer)
//!   → join in metadata order + main() (assembler)      → .cpp
//! ```
//!
//! Entry point: [`translate`].

// Name resolution (metadata identifiers → target identifiers)
pub mod names;

// Fixed runtime-import table and method roles
pub mod roles;
pub mod runtime_imports;

// Statement/expression IR and its C++ printer
pub mod ir;
pub mod ir_printer;

// Evaluation stack simulation
pub mod body;

// Declaration pass, definition fragments, whole-program assembly
pub mod assembler;
pub mod declarations;
pub mod definitions;

pub mod options;

pub use assembler::{Translation, translate};
pub use declarations::{Entrypoint, Registry};
pub use options::TranslateOptions;

#[cfg(test)]
#[path = "tests/names_tests.rs"]
mod names_tests;
#[cfg(test)]
#[path = "tests/runtime_imports_tests.rs"]
mod runtime_imports_tests;
#[cfg(test)]
#[path = "tests/ir_printer_tests.rs"]
mod ir_printer_tests;
#[cfg(test)]
#[path = "tests/body_tests.rs"]
mod body_tests;
#[cfg(test)]
#[path = "tests/declarations_tests.rs"]
mod declarations_tests;
#[cfg(test)]
#[path = "tests/assembler_tests.rs"]
mod assembler_tests;
