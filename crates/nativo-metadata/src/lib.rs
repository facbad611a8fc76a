//! Assembly metadata for the nativo translator.
//!
//! The translator never parses binary assemblies itself. An out-of-tree
//! disassembler dumps the typed metadata (types, fields, methods) and each
//! method's instruction stream as JSON; this crate turns that dump into a
//! read-only, indexed [`AssemblyGraph`].
//!
//! ```json
//! {
//!   "name": "Hello",
//!   "types": [{
//!     "namespace": "App", "name": "Program", "base": "System.Object",
//!     "methods": [{
//!       "name": "Main", "static": true, "return_type": "System.Int32",
//!       "attributes": [{ "type": "System.EntrypointAttribute" }],
//!       "body": [
//!         { "offset": 0, "opcode": "ldc.i4.0" },
//!         { "offset": 1, "opcode": "ret" }
//!       ]
//!     }]
//!   }]
//! }
//! ```

// Type signatures (`System.Int32`, `System.Void*`, `System.String[]`)
pub mod signature;
pub use signature::TypeSig;

// Instruction stream: opcodes, operands, member references
pub mod instruction;
pub use instruction::{FieldRef, Instruction, MethodRef, OpCode, Operand};

// Types, fields, methods, attributes
pub mod model;
pub use model::{AttributeArgument, CustomAttribute, FieldDef, MethodDef, ParamDef, TypeDef};

// The queryable graph
pub mod graph;
pub use graph::AssemblyGraph;

// Loading from disk / text
pub mod reader;
pub use reader::{ReadError, read_assembly};

// Shared fixtures for tests and benches across the workspace
pub mod test_fixtures;

#[cfg(test)]
#[path = "tests/signature_tests.rs"]
mod signature_tests;
#[cfg(test)]
#[path = "tests/instruction_tests.rs"]
mod instruction_tests;
#[cfg(test)]
#[path = "tests/graph_tests.rs"]
mod graph_tests;
#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod reader_tests;
