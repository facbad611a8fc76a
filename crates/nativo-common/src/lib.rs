//! Common types and utilities for the nativo translator.
//!
//! This crate provides foundational types used across all nativo crates:
//! - Translation diagnostics (`TranslateError`, `TranslateErrorKind`, `Location`)
//! - The indentation-aware `SourceWriter` used by every emitter

// Diagnostics - located translation errors
pub mod diagnostics;
pub use diagnostics::{Location, TranslateError, TranslateErrorKind};

// Text output buffer with indentation tracking
pub mod source_writer;
pub use source_writer::SourceWriter;

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod diagnostics_tests;
#[cfg(test)]
#[path = "tests/source_writer_tests.rs"]
mod source_writer_tests;
