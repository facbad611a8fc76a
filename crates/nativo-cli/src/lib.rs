//! Command-line front end for the nativo translator.
//!
//! `nativo <ASSEMBLY>` reads a metadata dump, translates it and writes the
//! declarations (`.hpp`) and definitions (`.cpp`) next to the input.

pub mod args;
pub mod driver;
pub mod reporter;
pub mod tracing_config;

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;
