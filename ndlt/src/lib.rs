//! ndlt - golden-output test harness for the needle compiler.
//!
//! Test files carry their expected output inline as `//#` annotations. The
//! harness builds the compiler, runs it on each file, cuts the program's
//! output out of everything the compiler prints, and compares the two.

pub mod commands;
pub mod config;
pub mod error;
pub mod harness;
pub mod report;

pub use config::Config;
pub use error::{CaseError, NdltError, Result};
