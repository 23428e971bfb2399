//! Error handling module for ndlt.
//!
//! Two layers of errors exist. [`NdltError`] is fatal: it stops the whole
//! run before or instead of a verdict. [`CaseError`] describes a malformed
//! test case; the harness records it against that one file and moves on.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal error type for the ndlt CLI application.
#[derive(Error, Debug)]
pub enum NdltError {
    /// Error when configuration is missing or cannot be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when input validation fails.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The build command could not produce the compiler artifact.
    #[error("Build failed: {0}")]
    Build(String),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while walking the test directory.
    #[error("Test discovery failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// Error when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using NdltError.
pub type Result<T> = std::result::Result<T, NdltError>;

/// A test case that cannot be evaluated because its inputs are malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaseError {
    /// An annotation marker with nothing after it.
    #[error("malformed annotation on line {line}: {text:?}")]
    Parse { line: usize, text: String },

    /// The program output lacks a sentinel line, or has them out of order.
    #[error("{0}")]
    MissingSentinel(SentinelProblem),

    /// The test file itself could not be read.
    #[error("cannot read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },
}

/// What exactly is wrong with the sentinel lines in program output.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelProblem {
    #[error("missing sentinel {:?}", crate::harness::OUTPUT_SENTINEL)]
    NoOutput,

    #[error("missing sentinel {:?}", crate::harness::RESULTS_SENTINEL)]
    NoResults,

    #[error("sentinel {:?} appears before {:?}", crate::harness::RESULTS_SENTINEL, crate::harness::OUTPUT_SENTINEL)]
    OutOfOrder,
}
