//! Command modules for the ndlt CLI.
//!
//! Each subcommand is implemented in its own file following the same
//! pattern: an `*Args` struct, a command type implementing
//! [`traits::Command`], and a `run_*` convenience function.

pub mod common;
pub mod traits;

pub mod init;
pub mod test;

// Re-export command types and functions
pub use init::{run_init, InitArgs};
pub use test::{run_test, TestArgs};
