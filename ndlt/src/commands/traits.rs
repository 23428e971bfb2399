//! Command trait and common types for the ndlt CLI.
//!
//! This module defines the standard command traits that all commands
//! implement to keep construction and execution uniform.

use crate::config::Config;
use crate::error::Result;

/// Standard command trait that all ndlt commands implement.
///
/// # Type Parameters
/// * `Args` - The arguments type for this command
/// * `Output` - The output type returned by this command
pub trait Command {
    /// The arguments type for this command.
    type Args;

    /// The output type returned by this command.
    type Output;

    /// Create a new command from parsed arguments and the loaded configuration.
    fn new(args: Self::Args, config: Config) -> Self;

    /// Execute the command.
    fn execute(&self) -> Result<Self::Output>;

    /// Get the command name.
    fn name() -> &'static str;
}

/// Trait for providing a one-line command description.
pub trait CommandDescription {
    /// A brief one-line description.
    fn description() -> &'static str;
}
