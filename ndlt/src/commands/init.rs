//! Init command implementation.
//!
//! Writes a default `ndlt.toml` and an example test so a compiler checkout
//! can start using the harness right away.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::commands::common::{error_messages, output_messages};
use crate::commands::traits::{Command, CommandDescription};
use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::{NdltError, Result};

/// File name of the example test written by `init`.
pub const EXAMPLE_TEST_NAME: &str = "hello";

const EXAMPLE_TEST: &str = "\
// Lines ending in an annotation declare the expected output, in order.
say 1 + 2; //# 3
say \"needle\"; //# needle
";

/// Arguments for the init command.
#[derive(Debug, Clone, Default)]
pub struct InitArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Overwrite an existing configuration file.
    pub force: bool,
    /// Directory to initialize.
    pub path: Option<PathBuf>,
}

/// Init command handler.
pub struct InitCommand {
    args: InitArgs,
    config: Config,
}

impl InitCommand {
    /// Execute the command.
    pub fn run(&self) -> Result<()> {
        let target_path = self.get_target_path();

        self.validate_directory(&target_path)?;
        self.create_config_file(&target_path)?;
        self.create_test_dir(&target_path)?;

        info!(path = %target_path.display(), "project initialized");
        Ok(())
    }

    fn get_target_path(&self) -> PathBuf {
        self.args
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Create the target if needed and make sure it is a directory.
    fn validate_directory(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
            if self.args.verbose {
                info!(path = %path.display(), "{}", output_messages::CREATED_DIR);
            }
            return Ok(());
        }

        if !path.is_dir() {
            return Err(NdltError::Validation(format!(
                "{} {}",
                error_messages::TARGET_NOT_DIR,
                path.display()
            )));
        }

        Ok(())
    }

    /// Write the configuration file unless one exists and `force` is off.
    fn create_config_file(&self, path: &Path) -> Result<()> {
        let config_path = path.join(CONFIG_FILE_NAME);

        if config_path.exists() && !self.args.force {
            warn!(path = %config_path.display(), "{}", output_messages::SKIPPED_FILE);
            return Ok(());
        }

        self.config.save_to_path(&config_path)?;

        if self.args.verbose {
            info!(path = %config_path.display(), "{}", output_messages::CREATED_FILE);
        }

        Ok(())
    }

    /// Create the test directory with one example test in it.
    fn create_test_dir(&self, path: &Path) -> Result<()> {
        let harness = &self.config.harness;
        let test_dir = path.join(&harness.test_dir);

        if !test_dir.exists() {
            std::fs::create_dir_all(&test_dir)?;
            if self.args.verbose {
                info!(path = %test_dir.display(), "{}", output_messages::CREATED_DIR);
            }
        }

        let example = test_dir.join(format!("{}.{}", EXAMPLE_TEST_NAME, harness.extension));
        if example.exists() {
            warn!(path = %example.display(), "{}", output_messages::SKIPPED_FILE);
            return Ok(());
        }

        std::fs::write(&example, EXAMPLE_TEST)?;
        if self.args.verbose {
            info!(path = %example.display(), "{}", output_messages::CREATED_FILE);
        }

        Ok(())
    }
}

impl Command for InitCommand {
    type Args = InitArgs;
    type Output = ();

    fn new(args: Self::Args, config: Config) -> Self {
        Self { args, config }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "init"
    }
}

impl CommandDescription for InitCommand {
    fn description() -> &'static str {
        "Initialize ndlt in a compiler checkout"
    }
}

/// Run the init command.
pub fn run_init(args: InitArgs, config: Config) -> Result<()> {
    let command = InitCommand::new(args, config);
    command.execute()
}
