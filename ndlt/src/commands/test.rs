//! Test command implementation.
//!
//! Builds the compiler, runs every golden test against it and prints the
//! report to stdout.

use std::path::PathBuf;
use std::time::Instant;

use tracing::info;

use crate::commands::common::error_messages;
use crate::commands::traits::{Command, CommandDescription};
use crate::config::{Config, HarnessConfig};
use crate::error::{NdltError, Result};
use crate::harness::{self, Builder, Harness, ProcessRunner, RunReport};
use crate::report::{self, ReportFormat};

/// Arguments for the test command.
#[derive(Debug, Clone, Default)]
pub struct TestArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Test directory (overrides config).
    pub tests: Option<PathBuf>,
    /// Test file extension (overrides config).
    pub extension: Option<String>,
    /// Per-case timeout in seconds (overrides config).
    pub timeout: Option<u64>,
    /// Continue after execution errors.
    pub keep_going: bool,
    /// Report format.
    pub format: ReportFormat,
}

/// Test command handler.
pub struct TestCommand {
    args: TestArgs,
    config: Config,
}

impl TestCommand {
    /// Harness settings after applying command-line overrides.
    pub fn get_harness_config(&self) -> HarnessConfig {
        let mut config = self.config.harness.clone();

        if let Some(ref tests) = self.args.tests {
            config.test_dir = tests.clone();
        }

        if let Some(ref extension) = self.args.extension {
            config.extension = extension.trim_start_matches('.').to_string();
        }

        if let Some(timeout) = self.args.timeout {
            config.timeout_secs = timeout;
        }

        config.keep_going |= self.args.keep_going;
        config
    }

    /// Build, run and collect results without printing them.
    pub fn run(&self) -> Result<RunReport> {
        let start_time = Instant::now();
        let harness_config = self.get_harness_config();

        if !self.config.build.root.is_dir() {
            return Err(NdltError::Validation(format!(
                "{} {}",
                error_messages::BUILD_ROOT_NOT_EXIST,
                self.config.build.root.display()
            )));
        }

        let tests = harness::discover(&harness_config.test_dir, &harness_config.extension)?;
        info!(
            count = tests.len(),
            dir = %harness_config.test_dir.display(),
            "discovered tests"
        );

        let builder = Builder::new(self.config.build.clone());
        let tester = Harness::new(ProcessRunner::new(harness_config.timeout()))
            .keep_going(harness_config.keep_going);

        let report = harness::run_suite(&builder, &tester, &tests)?;

        if self.args.verbose {
            info!(
                elapsed = %format!("{:.2}s", start_time.elapsed().as_secs_f64()),
                "test command finished"
            );
        }
        Ok(report)
    }
}

impl Command for TestCommand {
    type Args = TestArgs;
    type Output = RunReport;

    fn new(args: Self::Args, config: Config) -> Self {
        Self { args, config }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "test"
    }
}

impl CommandDescription for TestCommand {
    fn description() -> &'static str {
        "Build the compiler and run the golden tests"
    }
}

/// Run the test command and print its report.
///
/// Returns whether every case passed.
pub fn run_test(args: TestArgs, config: Config) -> Result<bool> {
    let format = args.format;
    let command = TestCommand::new(args, config);
    let report = command.execute()?;

    let stdout = std::io::stdout();
    report::write_report(&mut stdout.lock(), &report, format)?;
    Ok(report.ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use tempfile::TempDir;

    #[test]
    fn test_test_args_default() {
        let args = TestArgs::default();
        assert!(!args.verbose);
        assert!(args.tests.is_none());
        assert!(!args.keep_going);
        assert_eq!(args.format, ReportFormat::Text);
    }

    #[test]
    fn test_test_command_name() {
        assert_eq!(<TestCommand as Command>::name(), "test");
    }

    #[test]
    fn test_test_command_description() {
        assert_eq!(
            <TestCommand as CommandDescription>::description(),
            "Build the compiler and run the golden tests"
        );
    }

    #[test]
    fn test_args_override_config() {
        let args = TestArgs {
            tests: Some(PathBuf::from("golden")),
            extension: Some(".needle".to_string()),
            timeout: Some(0),
            keep_going: true,
            ..TestArgs::default()
        };
        let command = TestCommand::new(args, Config::default());

        let harness_config = command.get_harness_config();
        assert_eq!(harness_config.test_dir, PathBuf::from("golden"));
        assert_eq!(harness_config.extension, "needle");
        assert_eq!(harness_config.timeout(), None);
        assert!(harness_config.keep_going);
    }

    #[test]
    fn test_config_used_without_args() {
        let command = TestCommand::new(TestArgs::default(), Config::default());
        assert_eq!(command.get_harness_config(), HarnessConfig::default());
    }

    #[test]
    fn test_missing_test_dir_fails_before_build() {
        let root = TempDir::new().unwrap();
        let marker = root.path().join("built");
        let config = Config {
            build: BuildConfig {
                program: "touch".to_string(),
                args: vec![marker.display().to_string()],
                artifact: PathBuf::from("built"),
                root: root.path().to_path_buf(),
            },
            harness: HarnessConfig {
                test_dir: root.path().join("missing"),
                ..HarnessConfig::default()
            },
        };

        let result = TestCommand::new(TestArgs::default(), config).run();

        assert!(matches!(result, Err(NdltError::Validation(_))));
        assert!(!marker.exists());
    }

    #[test]
    fn test_missing_build_root() {
        let config = Config {
            build: BuildConfig {
                root: PathBuf::from("/nonexistent/needle"),
                ..BuildConfig::default()
            },
            ..Config::default()
        };

        let result = TestCommand::new(TestArgs::default(), config).run();
        assert!(matches!(result, Err(NdltError::Validation(msg)) if msg.contains("Build root")));
    }
}
