//! ndlt CLI - golden-output test harness for the needle compiler.
//!
//! This is the main entry point. It uses clap for argument parsing and
//! dispatches to the command handlers in [`ndlt::commands`].

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ndlt::commands::{run_init, run_test, InitArgs, TestArgs};
use ndlt::harness::install_interrupt_cleanup;
use ndlt::report::ReportFormat;
use ndlt::{Config, NdltError, Result};

/// Exit code for a run that finished with `ERROR!`.
const EXIT_TESTS_FAILED: u8 = 1;

/// Exit code for a run that could not produce a verdict.
const EXIT_FATAL: u8 = 2;

/// ndlt - golden-output test harness for the needle compiler
///
/// Builds the compiler, runs it on every test file and compares the
/// program output with the file's `//#` annotations.
#[derive(Parser, Debug)]
#[command(name = "ndlt")]
#[command(author = "Needle Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Golden-output test harness for the needle compiler", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "NDLT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "NDLT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "NDLT_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the ndlt CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the compiler and run the golden tests
    ///
    /// Prints one line per test file followed by a separator and
    /// OK! or ERROR!. The exit code is 0 for OK!, 1 for ERROR!.
    Test(TestCommand),

    /// Write a default ndlt.toml and an example test
    Init(InitCommand),
}

/// Arguments for the test subcommand.
#[derive(Parser, Debug)]
struct TestCommand {
    /// Directory scanned for test files (default: from config)
    #[arg(short, long)]
    tests: Option<PathBuf>,

    /// Test file extension (default: from config)
    #[arg(short, long)]
    extension: Option<String>,

    /// Per-test timeout in seconds, 0 to disable (default: from config)
    #[arg(long)]
    timeout: Option<u64>,

    /// Keep running after a test writes to stderr
    #[arg(short, long)]
    keep_going: bool,

    /// Report format
    #[arg(short = 'F', long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

/// Arguments for the init subcommand.
#[derive(Parser, Debug)]
struct InitCommand {
    /// Directory to initialize (default: current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Overwrite an existing ndlt.toml
    #[arg(short, long)]
    force: bool,
}

/// Main entry point for the ndlt CLI.
///
/// Fatal errors are printed to stderr and mapped to [`EXIT_FATAL`].
fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_TESTS_FAILED),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Initialize logging, load configuration and execute the command.
///
/// Returns whether the command succeeded.
fn run(cli: Cli) -> Result<bool> {
    init_logging(cli.verbose, cli.no_color)?;

    let config = load_config(cli.config.as_deref())?;

    execute_command(cli.command, cli.verbose, config)
}

/// Initialize the logging system.
///
/// Logs go to stderr; stdout is reserved for the test report.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| NdltError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Execute the selected command.
fn execute_command(command: Commands, verbose: bool, config: Config) -> Result<bool> {
    match command {
        Commands::Test(args) => execute_test(args, verbose, config),
        Commands::Init(args) => execute_init(args, verbose, config).map(|()| true),
    }
}

/// Execute the test command.
///
/// Ctrl-C exits with [`ndlt::harness::EXIT_INTERRUPTED`] after removing the
/// compiler artifact.
fn execute_test(args: TestCommand, verbose: bool, config: Config) -> Result<bool> {
    install_interrupt_cleanup()?;

    let test_args = TestArgs {
        verbose,
        tests: args.tests,
        extension: args.extension,
        timeout: args.timeout,
        keep_going: args.keep_going,
        format: args.format,
    };
    run_test(test_args, config)
}

/// Execute the init command.
fn execute_init(args: InitCommand, verbose: bool, config: Config) -> Result<()> {
    let init_args = InitArgs {
        verbose,
        force: args.force,
        path: args.path,
    };
    run_init(init_args, config)
}
