//! The build-execute-compare loop.
//!
//! A run builds the compiler once, then evaluates every discovered test file
//! in order:
//!
//! 1. read the file and extract its `//#` expectations ([`extract_expected`])
//! 2. execute the artifact on it ([`CaseRunner`])
//! 3. slice the block between the output sentinels ([`slice_output`])
//! 4. compare the two sequences ([`compare`])
//!
//! Results are collected into a [`RunReport`]; rendering lives in
//! [`crate::report`].

pub mod artifact;
pub mod builder;
pub mod compare;
pub mod discovery;
pub mod exec;
pub mod expected;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use artifact::{install_interrupt_cleanup, Artifact, EXIT_INTERRUPTED};
pub use builder::Builder;
pub use compare::{compare, slice_output, LineDiff, Mismatch, OUTPUT_SENTINEL, RESULTS_SENTINEL};
pub use discovery::discover;
pub use exec::{CaseRunner, ExecFailure, ProcessOutput, ProcessRunner};
pub use expected::{extract_expected, ANNOTATION_MARKER};

use crate::error::{CaseError, Result};

/// A test file together with what it expects and what it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub path: PathBuf,
    pub expected_lines: Vec<String>,
    pub actual_lines: Vec<String>,
}

/// Verdict for one test file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Pass,
    Mismatch(Mismatch),
    /// The file or the program output could not be interpreted.
    Malformed(CaseError),
    /// The artifact wrote to stderr, timed out or did not start.
    Exception(ExecFailure),
}

impl CaseOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, CaseOutcome::Pass)
    }

    /// Whether this outcome stops the rest of the run.
    pub fn aborts_run(&self) -> bool {
        matches!(self, CaseOutcome::Exception(_))
    }
}

/// Outcome of one test file, keyed by its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub path: PathBuf,
    pub outcome: CaseOutcome,
}

/// Ordered results of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub cases: Vec<CaseReport>,
    /// Set when an execution error stopped the run before every file ran.
    pub aborted: bool,
}

impl RunReport {
    /// True while no recorded case has failed.
    pub fn ok(&self) -> bool {
        self.cases.iter().all(|case| case.outcome.is_pass())
    }

    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|case| case.outcome.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }
}

/// Evaluates test files against a built artifact.
#[derive(Debug)]
pub struct Harness<R: CaseRunner> {
    runner: R,
    keep_going: bool,
}

impl<R: CaseRunner> Harness<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            keep_going: false,
        }
    }

    /// Continue with the remaining files after an execution error.
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Run every test in order, stopping early on an execution error unless
    /// `keep_going` is set.
    pub fn run(&self, artifact: &Path, tests: &[PathBuf]) -> RunReport {
        let mut report = RunReport::default();

        for (done, path) in tests.iter().enumerate() {
            let outcome = self.run_case(artifact, path);
            let stop = outcome.aborts_run() && !self.keep_going;
            report.cases.push(CaseReport {
                path: path.clone(),
                outcome,
            });

            if stop {
                let skipped = tests.len() - done - 1;
                warn!(case = %path.display(), skipped, "execution error, aborting run");
                report.aborted = skipped > 0;
                break;
            }
        }

        info!(
            passed = report.passed(),
            failed = report.failed(),
            "run finished"
        );
        report
    }

    /// Evaluate a single test file.
    pub fn run_case(&self, artifact: &Path, path: &Path) -> CaseOutcome {
        debug!(case = %path.display(), "running case");

        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                return CaseOutcome::Malformed(CaseError::Read {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };

        let expected_lines = match extract_expected(&source) {
            Ok(lines) => lines,
            Err(e) => return CaseOutcome::Malformed(e),
        };

        let output = match self.runner.run(artifact, path) {
            Ok(output) => output,
            Err(e) => return CaseOutcome::Exception(e),
        };

        if !output.stderr.is_empty() {
            return CaseOutcome::Exception(ExecFailure::Stderr(output.stderr));
        }

        let actual_lines = match slice_output(&output.stdout) {
            Ok(lines) => lines,
            Err(e) => return CaseOutcome::Malformed(e),
        };

        let case = TestCase {
            path: path.to_path_buf(),
            expected_lines,
            actual_lines,
        };
        case.verdict()
    }
}

impl TestCase {
    pub fn verdict(&self) -> CaseOutcome {
        match compare(&self.expected_lines, &self.actual_lines) {
            None => CaseOutcome::Pass,
            Some(mismatch) => CaseOutcome::Mismatch(mismatch),
        }
    }
}

/// Build the compiler, run every test, and remove the artifact again.
///
/// The artifact guard is claimed before the build starts, so it is removed
/// whether the build fails, the run aborts, or everything passes.
pub fn run_suite<R: CaseRunner>(
    builder: &Builder,
    harness: &Harness<R>,
    tests: &[PathBuf],
) -> Result<RunReport> {
    let artifact = Artifact::claim(builder.artifact_path())?;
    builder.build(&artifact)?;
    Ok(harness.run(artifact.path(), tests))
}
