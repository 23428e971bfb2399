//! Slicing program output and comparing it against expectations.

use crate::error::{CaseError, SentinelProblem};

/// Line that opens the program's declared output.
pub const OUTPUT_SENTINEL: &str = "== Output ==";

/// Line that closes the program's declared output.
pub const RESULTS_SENTINEL: &str = "== Results ==";

/// One index where actual output disagrees with the expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff {
    pub index: usize,
    pub expected: String,
    pub actual: String,
}

/// How actual output failed to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Line counts differ; no per-line diff is computed.
    Length { want: usize, got: usize },
    /// Same line count, differing at the listed indices.
    Lines(Vec<LineDiff>),
}

/// Lines strictly between the first [`OUTPUT_SENTINEL`] and the first
/// [`RESULTS_SENTINEL`] of `stdout`.
pub fn slice_output(stdout: &str) -> Result<Vec<String>, CaseError> {
    let lines: Vec<&str> = stdout.lines().collect();

    let start = lines
        .iter()
        .position(|line| *line == OUTPUT_SENTINEL)
        .ok_or(CaseError::MissingSentinel(SentinelProblem::NoOutput))?;
    let end = lines
        .iter()
        .position(|line| *line == RESULTS_SENTINEL)
        .ok_or(CaseError::MissingSentinel(SentinelProblem::NoResults))?;

    if end < start {
        return Err(CaseError::MissingSentinel(SentinelProblem::OutOfOrder));
    }

    Ok(lines[start + 1..end].iter().map(|s| s.to_string()).collect())
}

/// Compare expected and actual lines as ordered sequences.
///
/// Returns `None` when they are equal.
pub fn compare(expected: &[String], actual: &[String]) -> Option<Mismatch> {
    if expected == actual {
        return None;
    }

    if expected.len() != actual.len() {
        return Some(Mismatch::Length {
            want: expected.len(),
            got: actual.len(),
        });
    }

    let diffs = expected
        .iter()
        .zip(actual)
        .enumerate()
        .filter(|(_, (want, got))| want != got)
        .map(|(index, (want, got))| LineDiff {
            index,
            expected: want.clone(),
            actual: got.clone(),
        })
        .collect();

    Some(Mismatch::Lines(diffs))
}
