//! Rendering a [`RunReport`] for the console.
//!
//! The text format is line oriented and stable between runs:
//!
//! ```text
//! tests/a.ndl -> OK
//! tests/b.ndl -> ERROR: expected 2, got 3
//! ================
//! ERROR!
//! ```

use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::Result;
use crate::harness::{CaseOutcome, CaseReport, Mismatch, RunReport};

/// Width of the `=` rule printed before the verdict.
pub const SEPARATOR_WIDTH: usize = 16;

/// Verdict line of a clean run.
pub const VERDICT_OK: &str = "OK!";

/// Verdict line of a run with at least one failure.
pub const VERDICT_ERROR: &str = "ERROR!";

/// Output format for the test report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One line per case followed by `OK!` or `ERROR!`
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// Report lines for one case, without the trailing newline.
pub fn case_lines(case: &CaseReport) -> Vec<String> {
    let path = case.path.display();
    match &case.outcome {
        CaseOutcome::Pass => vec![format!("{path} -> OK")],
        CaseOutcome::Mismatch(Mismatch::Length { want, got }) => {
            vec![format!("{path} -> ERROR: want {want} lines, got {got}")]
        }
        CaseOutcome::Mismatch(Mismatch::Lines(diffs)) => diffs
            .iter()
            .map(|diff| {
                format!(
                    "{path} -> ERROR: expected {}, got {}",
                    diff.expected, diff.actual
                )
            })
            .collect(),
        CaseOutcome::Malformed(err) => vec![format!("{path} -> ERROR: malformed test: {err}")],
        CaseOutcome::Exception(failure) => {
            vec![format!("{path} -> EXCEPTION: {}", failure.to_string().trim_end())]
        }
    }
}

/// Final verdict line.
pub fn verdict(report: &RunReport) -> &'static str {
    if report.ok() {
        VERDICT_OK
    } else {
        VERDICT_ERROR
    }
}

/// Write the text report.
pub fn write_text<W: Write>(out: &mut W, report: &RunReport) -> Result<()> {
    for case in &report.cases {
        for line in case_lines(case) {
            writeln!(out, "{line}")?;
        }
    }
    writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH))?;
    writeln!(out, "{}", verdict(report))?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    ok: bool,
    aborted: bool,
    passed: usize,
    failed: usize,
    cases: Vec<JsonCase<'a>>,
}

#[derive(Serialize)]
struct JsonCase<'a> {
    path: String,
    status: &'a str,
    messages: Vec<String>,
}

fn status(outcome: &CaseOutcome) -> &'static str {
    match outcome {
        CaseOutcome::Pass => "ok",
        CaseOutcome::Mismatch(_) => "mismatch",
        CaseOutcome::Malformed(_) => "malformed",
        CaseOutcome::Exception(_) => "exception",
    }
}

/// Write the report as one pretty-printed JSON document.
pub fn write_json<W: Write>(out: &mut W, report: &RunReport) -> Result<()> {
    let doc = JsonReport {
        ok: report.ok(),
        aborted: report.aborted,
        passed: report.passed(),
        failed: report.failed(),
        cases: report
            .cases
            .iter()
            .map(|case| JsonCase {
                path: case.path.display().to_string(),
                status: status(&case.outcome),
                messages: match &case.outcome {
                    CaseOutcome::Pass => Vec::new(),
                    _ => case_lines(case),
                },
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

/// Write `report` in the chosen format.
pub fn write_report<W: Write>(out: &mut W, report: &RunReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Text => write_text(out, report),
        ReportFormat::Json => write_json(out, report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CaseError, SentinelProblem};
    use crate::harness::{ExecFailure, LineDiff};
    use std::path::PathBuf;

    fn case(path: &str, outcome: CaseOutcome) -> CaseReport {
        CaseReport {
            path: PathBuf::from(path),
            outcome,
        }
    }

    fn render(report: &RunReport) -> String {
        let mut out = Vec::new();
        write_text(&mut out, report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_all_passing() {
        let report = RunReport {
            cases: vec![case("tests/a.ndl", CaseOutcome::Pass)],
            aborted: false,
        };
        assert_eq!(render(&report), "tests/a.ndl -> OK\n================\nOK!\n");
    }

    #[test]
    fn test_empty_run() {
        assert_eq!(render(&RunReport::default()), "================\nOK!\n");
    }

    #[test]
    fn test_length_mismatch_is_single_line() {
        let lines = case_lines(&case(
            "tests/a.ndl",
            CaseOutcome::Mismatch(Mismatch::Length { want: 2, got: 3 }),
        ));
        assert_eq!(lines, vec!["tests/a.ndl -> ERROR: want 2 lines, got 3"]);
    }

    #[test]
    fn test_one_line_per_differing_index() {
        let diffs = vec![
            LineDiff {
                index: 0,
                expected: "1".to_string(),
                actual: "one".to_string(),
            },
            LineDiff {
                index: 2,
                expected: "3".to_string(),
                actual: "three".to_string(),
            },
        ];
        let lines = case_lines(&case(
            "t.ndl",
            CaseOutcome::Mismatch(Mismatch::Lines(diffs)),
        ));
        assert_eq!(
            lines,
            vec![
                "t.ndl -> ERROR: expected 1, got one",
                "t.ndl -> ERROR: expected 3, got three",
            ]
        );
    }

    #[test]
    fn test_exception_line() {
        let lines = case_lines(&case(
            "t.ndl",
            CaseOutcome::Exception(ExecFailure::Stderr("runtime error\n".to_string())),
        ));
        assert_eq!(lines, vec!["t.ndl -> EXCEPTION: runtime error"]);
    }

    #[test]
    fn test_malformed_line() {
        let lines = case_lines(&case(
            "t.ndl",
            CaseOutcome::Malformed(CaseError::MissingSentinel(SentinelProblem::NoOutput)),
        ));
        assert_eq!(
            lines,
            vec!["t.ndl -> ERROR: malformed test: missing sentinel \"== Output ==\""]
        );
    }

    #[test]
    fn test_failure_verdict() {
        let report = RunReport {
            cases: vec![
                case("a.ndl", CaseOutcome::Pass),
                case(
                    "b.ndl",
                    CaseOutcome::Mismatch(Mismatch::Length { want: 1, got: 0 }),
                ),
            ],
            aborted: false,
        };
        assert!(render(&report).ends_with("================\nERROR!\n"));
    }

    #[test]
    fn test_json_report() {
        let report = RunReport {
            cases: vec![
                case("a.ndl", CaseOutcome::Pass),
                case(
                    "b.ndl",
                    CaseOutcome::Exception(ExecFailure::Stderr("boom".to_string())),
                ),
            ],
            aborted: true,
        };

        let mut out = Vec::new();
        write_json(&mut out, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["ok"], false);
        assert_eq!(value["aborted"], true);
        assert_eq!(value["passed"], 1);
        assert_eq!(value["cases"][0]["status"], "ok");
        assert_eq!(value["cases"][1]["status"], "exception");
        assert_eq!(value["cases"][1]["messages"][0], "b.ndl -> EXCEPTION: boom");
    }
}
