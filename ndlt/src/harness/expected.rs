//! Extraction of `//#` expected-output annotations from test sources.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CaseError;

/// Marks a source line that contributes one expected output line.
pub const ANNOTATION_MARKER: &str = "//#";

static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//#(.+)").expect("annotation pattern compiles"));

/// Collect the expected output lines of a test file, in source order.
///
/// Every line containing [`ANNOTATION_MARKER`] yields the text after the
/// first marker with surrounding whitespace trimmed. A marker with nothing
/// at all after it is rejected, naming the 1-based line.
///
/// ```
/// let expected = ndlt::harness::extract_expected("say 1; //# 1\nsay 2;\n//#  two \n").unwrap();
/// assert_eq!(expected, vec!["1", "two"]);
/// ```
pub fn extract_expected(source: &str) -> Result<Vec<String>, CaseError> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains(ANNOTATION_MARKER))
        .map(|(index, line)| {
            ANNOTATION
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .ok_or_else(|| CaseError::Parse {
                    line: index + 1,
                    text: line.to_string(),
                })
        })
        .collect()
}
