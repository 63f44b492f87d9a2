//! Test fixtures and per-fixture results.

use kata_types::jsfmt::js_string_of_json;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// One challenge test case, as declared in lesson content: positional
/// input values and the expected printed lines.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestFixture {
    #[serde(default)]
    pub input: Vec<Json>,
    /// Either a list of lines or a single scalar; normalized by
    /// [`TestFixture::expected_lines`].
    pub output: Json,
}

impl TestFixture {
    /// Expected output as a list of strings, stringified the same way
    /// captured output is, so comparison is exact string equality.
    pub fn expected_lines(&self) -> Vec<String> {
        match &self.output {
            Json::Array(lines) => lines.iter().map(js_string_of_json).collect(),
            scalar => vec![js_string_of_json(scalar)],
        }
    }
}

/// Outcome of one fixture. Constructed once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub input: Vec<Json>,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub passed: bool,
    /// True when the fixture failed because execution raised an error
    /// (runtime fault or budget trip), in which case `actual` holds the
    /// error message.
    pub error: bool,
}

/// Aggregate over all fixtures of one attempt, fixture order preserved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub results: Vec<TestResult>,
    pub all_passed: bool,
}

impl RunReport {
    /// The first fixture's captured output, for display as the program's
    /// console output. `None` when the first fixture errored.
    pub fn primary_output(&self) -> Option<&[String]> {
        self.results
            .first()
            .filter(|r| !r.error)
            .map(|r| r.actual.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixture_deserializes_with_default_input() {
        let fixture: TestFixture = serde_json::from_value(json!({ "output": ["Adult"] })).unwrap();
        assert!(fixture.input.is_empty());
        assert_eq!(fixture.expected_lines(), vec!["Adult"]);
    }

    #[test]
    fn test_scalar_output_normalizes_to_one_line() {
        let fixture: TestFixture = serde_json::from_value(json!({ "output": 5 })).unwrap();
        assert_eq!(fixture.expected_lines(), vec!["5"]);
    }

    #[test]
    fn test_numeric_lines_stringify_like_js() {
        let fixture: TestFixture =
            serde_json::from_value(json!({ "input": [2, 3], "output": [5, "ok"] })).unwrap();
        assert_eq!(fixture.expected_lines(), vec!["5", "ok"]);
    }
}
