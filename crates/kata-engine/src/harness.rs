//! Assessment orchestration.
//!
//! One attempt: validate structure once, check regex patterns once,
//! instrument once, then run every fixture through a fresh sandbox and
//! compare output. Attempt-global failures (validation, patterns) abort
//! before any fixture executes; per-fixture failures never abort their
//! siblings.

use crate::fixture::{RunReport, TestFixture, TestResult};
use crate::patterns::Patterns;
use crate::protect;
use kata_eval::{Budget, Sandbox};
use kata_validate::Rule;
use thiserror::Error;

/// A failure not tied to any single fixture.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// Structural validation (or a regex pattern) rejected the attempt.
    /// Carries the first diagnostic; fixtures never ran.
    #[error("{0}")]
    Validation(String),
}

/// Runs whole assessment attempts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Harness {
    budget: Budget,
}

impl Harness {
    pub fn new() -> Self {
        Harness::default()
    }

    pub fn with_budget(budget: Budget) -> Self {
        Harness { budget }
    }

    /// Run one attempt: `source` against `fixtures`, binding `parameters`
    /// positionally from each fixture's input.
    ///
    /// `requirements` (structural rules) and `patterns` are both optional;
    /// when present they gate execution and a failure aborts the attempt.
    pub fn run_fixtures(
        &self,
        source: &str,
        fixtures: &[TestFixture],
        parameters: &[String],
        requirements: Option<&[Rule]>,
        patterns: Option<&Patterns>,
    ) -> Result<RunReport, EngineError> {
        if let Some(rules) = requirements {
            let verdict = crate::validate_structure(source, rules);
            if !verdict.valid {
                let diagnostic = verdict
                    .errors
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| "Validation failed".to_string());
                return Err(EngineError::Validation(diagnostic));
            }
        }

        if let Some(patterns) = patterns {
            patterns.check(source).map_err(EngineError::Validation)?;
        }

        // one instrumentation per attempt, shared by every fixture
        let instrumented = protect::instrument(source);
        let sandbox = Sandbox::new(self.budget);

        let results: Vec<TestResult> = fixtures
            .iter()
            .map(|fixture| {
                let expected = fixture.expected_lines();
                let outcome = sandbox.execute(&instrumented, parameters, &fixture.input);
                match outcome.error {
                    Some(message) => TestResult {
                        input: fixture.input.clone(),
                        expected,
                        actual: vec![message],
                        passed: false,
                        error: true,
                    },
                    None => {
                        let passed = outcome.output == expected;
                        TestResult {
                            input: fixture.input.clone(),
                            expected,
                            actual: outcome.output,
                            passed,
                            error: false,
                        }
                    }
                }
            })
            .collect();

        let all_passed = results.iter().all(|r| r.passed);
        tracing::debug!(
            fixtures = results.len(),
            all_passed,
            "assessment attempt finished"
        );
        Ok(RunReport {
            results,
            all_passed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture(input: serde_json::Value, output: serde_json::Value) -> TestFixture {
        serde_json::from_value(json!({ "input": input, "output": output })).unwrap()
    }

    #[test]
    fn test_validation_failure_aborts_before_fixtures() {
        let harness = Harness::new();
        let rules = vec![Rule::Structure {
            node_type: "WhileStatement".to_string(),
        }];
        let err = harness
            .run_fixtures(
                "let x = 1;",
                &[fixture(json!([]), json!(["1"]))],
                &[],
                Some(&rules),
                None,
            )
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("Missing required structure: WhileStatement".to_string())
        );
    }

    #[test]
    fn test_syntax_error_surfaces_when_requirements_present() {
        let harness = Harness::new();
        let err = harness
            .run_fixtures("let = ;", &[], &[], Some(&[]), None)
            .unwrap_err();
        let EngineError::Validation(message) = err;
        assert!(message.starts_with("Syntax Error:"), "got: {message}");
    }

    #[test]
    fn test_pattern_failure_aborts() {
        let harness = Harness::new();
        let patterns = Patterns {
            required: vec![r"while".to_string()],
            forbidden: vec![],
        };
        let err = harness
            .run_fixtures("let x = 1;", &[], &[], None, Some(&patterns))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("Code must contain pattern: while".to_string())
        );
    }

    #[test]
    fn test_fixture_error_does_not_abort_siblings() {
        let harness = Harness::new();
        let report = harness
            .run_fixtures(
                "console.log(n.length);",
                &[
                    fixture(json!([null]), json!(["0"])),
                    fixture(json!(["abc"]), json!(["3"])),
                ],
                &["n".to_string()],
                None,
                None,
            )
            .unwrap();
        assert!(!report.all_passed);
        assert!(report.results[0].error);
        assert!(!report.results[0].passed);
        // the second fixture still ran and passed
        assert!(report.results[1].passed);
    }

    #[test]
    fn test_exact_string_comparison() {
        let harness = Harness::new();
        let report = harness
            .run_fixtures(
                r#"console.log("3 ");"#,
                &[fixture(json!([]), json!(["3"]))],
                &[],
                None,
                None,
            )
            .unwrap();
        // "3 " is not "3"
        assert!(!report.all_passed);
        assert!(!report.results[0].error);
        assert_eq!(report.results[0].actual, vec!["3 "]);
    }

    #[test]
    fn test_primary_output_comes_from_first_fixture() {
        let harness = Harness::new();
        let report = harness
            .run_fixtures(
                "console.log(x * 2);",
                &[
                    fixture(json!([2]), json!(["4"])),
                    fixture(json!([5]), json!(["10"])),
                ],
                &["x".to_string()],
                None,
                None,
            )
            .unwrap();
        assert!(report.all_passed);
        assert_eq!(report.primary_output(), Some(&["4".to_string()][..]));
    }
}
