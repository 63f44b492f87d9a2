//! End-to-end tests for the assessment engine.
//!
//! Tests validate:
//! - Full pipeline runs (validate → instrument → execute → compare)
//! - Guard insertion on every loop kind, including single-statement bodies
//! - Budget enforcement against infinite loops, and budget monotonicity
//! - Fail-fast validation ordering and AnyOf diagnostic rollback
//! - Exact ordered string comparison of fixture output

use kata_engine::{protect, Budget, Harness, Patterns, Rule, RunReport, TestFixture};
use serde_json::json;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn fixtures(spec: serde_json::Value) -> Vec<TestFixture> {
    serde_json::from_value(spec).expect("fixture json")
}

fn rules(spec: serde_json::Value) -> Vec<Rule> {
    serde_json::from_value(spec).expect("rule json")
}

fn params(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn run(
    source: &str,
    fixture_json: serde_json::Value,
    parameters: &[&str],
    requirements: Option<serde_json::Value>,
) -> RunReport {
    let requirements = requirements.map(rules);
    Harness::new()
        .run_fixtures(
            source,
            &fixtures(fixture_json),
            &params(parameters),
            requirements.as_deref(),
            None,
        )
        .unwrap_or_else(|e| panic!("attempt aborted: {e}"))
}

// ══════════════════════════════════════════════════════════════════════════════
// End-to-end scenarios
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_declaration_rule_and_output() {
    let report = run(
        r#"let age = 18;
if (age >= 18) {
    console.log("Adult");
}"#,
        json!([{ "input": [], "output": ["Adult"] }]),
        &[],
        Some(json!([{ "type": "declaration", "kind": "let", "name": "age", "initValue": 18 }])),
    );
    assert!(report.all_passed);
    assert_eq!(report.results[0].actual, vec!["Adult"]);
}

#[test]
fn test_infinite_loop_is_caught_within_budget() {
    use std::time::Instant;

    let started = Instant::now();
    let report = run(
        "while (true) {}",
        json!([{ "input": [], "output": [] }]),
        &[],
        None,
    );
    let result = &report.results[0];
    assert!(!result.passed);
    assert!(result.error);
    assert!(
        result.actual[0].starts_with("Infinite loop detected"),
        "got: {:?}",
        result.actual
    );
    // a 2000 ms time budget must not take wildly longer to fire
    assert!(started.elapsed().as_secs() < 10);
}

#[test]
fn test_no_hardcoded_console_rule() {
    let rule = json!([{ "type": "noHardcodedConsole" }]);

    let verdict = kata_engine::validate_structure(r#"console.log("hi");"#, &rules(rule.clone()));
    assert!(!verdict.valid);
    assert_eq!(
        verdict.errors,
        vec!["Hardcoded console.log statements are not allowed. Use variables or expressions."]
    );

    let verdict = kata_engine::validate_structure("console.log(name);", &rules(rule));
    assert!(verdict.valid);
}

#[test]
fn test_positional_parameter_binding() {
    let report = run(
        "console.log(a + b);",
        json!([{ "input": [2, 3], "output": ["5"] }]),
        &["a", "b"],
        None,
    );
    assert!(report.all_passed);
    assert_eq!(report.results[0].actual, vec!["5"]);
}

#[test]
fn test_multi_fixture_lesson() {
    let report = run(
        r#"function grade(score) {
    if (score >= 60) {
        return "pass";
    }
    return "fail";
}
console.log(grade(score));"#,
        json!([
            { "input": [75], "output": ["pass"] },
            { "input": [59], "output": ["fail"] },
            { "input": [60], "output": ["pass"] }
        ]),
        &["score"],
        Some(json!([
            { "type": "structure", "nodeType": "FunctionDeclaration" },
            { "type": "structure", "nodeType": "IfStatement" }
        ])),
    );
    assert!(report.all_passed);
    assert_eq!(report.results.len(), 3);
}

// ══════════════════════════════════════════════════════════════════════════════
// Guard instrumentation
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_every_loop_kind_is_guarded() {
    let sources = [
        "while (c()) { w(); }",
        "do { w(); } while (c());",
        "for (let i = 0; i < n; i++) { w(); }",
        "for (const k in o) { w(); }",
        "for (const v of xs) { w(); }",
    ];
    for source in sources {
        let instrumented = protect::instrument(source);
        assert!(
            instrumented.contains("{_checkLoop();"),
            "no guard in {instrumented:?}"
        );
        assert!(kata_parser::parse(&instrumented).is_ok());
    }
}

#[test]
fn test_single_statement_bodies_are_guarded_too() {
    let sources = [
        "while (c()) w();",
        "for (let i = 0; i < n; i++) w();",
        "for (const v of xs) w();",
    ];
    for source in sources {
        let instrumented = protect::instrument(source);
        assert!(
            instrumented.contains("{_checkLoop();w();}"),
            "body not wrapped in {instrumented:?}"
        );
        assert!(kata_parser::parse(&instrumented).is_ok());
    }
}

#[test]
fn test_guarded_loop_still_computes_correctly() {
    let report = run(
        r#"let total = 0;
for (let i = 1; i <= n; i++) {
    total += i;
}
console.log(total);"#,
        json!([{ "input": [10], "output": ["55"] }]),
        &["n"],
        None,
    );
    assert!(report.all_passed);
}

#[test]
fn test_loop_nested_as_single_statement_body_still_runs() {
    // wrapping the outer body must not clobber the inner loop's guard
    let report = run(
        r#"let i = 0;
while (i < 3) for (let j = 0; j < 2; j++) i++;
console.log(i);"#,
        json!([{ "input": [], "output": ["4"] }]),
        &[],
        None,
    );
    assert!(report.all_passed, "{:?}", report.results[0].actual);
}

#[test]
fn test_budget_tolerance_is_monotonic_in_iteration_ceiling() {
    // a loop of exactly 500 guarded iterations
    let source = "let i = 0; while (i < 500) { i++; } console.log(i);";
    let fixture_json = json!([{ "input": [], "output": ["500"] }]);

    let tight = Harness::with_budget(Budget {
        check_after: 10_000,
        timeout_ms: 60_000,
        max_iterations: 100,
    });
    let report = tight
        .run_fixtures(source, &fixtures(fixture_json.clone()), &[], None, None)
        .unwrap();
    assert!(report.results[0].error);
    assert_eq!(
        report.results[0].actual,
        vec!["Infinite loop detected (iteration limit exceeded)"]
    );

    let roomy = Harness::with_budget(Budget {
        check_after: 10_000,
        timeout_ms: 60_000,
        max_iterations: 1_000,
    });
    let report = roomy
        .run_fixtures(source, &fixtures(fixture_json), &[], None, None)
        .unwrap();
    assert!(report.all_passed);
}

// ══════════════════════════════════════════════════════════════════════════════
// Validation ordering and rollback
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_fail_fast_reports_first_failing_rule() {
    let verdict = kata_engine::validate_structure(
        "let x = 1;",
        &rules(json!([
            { "type": "declaration", "kind": "let", "name": "x" },
            { "type": "structure", "nodeType": "ForStatement" },
            { "type": "structure", "nodeType": "WhileStatement" }
        ])),
    );
    assert!(!verdict.valid);
    assert_eq!(verdict.errors, vec!["Missing required structure: ForStatement"]);
}

#[test]
fn test_any_of_passing_alternative_yields_clean_verdict() {
    let verdict = kata_engine::validate_structure(
        "while (x) { }",
        &rules(json!([{
            "type": "anyOf",
            "rules": [
                { "type": "structure", "nodeType": "ForStatement" },
                { "type": "structure", "nodeType": "WhileStatement" }
            ]
        }])),
    );
    assert!(verdict.valid);
    assert!(verdict.errors.is_empty());
}

#[test]
fn test_validation_failure_prevents_execution() {
    let err = Harness::new()
        .run_fixtures(
            "console.log(1);",
            &fixtures(json!([{ "input": [], "output": ["1"] }])),
            &[],
            Some(&rules(json!([
                { "type": "structure", "nodeType": "WhileStatement" }
            ]))),
            None,
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required structure: WhileStatement"
    );
}

#[test]
fn test_patterns_run_after_structural_rules() {
    let patterns = Patterns {
        required: vec![r"console\.log".to_string()],
        forbidden: vec![r"while".to_string()],
    };
    let report = Harness::new()
        .run_fixtures(
            "console.log(1);",
            &fixtures(json!([{ "input": [], "output": ["1"] }])),
            &[],
            None,
            Some(&patterns),
        )
        .unwrap();
    assert!(report.all_passed);

    let err = Harness::new()
        .run_fixtures("while (x) {}", &[], &[], None, Some(&patterns))
        .unwrap_err();
    assert_eq!(err.to_string(), r"Code must contain pattern: console\.log");
}

// ══════════════════════════════════════════════════════════════════════════════
// Output comparison
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_comparison_is_exact_and_ordered() {
    // trailing space fails
    let report = run(
        r#"console.log("3 ");"#,
        json!([{ "input": [], "output": ["3"] }]),
        &[],
        None,
    );
    assert!(!report.all_passed);

    // wrong order fails
    let report = run(
        r#"console.log("b"); console.log("a");"#,
        json!([{ "input": [], "output": ["a", "b"] }]),
        &[],
        None,
    );
    assert!(!report.all_passed);

    // numeric expected output normalizes to the same strings
    let report = run(
        "console.log(1 + 2);",
        json!([{ "input": [], "output": [3] }]),
        &[],
        None,
    );
    assert!(report.all_passed);
}

#[test]
fn test_non_ascii_output_compares_equal() {
    let report = run(
        r#"console.log("héllo");"#,
        json!([{ "input": [], "output": ["héllo"] }]),
        &[],
        None,
    );
    assert!(report.all_passed, "{:?}", report.results[0].actual);
}

#[test]
fn test_object_output_round_trips_through_serialization() {
    let report = run(
        r#"console.log({ name: "Ada", ok: true });"#,
        json!([{ "input": [], "output": [r#"{"name":"Ada","ok":true}"#] }]),
        &[],
        None,
    );
    assert!(report.all_passed);
}

#[test]
fn test_runtime_error_marks_fixture_without_stopping_attempt() {
    let report = run(
        "console.log(x.missing.deeper);",
        json!([
            { "input": [{}], "output": ["?"] },
            { "input": [{ "missing": { "deeper": 1 } }], "output": ["1"] }
        ]),
        &["x"],
        None,
    );
    assert!(report.results[0].error);
    assert!(report.results[1].passed);
    assert!(!report.all_passed);
}
