//! Code assessment engine for lesson challenges.
//!
//! Takes learner source text and lesson-declared requirements, and
//! answers: does the code have the required structure, and does it print
//! the right things for every test fixture?
//!
//! Pipeline: parse → structural validation ([`validate_structure`]) →
//! loop-guard instrumentation ([`protect::instrument`]) → sandboxed
//! execution per fixture → output comparison ([`Harness::run_fixtures`]).
//! All diagnostics are plain strings for the caller to display; this
//! crate has no UI, network, or persistence surface.

pub mod fixture;
pub mod harness;
pub mod patterns;
pub mod protect;

pub use fixture::{RunReport, TestFixture, TestResult};
pub use harness::{EngineError, Harness};
pub use kata_eval::Budget;
pub use kata_validate::{Rule, ValidationResult};
pub use patterns::Patterns;

/// Validate `source` against structural rules.
///
/// A source that does not parse is invalid with a single syntax
/// diagnostic; rules are otherwise checked in order, fail-fast.
pub fn validate_structure(source: &str, rules: &[Rule]) -> ValidationResult {
    match kata_parser::parse(source) {
        Ok(program) => kata_validate::validate(&program, rules),
        Err(e) => ValidationResult::fail(format!("Syntax Error: {}", e.message)),
    }
}
