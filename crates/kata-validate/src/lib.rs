//! Structural validation of learner programs against lesson rules.
//!
//! Lesson content declares an ordered list of [`Rule`]s; [`validate`]
//! checks them against a parsed program, stopping at the first failure.

pub mod rule;
pub mod validator;

pub use rule::Rule;
pub use validator::{validate, ValidationResult};
