//! Evaluator and sandbox for learner programs.
//!
//! The pipeline hands this crate an already-instrumented source string;
//! [`Sandbox::execute`] parses it, binds the fixture input, runs it under
//! a [`Budget`], and returns the captured console output.

pub mod budget;
pub mod env;
pub mod error;
pub mod interp;
pub mod sandbox;
pub mod value;

pub use budget::{Budget, LoopGuard};
pub use error::EvalError;
pub use interp::Interp;
pub use sandbox::{RunOutcome, Sandbox};
pub use value::Value;
