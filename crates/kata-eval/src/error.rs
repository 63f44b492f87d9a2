//! Runtime error channel.
//!
//! Control flow that unwinds through statement evaluation (`return`,
//! `break`, `continue`) rides the same channel as genuine runtime errors,
//! so loop and call frames can intercept their own signals and everything
//! else propagates with `?`.

use crate::value::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    /// A genuine runtime fault, surfaced to the harness with its message.
    #[error("{0}")]
    Runtime(String),

    /// The loop guard tripped its wall-clock budget.
    #[error("Infinite loop detected (execution time limit exceeded)")]
    TimeLimit,

    /// The loop guard tripped its iteration ceiling.
    #[error("Infinite loop detected (iteration limit exceeded)")]
    IterationLimit,

    /// Call depth exceeded the sandbox ceiling.
    #[error("Maximum call stack size exceeded")]
    StackOverflow,

    // Control-flow signals. Intercepted by the owning frame; reaching the
    // top level means the source used them outside any valid context.
    #[error("Illegal return statement")]
    Return(Value),

    #[error("Illegal break statement")]
    Break,

    #[error("Illegal continue statement")]
    Continue,
}

impl EvalError {
    pub fn runtime(msg: impl Into<String>) -> Self {
        EvalError::Runtime(msg.into())
    }

    /// True for the two budget-exhaustion variants.
    pub fn is_budget_trip(&self) -> bool {
        matches!(self, EvalError::TimeLimit | EvalError::IterationLimit)
    }
}
