//! Execution budgets.
//!
//! The instrumented guard call lands at the top of every loop body; each
//! call ticks a counter. Wall-clock time is only sampled once the counter
//! passes `check_after`, keeping the common case to an integer compare.

use crate::error::EvalError;
use std::time::Instant;

/// Limits applied to one sandbox run.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    /// Iterations before the elapsed-time check starts firing.
    pub check_after: u64,
    /// Wall-clock ceiling in milliseconds.
    pub timeout_ms: u64,
    /// Hard ceiling on guard ticks, independent of time.
    pub max_iterations: u64,
}

impl Default for Budget {
    fn default() -> Self {
        Budget {
            check_after: 10_000,
            timeout_ms: 2_000,
            max_iterations: 1_000_000,
        }
    }
}

/// Per-run guard state. Created fresh for each sandbox execution so budgets
/// never leak across fixtures.
#[derive(Debug)]
pub struct LoopGuard {
    budget: Budget,
    ticks: u64,
    started: Instant,
}

impl LoopGuard {
    pub fn new(budget: Budget) -> Self {
        LoopGuard {
            budget,
            ticks: 0,
            started: Instant::now(),
        }
    }

    /// Record one loop iteration. The time check runs first, so slow loops
    /// trip on elapsed time; tight fast loops hit the iteration ceiling.
    pub fn tick(&mut self) -> Result<(), EvalError> {
        self.ticks += 1;
        if self.ticks > self.budget.check_after
            && self.started.elapsed().as_millis() as u64 > self.budget.timeout_ms
        {
            return Err(EvalError::TimeLimit);
        }
        if self.ticks > self.budget.max_iterations {
            return Err(EvalError::IterationLimit);
        }
        Ok(())
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_budget_passes() {
        let mut guard = LoopGuard::new(Budget::default());
        for _ in 0..1_000 {
            guard.tick().unwrap();
        }
        assert_eq!(guard.ticks(), 1_000);
    }

    #[test]
    fn test_iteration_ceiling_trips() {
        let mut guard = LoopGuard::new(Budget {
            check_after: 10,
            timeout_ms: 60_000,
            max_iterations: 100,
        });
        let mut tripped = None;
        for _ in 0..200 {
            if let Err(e) = guard.tick() {
                tripped = Some(e);
                break;
            }
        }
        assert!(matches!(tripped, Some(EvalError::IterationLimit)));
        // trips exactly one past the ceiling
        assert_eq!(guard.ticks(), 101);
    }

    #[test]
    fn test_time_check_skipped_below_threshold() {
        // timeout of zero would trip instantly, but the counter never
        // reaches check_after so time is never sampled
        let mut guard = LoopGuard::new(Budget {
            check_after: 1_000,
            timeout_ms: 0,
            max_iterations: 1_000_000,
        });
        for _ in 0..500 {
            guard.tick().unwrap();
        }
    }

    #[test]
    fn test_time_limit_trips_past_threshold() {
        let mut guard = LoopGuard::new(Budget {
            check_after: 10,
            timeout_ms: 0,
            max_iterations: 1_000_000,
        });
        let mut tripped = None;
        for _ in 0..20 {
            if let Err(e) = guard.tick() {
                tripped = Some(e);
                break;
            }
        }
        assert!(matches!(tripped, Some(EvalError::TimeLimit)));
    }
}
