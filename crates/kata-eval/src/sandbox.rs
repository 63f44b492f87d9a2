//! Isolated execution of one instrumented program.
//!
//! Each call builds a fresh [`Interp`] with its own scope stack, guard
//! state, and output buffer, so nothing carries over between fixtures.
//! The only host surface a program sees is the globals the interpreter
//! installs (`console`, `Math`, casts, `_checkLoop`) plus the fixture
//! input bound under the lesson's parameter name.

use crate::budget::Budget;
use crate::interp::Interp;
use crate::value::Value;

/// Runs instrumented source against fixture inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sandbox {
    budget: Budget,
}

/// What one execution produced: every captured console line, plus the
/// runtime error that stopped it, if any. Output captured before a fault
/// is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub output: Vec<String>,
    pub error: Option<String>,
}

impl RunOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl Sandbox {
    pub fn new(budget: Budget) -> Self {
        Sandbox { budget }
    }

    /// Execute `source`, binding each parameter name to the input value at
    /// the same position. Missing positions bind `undefined`.
    pub fn execute(
        &self,
        source: &str,
        params: &[String],
        inputs: &[serde_json::Value],
    ) -> RunOutcome {
        let program = match kata_parser::parse(source) {
            Ok(program) => program,
            Err(e) => {
                return RunOutcome {
                    output: Vec::new(),
                    error: Some(format!("Syntax Error: {}", e.message)),
                }
            }
        };

        let mut interp = Interp::new(self.budget);
        for (i, param) in params.iter().enumerate() {
            let value = inputs.get(i).map(Value::from_json).unwrap_or(Value::Undefined);
            interp.define_global(param, value);
        }

        // control-flow signals escaping to the top surface as user errors
        // ("Illegal return statement"), same as any runtime fault
        let error = interp.run(&program).err().map(|e| e.to_string());
        RunOutcome {
            output: interp.into_output(),
            error,
        }
    }
}
