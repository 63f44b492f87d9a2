//! Lexical scopes.
//!
//! A `ScopeStack` is a stack of frames searched innermost-first. Bindings
//! remember whether they were declared `const`, so reassignment can be
//! rejected at runtime the way a strict-mode engine does.

use crate::error::EvalError;
use crate::value::Value;
use std::collections::HashMap;

#[derive(Debug)]
struct Binding {
    value: Value,
    mutable: bool,
}

#[derive(Debug, Default)]
struct Frame {
    bindings: HashMap<String, Binding>,
}

#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    /// A stack with a single global frame.
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![Frame::default()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    pub fn pop(&mut self) {
        debug_assert!(self.frames.len() > 1, "popping the global frame");
        self.frames.pop();
    }

    /// Declare a binding in the innermost frame. Redeclaration in the same
    /// frame is an error, matching `let`/`const` semantics.
    pub fn declare(
        &mut self,
        name: &str,
        value: Value,
        mutable: bool,
    ) -> Result<(), EvalError> {
        let frame = self
            .frames
            .last_mut()
            .ok_or_else(|| EvalError::runtime("no active scope"))?;
        if frame.bindings.contains_key(name) {
            return Err(EvalError::runtime(format!(
                "Identifier '{name}' has already been declared"
            )));
        }
        frame.bindings.insert(name.to_string(), Binding { value, mutable });
        Ok(())
    }

    /// Declare into the innermost frame, overwriting any existing binding.
    /// Used for host globals and function parameters.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame
                .bindings
                .insert(name.to_string(), Binding { value, mutable: true });
        }
    }

    pub fn get(&self, name: &str) -> Result<Value, EvalError> {
        for frame in self.frames.iter().rev() {
            if let Some(binding) = frame.bindings.get(name) {
                return Ok(binding.value.clone());
            }
        }
        Err(EvalError::runtime(format!("{name} is not defined")))
    }

    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        for frame in self.frames.iter_mut().rev() {
            if let Some(binding) = frame.bindings.get_mut(name) {
                if !binding.mutable {
                    return Err(EvalError::runtime(format!(
                        "Assignment to constant variable '{name}'"
                    )));
                }
                binding.value = value;
                return Ok(());
            }
        }
        Err(EvalError::runtime(format!("{name} is not defined")))
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
