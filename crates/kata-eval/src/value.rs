//! Runtime values for the kata evaluator.
//!
//! Arrays and objects have JavaScript reference semantics (`Rc<RefCell<..>>`),
//! so `arr.push(..)` through one binding is visible through another. Object
//! properties keep insertion order (`IndexMap`) because `JSON.stringify`-style
//! serialization feeds straight into fixture comparison.

use indexmap::IndexMap;
use kata_types::ast::Stmt;
use kata_types::jsfmt::format_number;
use std::cell::RefCell;
use std::rc::Rc;

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<IndexMap<String, Value>>>),
    Function(Rc<FunctionObj>),
    Builtin(Builtin),
}

/// A user-declared function.
#[derive(Debug)]
pub struct FunctionObj {
    pub name: String,
    pub params: Vec<String>,
    /// The statements of the function's block body.
    pub body: Vec<Stmt>,
}

/// Host functions injected into the sandbox scope.
///
/// Closed set, dispatched exhaustively by the interpreter. `LoopGuard` is
/// the `_checkLoop` binding the guard transformer targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    ConsoleLog,
    LoopGuard,
    MathFloor,
    MathCeil,
    MathRound,
    MathAbs,
    MathSqrt,
    MathPow,
    MathMin,
    MathMax,
    /// `String(x)`
    StringCast,
    /// `Number(x)`
    NumberCast,
}

impl Value {
    pub fn array(values: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(values)))
    }

    pub fn object(fields: IndexMap<String, Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(fields)))
    }

    /// Convert a fixture input (parsed JSON) into a runtime value. Object
    /// key order is preserved end to end.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => {
                Value::array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(fields) => Value::object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// JS `typeof`-flavored name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) | Value::Builtin(_) => "function",
        }
    }

    /// JS truthiness: everything is truthy except `undefined`, `null`,
    /// `false`, `0`, `NaN`, and `""`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// `String(value)` conversion.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.clone(),
            Value::Array(items) => items
                .borrow()
                .iter()
                .map(|v| match v {
                    // Array.prototype.toString renders holes and nils empty
                    Value::Undefined | Value::Null => String::new(),
                    other => other.to_display_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(f) => format!("function {}() {{ ... }}", f.name),
            Value::Builtin(_) => "function () { [native code] }".to_string(),
        }
    }

    /// `JSON.stringify(value)` conversion. Returns `None` for values JSON
    /// cannot represent at the top level (`undefined`, functions).
    pub fn to_json_string(&self) -> Option<String> {
        match self {
            Value::Undefined | Value::Function(_) | Value::Builtin(_) => None,
            Value::Null => Some("null".to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => {
                if n.is_finite() {
                    Some(format_number(*n))
                } else {
                    Some("null".to_string())
                }
            }
            Value::Str(s) => Some(quote_json(s)),
            Value::Array(items) => {
                let parts: Vec<String> = items
                    .borrow()
                    .iter()
                    .map(|v| v.to_json_string().unwrap_or_else(|| "null".to_string()))
                    .collect();
                Some(format!("[{}]", parts.join(",")))
            }
            Value::Object(fields) => {
                let parts: Vec<String> = fields
                    .borrow()
                    .iter()
                    .filter_map(|(k, v)| {
                        v.to_json_string().map(|json| format!("{}:{json}", quote_json(k)))
                    })
                    .collect();
                Some(format!("{{{}}}", parts.join(",")))
            }
        }
    }

    /// How a value renders in captured console output: objects (including
    /// arrays and `null`) serialize as JSON, everything else via `String()`.
    pub fn console_string(&self) -> String {
        match self {
            Value::Null | Value::Array(_) | Value::Object(_) => self
                .to_json_string()
                .unwrap_or_else(|| "null".to_string()),
            other => other.to_display_string(),
        }
    }

    /// `Number(value)` conversion.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            // Single-element arrays coerce through their element; others NaN.
            Value::Array(items) => {
                let items = items.borrow();
                match items.len() {
                    0 => 0.0,
                    1 => items[0].to_number(),
                    _ => f64::NAN,
                }
            }
            Value::Object(_) | Value::Function(_) | Value::Builtin(_) => f64::NAN,
        }
    }

    /// Strict equality (`===`).
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b, // NaN !== NaN holds
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            _ => false,
        }
    }

    /// Loose equality (`==`): numeric coercion across number/string/bool,
    /// `null == undefined`, reference equality otherwise.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Undefined) | (Value::Undefined, Value::Null) => true,
            (Value::Number(_), Value::Str(_))
            | (Value::Str(_), Value::Number(_))
            | (Value::Bool(_), _)
            | (_, Value::Bool(_)) => {
                let a = self.to_number();
                let b = other.to_number();
                a == b
            }
            _ => self.strict_eq(other),
        }
    }
}

/// Quote a string as a JSON string literal.
fn quote_json(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
