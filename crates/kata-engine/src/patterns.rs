//! Regex pattern requirements.
//!
//! The older lesson format constrains source text directly with regular
//! expressions instead of structural rules. Both can be present on one
//! challenge; patterns run after structural validation.

use regex::Regex;
use serde::Deserialize;

/// Raw-text constraints on the learner's source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Patterns {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub forbidden: Vec<String>,
}

impl Patterns {
    /// Check every pattern against the source. The first violation (or
    /// unparsable pattern) is returned as a diagnostic.
    pub fn check(&self, source: &str) -> Result<(), String> {
        for pattern in &self.required {
            let regex = compile(pattern)?;
            if !regex.is_match(source) {
                return Err(format!("Code must contain pattern: {pattern}"));
            }
        }
        for pattern in &self.forbidden {
            let regex = compile(pattern)?;
            if regex.is_match(source) {
                return Err(format!("Code must not contain pattern: {pattern}"));
            }
        }
        Ok(())
    }
}

fn compile(pattern: &str) -> Result<Regex, String> {
    Regex::new(pattern).map_err(|_| format!("Invalid pattern: {pattern}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_pattern() {
        let patterns = Patterns {
            required: vec![r"for\s*\(".to_string()],
            forbidden: vec![],
        };
        assert!(patterns.check("for (let i = 0; i < 3; i++) {}").is_ok());
        assert_eq!(
            patterns.check("while (x) {}").unwrap_err(),
            r"Code must contain pattern: for\s*\("
        );
    }

    #[test]
    fn test_forbidden_pattern() {
        let patterns = Patterns {
            required: vec![],
            forbidden: vec!["eval".to_string()],
        };
        assert!(patterns.check("let x = 1;").is_ok());
        assert_eq!(
            patterns.check("eval(code)").unwrap_err(),
            "Code must not contain pattern: eval"
        );
    }

    #[test]
    fn test_invalid_pattern_is_a_diagnostic() {
        let patterns = Patterns {
            required: vec!["[".to_string()],
            forbidden: vec![],
        };
        assert_eq!(patterns.check("x").unwrap_err(), "Invalid pattern: [");
    }
}
