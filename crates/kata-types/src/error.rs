//! Shared error types for the assessment pipeline.

use crate::Span;
use serde::Serialize;
use thiserror::Error;

/// A syntax error produced by the lexer or parser.
///
/// The message text is surfaced to learners verbatim (prefixed with
/// `Syntax Error:` at the engine boundary), so it is written in their
/// terms, with the 1-based position appended the way browser engines do.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message} ({span})")]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display_includes_position() {
        let err = SyntaxError::new("Unexpected token", Span::new(4, 5, 1, 5));
        assert_eq!(err.to_string(), "Unexpected token (1:5)");
    }
}
