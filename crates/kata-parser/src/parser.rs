//! Core parser infrastructure: token cursor, error reporting, helpers.

use kata_lexer::{Token, TokenKind};
use kata_types::{Span, SyntaxError};

/// The kata parser.
///
/// Consumes a token stream produced by the lexer and builds an AST. Fails
/// fast: the first syntax error aborts the parse, since the engine surfaces
/// exactly one diagnostic.
pub struct Parser {
    /// The token stream (always ends with `Eof`).
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
}

impl Parser {
    /// Create a new parser from a token stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| {
            self.tokens
                .last()
                .expect("token stream should end with Eof")
        })
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::point(0, 1, 1)
        }
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind (by discriminant).
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(kind)
    }

    /// Consume the current token if it matches; returns whether it did.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the given kind or fail with an expectation message.
    pub(crate) fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Token, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.expected(what))
        }
    }

    /// Build an "expected X" error at the current token.
    pub(crate) fn expected(&self, what: &str) -> SyntaxError {
        SyntaxError::new(
            format!("Expected {what} but found {}", self.peek_kind().describe()),
            self.current_span(),
        )
    }

    /// Build an "unexpected token" error at the current token.
    pub(crate) fn unexpected(&self) -> SyntaxError {
        SyntaxError::new(
            format!("Unexpected token {}", self.peek_kind().describe()),
            self.current_span(),
        )
    }

    /// Consume a statement terminator.
    ///
    /// Accepts an explicit `;`; otherwise a boundary is inferred when the
    /// next token starts a new line, closes a block, or is end of input
    /// (simplified automatic semicolon insertion).
    pub(crate) fn consume_statement_end(&mut self) -> Result<(), SyntaxError> {
        if self.eat(&TokenKind::Semicolon) {
            return Ok(());
        }
        let next = self.peek();
        if matches!(next.kind, TokenKind::RBrace | TokenKind::Eof) || next.newline_before {
            return Ok(());
        }
        Err(self.expected("';'"))
    }
}
