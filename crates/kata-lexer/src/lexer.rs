//! Core kata lexer — converts learner source text to a token stream.
//!
//! Features:
//! - All subset tokens (17 reserved words, operators, punctuation, literals)
//! - Single- and double-quoted strings with escapes; string and template
//!   content may contain any Unicode character
//! - Backtick template literals with `${expr}` via a mode stack
//! - `//` and `/* */` comments stripped
//! - Line-break bookkeeping on tokens for the parser's statement-boundary
//!   inference
//!
//! The lexer fails fast: the first error aborts the scan, because the
//! engine contract surfaces exactly one syntax diagnostic verbatim.

use kata_types::{Span, SyntaxError};

use crate::token::{Token, TokenKind};

/// Lexer mode — tracks whether we're scanning top-level code or inside
/// a template literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Normal code scanning.
    Normal,
    /// Inside a template literal — scanning text until `` ` `` or `${`.
    Template,
    /// Inside a `${...}` interpolation expression. The `u32` tracks the
    /// brace depth so we know when the interpolation's closing `}` is
    /// reached.
    Interpolation { brace_depth: u32 },
}

/// The kata lexer.
///
/// Converts source text into a vector of [`Token`]s, stopping at the first
/// error.
pub struct Lexer<'src> {
    /// The full source text as bytes.
    source: &'src [u8],
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Mode stack for template interpolation.
    mode_stack: Vec<Mode>,
    /// Set when whitespace skipped since the last token contained `\n`.
    saw_newline: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
            mode_stack: vec![Mode::Normal],
            saw_newline: false,
        }
    }

    /// Lex the entire source into a token stream ending with
    /// [`TokenKind::Eof`].
    pub fn lex(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();

        loop {
            let mut token = match self.current_mode() {
                Mode::Normal | Mode::Interpolation { .. } => self.scan_normal()?,
                Mode::Template => self.scan_template_continuation()?,
            };
            token.newline_before = std::mem::take(&mut self.saw_newline);

            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    // ─────────────────────────────────────────────────────────────
    // Mode stack helpers
    // ─────────────────────────────────────────────────────────────

    fn current_mode(&self) -> Mode {
        *self.mode_stack.last().unwrap_or(&Mode::Normal)
    }

    fn push_mode(&mut self, mode: Mode) {
        self.mode_stack.push(mode);
    }

    fn pop_mode(&mut self) {
        if self.mode_stack.len() > 1 {
            self.mode_stack.pop();
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Consume the full UTF-8 character at the current position.
    ///
    /// `source` came from a `&str`, so as long as multi-byte characters are
    /// always consumed whole, `pos` stays on a character boundary and the
    /// decode cannot fail.
    fn advance_char(&mut self) -> Option<char> {
        let lead = self.peek()?;
        if lead < 0x80 {
            return self.advance().map(|b| b as char);
        }
        let len = match lead {
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            _ => 4,
        };
        let bytes = self.source.get(self.pos..self.pos + len)?;
        let ch = std::str::from_utf8(bytes).ok()?.chars().next()?;
        self.pos += len;
        self.col += 1;
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn current_span(&self) -> Span {
        Span::point(self.pos, self.line, self.col)
    }

    fn span_from(&self, mark: Mark) -> Span {
        Span::new(mark.pos, self.pos, mark.line, mark.col)
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            col: self.col,
        }
    }

    fn error(&self, message: impl Into<String>, span: Span) -> SyntaxError {
        SyntaxError::new(message, span)
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip whitespace and comments, recording any line break for the next
    /// token's `newline_before` flag.
    fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') => {
                    self.advance();
                }
                Some(b'\n') => {
                    self.saw_newline = true;
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(ch) = self.peek() {
                        if ch == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start = self.mark();
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            None => {
                                return Err(self.error(
                                    "Unterminated comment",
                                    self.span_from(start),
                                ));
                            }
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(b'\n') => {
                                self.saw_newline = true;
                                self.advance();
                            }
                            _ => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    // Normal-mode scanning
    // ─────────────────────────────────────────────────────────────

    /// Scan one token in normal (non-template) mode.
    fn scan_normal(&mut self) -> Result<Token, SyntaxError> {
        self.skip_trivia()?;

        if self.at_end() {
            // EOF inside a template or interpolation is an error
            if self
                .mode_stack
                .iter()
                .any(|m| matches!(m, Mode::Template | Mode::Interpolation { .. }))
            {
                return Err(self.error("Unterminated template literal", self.current_span()));
            }
            return Ok(Token::new(TokenKind::Eof, self.current_span()));
        }

        let start = self.mark();

        // Non-ASCII appears only inside string and template literals;
        // anywhere else it is an error, reported as the whole character.
        if self.peek().is_some_and(|b| b >= 0x80) {
            let ch = self.advance_char().unwrap_or(char::REPLACEMENT_CHARACTER);
            return Err(self.error(
                format!("Unexpected character '{ch}'"),
                self.span_from(start),
            ));
        }

        let ch = self.advance().unwrap_or(0);

        let token = match ch {
            // ── String literals ──
            b'"' | b'\'' => self.scan_string(ch, start)?,

            // ── Template literal ──
            b'`' => return self.scan_template_open(start),

            // ── Number literal ──
            b'0'..=b'9' => self.scan_number(start)?,

            // ── Identifiers & keywords ──
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => self.scan_identifier(start),

            // ── Operators & punctuation ──
            b'+' => match self.peek() {
                Some(b'+') => {
                    self.advance();
                    Token::new(TokenKind::PlusPlus, self.span_from(start))
                }
                Some(b'=') => {
                    self.advance();
                    Token::new(TokenKind::PlusEq, self.span_from(start))
                }
                _ => Token::new(TokenKind::Plus, self.span_from(start)),
            },
            b'-' => match self.peek() {
                Some(b'-') => {
                    self.advance();
                    Token::new(TokenKind::MinusMinus, self.span_from(start))
                }
                Some(b'=') => {
                    self.advance();
                    Token::new(TokenKind::MinusEq, self.span_from(start))
                }
                _ => Token::new(TokenKind::Minus, self.span_from(start)),
            },
            b'*' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::StarEq, self.span_from(start))
                } else {
                    Token::new(TokenKind::Star, self.span_from(start))
                }
            }
            b'/' => {
                // `//` and `/*` were consumed as trivia, so bare / is division
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::SlashEq, self.span_from(start))
                } else {
                    Token::new(TokenKind::Slash, self.span_from(start))
                }
            }
            b'%' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::PercentEq, self.span_from(start))
                } else {
                    Token::new(TokenKind::Percent, self.span_from(start))
                }
            }
            b'=' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    if self.peek() == Some(b'=') {
                        self.advance();
                        Token::new(TokenKind::EqEqEq, self.span_from(start))
                    } else {
                        Token::new(TokenKind::EqEq, self.span_from(start))
                    }
                } else {
                    Token::new(TokenKind::Eq, self.span_from(start))
                }
            }
            b'!' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    if self.peek() == Some(b'=') {
                        self.advance();
                        Token::new(TokenKind::BangEqEq, self.span_from(start))
                    } else {
                        Token::new(TokenKind::BangEq, self.span_from(start))
                    }
                } else {
                    Token::new(TokenKind::Bang, self.span_from(start))
                }
            }
            b'<' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::LessEq, self.span_from(start))
                } else {
                    Token::new(TokenKind::Less, self.span_from(start))
                }
            }
            b'>' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::GreaterEq, self.span_from(start))
                } else {
                    Token::new(TokenKind::Greater, self.span_from(start))
                }
            }
            b'&' => {
                if self.peek() == Some(b'&') {
                    self.advance();
                    Token::new(TokenKind::AmpAmp, self.span_from(start))
                } else {
                    return Err(self.error("Unexpected character '&'", self.span_from(start)));
                }
            }
            b'|' => {
                if self.peek() == Some(b'|') {
                    self.advance();
                    Token::new(TokenKind::PipePipe, self.span_from(start))
                } else {
                    return Err(self.error("Unexpected character '|'", self.span_from(start)));
                }
            }
            b'?' => Token::new(TokenKind::Question, self.span_from(start)),
            b':' => Token::new(TokenKind::Colon, self.span_from(start)),
            b';' => Token::new(TokenKind::Semicolon, self.span_from(start)),
            b',' => Token::new(TokenKind::Comma, self.span_from(start)),
            b'.' => {
                if matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.scan_number(start)?
                } else {
                    Token::new(TokenKind::Dot, self.span_from(start))
                }
            }
            b'(' => Token::new(TokenKind::LParen, self.span_from(start)),
            b')' => Token::new(TokenKind::RParen, self.span_from(start)),
            b'[' => Token::new(TokenKind::LBracket, self.span_from(start)),
            b']' => Token::new(TokenKind::RBracket, self.span_from(start)),

            b'{' => {
                // If we're in interpolation mode, track brace depth
                if let Some(Mode::Interpolation { brace_depth }) = self.mode_stack.last_mut() {
                    *brace_depth += 1;
                }
                Token::new(TokenKind::LBrace, self.span_from(start))
            }
            b'}' => {
                // Check if this closes an interpolation
                if let Mode::Interpolation { brace_depth } = self.current_mode() {
                    if brace_depth == 0 {
                        // This `}` ends the interpolation — back to template mode
                        self.pop_mode();
                        self.push_mode(Mode::Template);
                        return Ok(Token::new(
                            TokenKind::InterpolationEnd,
                            self.span_from(start),
                        ));
                    }
                    if let Some(Mode::Interpolation { brace_depth }) = self.mode_stack.last_mut() {
                        *brace_depth -= 1;
                    }
                }
                Token::new(TokenKind::RBrace, self.span_from(start))
            }

            other => {
                return Err(self.error(
                    format!("Unexpected character '{}'", other as char),
                    self.span_from(start),
                ));
            }
        };

        Ok(token)
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    fn scan_number(&mut self, start: Mark) -> Result<Token, SyntaxError> {
        // First digit (or leading `.`) was already consumed
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }

        // Decimal point
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            self.advance();
            while let Some(b'0'..=b'9') = self.peek() {
                self.advance();
            }
        }

        // Exponent
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            let mut offset = 1;
            if matches!(self.peek_at(1), Some(b'+') | Some(b'-')) {
                offset = 2;
            }
            if matches!(self.peek_at(offset), Some(b'0'..=b'9')) {
                for _ in 0..=offset {
                    self.advance();
                }
                while let Some(b'0'..=b'9') = self.peek() {
                    self.advance();
                }
            }
        }

        let span = self.span_from(start);
        let text = std::str::from_utf8(&self.source[start.pos..self.pos]).unwrap_or("0");
        let value: f64 = text
            .parse()
            .map_err(|_| self.error(format!("Invalid number '{text}'"), span))?;

        Ok(Token::new(TokenKind::NumberLit(value), span))
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, start: Mark) -> Token {
        // First character was already consumed
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'$' {
                self.advance();
            } else {
                break;
            }
        }

        let span = self.span_from(start);
        let text = std::str::from_utf8(&self.source[start.pos..self.pos]).unwrap_or("");

        let kind = TokenKind::from_keyword(text)
            .unwrap_or_else(|| TokenKind::Identifier(text.to_string()));

        Token::new(kind, span)
    }

    // ─────────────────────────────────────────────────────────────
    // String literals
    // ─────────────────────────────────────────────────────────────

    /// Scan a quoted string after its opening quote.
    fn scan_string(&mut self, quote: u8, start: Mark) -> Result<Token, SyntaxError> {
        let mut buf = String::new();

        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(
                        self.error("Unterminated string literal", self.span_from(start))
                    );
                }
                Some(b'\\') => {
                    self.advance();
                    match self.peek() {
                        None => {
                            return Err(self.error(
                                "Unterminated string literal",
                                self.span_from(start),
                            ));
                        }
                        Some(esc) if esc < 0x80 => {
                            self.advance();
                            buf.push(unescape(esc));
                        }
                        // escaped non-ASCII stands for itself
                        Some(_) => {
                            if let Some(ch) = self.advance_char() {
                                buf.push(ch);
                            }
                        }
                    }
                }
                Some(ch) if ch == quote => {
                    self.advance();
                    return Ok(Token::new(
                        TokenKind::StringLiteral(buf),
                        self.span_from(start),
                    ));
                }
                Some(_) => {
                    if let Some(ch) = self.advance_char() {
                        buf.push(ch);
                    }
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Template literals & interpolation
    // ─────────────────────────────────────────────────────────────

    /// Scan a template literal after its opening backtick.
    ///
    /// A template with no interpolation produces a single
    /// [`TokenKind::TemplateString`]; otherwise a [`TokenKind::TemplateStart`]
    /// is emitted and the lexer switches into interpolation mode (the `${`
    /// token is produced by the next scan).
    fn scan_template_open(&mut self, start: Mark) -> Result<Token, SyntaxError> {
        let (text, ended) = self.scan_template_text(start)?;
        if ended {
            Ok(Token::new(TokenKind::TemplateString(text), self.span_from(start)))
        } else {
            // Stopped at `${` — consume it and enter interpolation mode
            self.advance();
            self.advance();
            self.push_mode(Mode::Interpolation { brace_depth: 0 });
            Ok(Token::new(TokenKind::TemplateStart(text), self.span_from(start)))
        }
    }

    /// Scan template text after an interpolation closed.
    fn scan_template_continuation(&mut self) -> Result<Token, SyntaxError> {
        let start = self.mark();
        let (text, ended) = self.scan_template_text(start)?;
        if ended {
            self.pop_mode();
            Ok(Token::new(TokenKind::TemplateEnd(text), self.span_from(start)))
        } else {
            self.advance();
            self.advance();
            // Swap the Template mode for Interpolation; the closing `}`
            // swaps it back.
            self.pop_mode();
            self.push_mode(Mode::Interpolation { brace_depth: 0 });
            Ok(Token::new(TokenKind::TemplatePart(text), self.span_from(start)))
        }
    }

    /// Consume template text up to a closing backtick (`true`) or a `${`
    /// (`false`, not yet consumed). Newlines are legal inside templates.
    fn scan_template_text(&mut self, start: Mark) -> Result<(String, bool), SyntaxError> {
        let mut buf = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(
                        self.error("Unterminated template literal", self.span_from(start))
                    );
                }
                Some(b'`') => {
                    self.advance();
                    return Ok((buf, true));
                }
                Some(b'$') if self.peek_at(1) == Some(b'{') => {
                    return Ok((buf, false));
                }
                Some(b'\\') => {
                    self.advance();
                    match self.peek() {
                        None => {
                            return Err(self.error(
                                "Unterminated template literal",
                                self.span_from(start),
                            ));
                        }
                        Some(esc) if esc < 0x80 => {
                            self.advance();
                            buf.push(unescape(esc));
                        }
                        Some(_) => {
                            if let Some(ch) = self.advance_char() {
                                buf.push(ch);
                            }
                        }
                    }
                }
                Some(_) => {
                    if let Some(ch) = self.advance_char() {
                        buf.push(ch);
                    }
                }
            }
        }
    }
}

/// A saved lexer position.
#[derive(Debug, Clone, Copy)]
struct Mark {
    pos: usize,
    line: u32,
    col: u32,
}

/// Resolve a backslash escape to its character.
fn unescape(esc: u8) -> char {
    match esc {
        b'n' => '\n',
        b't' => '\t',
        b'r' => '\r',
        b'0' => '\0',
        other => other as char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .lex()
            .expect("lex should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_declaration() {
        assert_eq!(
            kinds("let age = 18;"),
            vec![
                TokenKind::Let,
                TokenKind::Identifier("age".to_string()),
                TokenKind::Eq,
                TokenKind::NumberLit(18.0),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_three_char_operators() {
        assert_eq!(
            kinds("a === b !== c"),
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::EqEqEq,
                TokenKind::Identifier("b".to_string()),
                TokenKind::BangEqEq,
                TokenKind::Identifier("c".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_update_operators() {
        assert_eq!(
            kinds("i++ --j"),
            vec![
                TokenKind::Identifier("i".to_string()),
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::Identifier("j".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_quotes_and_escapes() {
        assert_eq!(
            kinds(r#"'a' "b\n""#),
            vec![
                TokenKind::StringLiteral("a".to_string()),
                TokenKind::StringLiteral("b\n".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string_fails() {
        assert!(Lexer::new("\"oops").lex().is_err());
    }

    #[test]
    fn test_plain_template() {
        assert_eq!(
            kinds("`hello`"),
            vec![TokenKind::TemplateString("hello".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_interpolated_template() {
        assert_eq!(
            kinds("`a ${x} b`"),
            vec![
                TokenKind::TemplateStart("a ".to_string()),
                TokenKind::Identifier("x".to_string()),
                TokenKind::InterpolationEnd,
                TokenKind::TemplateEnd(" b".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_template_with_nested_braces() {
        assert_eq!(
            kinds("`v: ${ {a: 1}.a }`"),
            vec![
                TokenKind::TemplateStart("v: ".to_string()),
                TokenKind::LBrace,
                TokenKind::Identifier("a".to_string()),
                TokenKind::Colon,
                TokenKind::NumberLit(1.0),
                TokenKind::RBrace,
                TokenKind::Dot,
                TokenKind::Identifier("a".to_string()),
                TokenKind::InterpolationEnd,
                TokenKind::TemplateEnd("".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_template_multiple_interpolations() {
        assert_eq!(
            kinds("`${a}${b}`"),
            vec![
                TokenKind::TemplateStart("".to_string()),
                TokenKind::Identifier("a".to_string()),
                TokenKind::InterpolationEnd,
                TokenKind::TemplatePart("".to_string()),
                TokenKind::Identifier("b".to_string()),
                TokenKind::InterpolationEnd,
                TokenKind::TemplateEnd("".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_trivia() {
        assert_eq!(
            kinds("1 // line\n/* block\nstill */ 2"),
            vec![TokenKind::NumberLit(1.0), TokenKind::NumberLit(2.0), TokenKind::Eof]
        );
    }

    #[test]
    fn test_newline_before_flag() {
        let tokens = Lexer::new("a\nb c").lex().expect("lex should succeed");
        assert!(!tokens[0].newline_before);
        assert!(tokens[1].newline_before);
        assert!(!tokens[2].newline_before);
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(
            kinds("3 3.5 .25 1e3"),
            vec![
                TokenKind::NumberLit(3.0),
                TokenKind::NumberLit(3.5),
                TokenKind::NumberLit(0.25),
                TokenKind::NumberLit(1000.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_byte_offsets() {
        let tokens = Lexer::new("while (true) {}").lex().expect("lex should succeed");
        assert_eq!(tokens[0].span.start, 0);
        assert_eq!(tokens[0].span.end, 5);
        // `{` sits at byte 13
        let brace = tokens.iter().find(|t| t.kind == TokenKind::LBrace).unwrap();
        assert_eq!(brace.span.start, 13);
    }

    #[test]
    fn test_non_ascii_string_content() {
        assert_eq!(
            kinds("\"héllo\" 'こん' `🎉 ${x}`"),
            vec![
                TokenKind::StringLiteral("héllo".to_string()),
                TokenKind::StringLiteral("こん".to_string()),
                TokenKind::TemplateStart("🎉 ".to_string()),
                TokenKind::Identifier("x".to_string()),
                TokenKind::InterpolationEnd,
                TokenKind::TemplateEnd("".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_escaped_non_ascii_stands_for_itself() {
        assert_eq!(
            kinds(r#""\é""#),
            vec![TokenKind::StringLiteral("é".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_non_ascii_outside_string_fails_whole_char() {
        let err = Lexer::new("let é = 1;").lex().unwrap_err();
        assert!(err.message.contains('é'), "{}", err.message);
    }

    #[test]
    fn test_dollar_identifiers() {
        assert_eq!(
            kinds("_checkLoop $x"),
            vec![
                TokenKind::Identifier("_checkLoop".to_string()),
                TokenKind::Identifier("$x".to_string()),
                TokenKind::Eof,
            ]
        );
    }
}
