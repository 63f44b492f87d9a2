//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest):
//! 10. assignment `=`, `+=`, `-=`, `*=`, `/=`, `%=` (right-assoc)
//! 9. ternary `?:`
//! 8. `||`
//! 7. `&&`
//! 6. `==`, `!=`, `===`, `!==`
//! 5. `<`, `>`, `<=`, `>=`
//! 4. `+`, `-`
//! 3. `*`, `/`, `%`
//! 2. unary `-`, `+`, `!`, prefix `++`/`--`
//! 1. postfix `++`/`--`, `.` / `[]` member access, `()` call

use kata_lexer::TokenKind;
use kata_types::ast::*;
use kata_types::SyntaxError;

use crate::parser::Parser;

impl Parser {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_assignment()
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `AssignExpr = CondExpr [ AssignOp AssignExpr ]`
    fn parse_assignment(&mut self) -> Result<Expr, SyntaxError> {
        let left = self.parse_conditional()?;

        let operator = match self.peek_kind() {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::AddAssign,
            TokenKind::MinusEq => AssignOp::SubAssign,
            TokenKind::StarEq => AssignOp::MulAssign,
            TokenKind::SlashEq => AssignOp::DivAssign,
            TokenKind::PercentEq => AssignOp::ModAssign,
            _ => return Ok(left),
        };

        if !matches!(
            left.kind,
            ExprKind::Identifier(_) | ExprKind::Member { .. }
        ) {
            return Err(SyntaxError::new(
                "Invalid assignment target",
                left.span,
            ));
        }

        self.advance(); // consume operator
        let right = self.parse_assignment()?; // right-assoc
        let span = left.span.merge(right.span);
        Ok(Expr::new(
            ExprKind::Assignment {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        ))
    }

    /// `CondExpr = OrExpr [ "?" AssignExpr ":" AssignExpr ]`
    fn parse_conditional(&mut self) -> Result<Expr, SyntaxError> {
        let test = self.parse_or()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let consequent = self.parse_assignment()?;
        self.expect(&TokenKind::Colon, "':'")?;
        let alternate = self.parse_assignment()?;
        let span = test.span.merge(alternate.span);
        Ok(Expr::new(
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
        ))
    }

    /// `OrExpr = AndExpr { "||" AndExpr }`
    fn parse_or(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::PipePipe) {
            let right = self.parse_and()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Logical {
                    operator: LogicalOp::Or,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `AndExpr = EqExpr { "&&" EqExpr }`
    fn parse_and(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_equality()?;
        while self.eat(&TokenKind::AmpAmp) {
            let right = self.parse_equality()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Logical {
                    operator: LogicalOp::And,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `EqExpr = RelExpr { ("=="|"!="|"==="|"!==") RelExpr }`
    fn parse_equality(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_relational()?;
        loop {
            let operator = match self.peek_kind() {
                TokenKind::EqEq => BinOp::EqLoose,
                TokenKind::BangEq => BinOp::NotEqLoose,
                TokenKind::EqEqEq => BinOp::EqStrict,
                TokenKind::BangEqEq => BinOp::NotEqStrict,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `RelExpr = AddExpr { ("<"|">"|"<="|">=") AddExpr }`
    fn parse_relational(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_additive()?;
        loop {
            let operator = match self.peek_kind() {
                TokenKind::Less => BinOp::Less,
                TokenKind::Greater => BinOp::Greater,
                TokenKind::LessEq => BinOp::LessEq,
                TokenKind::GreaterEq => BinOp::GreaterEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `AddExpr = MulExpr { ("+"|"-") MulExpr }`
    fn parse_additive(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let operator = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `MulExpr = UnaryExpr { ("*"|"/"|"%") UnaryExpr }`
    fn parse_multiplicative(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_unary()?;
        loop {
            let operator = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `UnaryExpr = ("-"|"+"|"!"|"++"|"--") UnaryExpr | PostfixExpr`
    fn parse_unary(&mut self) -> Result<Expr, SyntaxError> {
        let operator = match self.peek_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Pos),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(operator) = operator {
            let start = self.advance().span;
            let argument = self.parse_unary()?;
            let span = start.merge(argument.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    operator,
                    argument: Box::new(argument),
                },
                span,
            ));
        }

        let update = match self.peek_kind() {
            TokenKind::PlusPlus => Some(UpdateOp::Increment),
            TokenKind::MinusMinus => Some(UpdateOp::Decrement),
            _ => None,
        };
        if let Some(operator) = update {
            let start = self.advance().span;
            let argument = self.parse_unary()?;
            self.check_update_target(&argument)?;
            let span = start.merge(argument.span);
            return Ok(Expr::new(
                ExprKind::Update {
                    operator,
                    prefix: true,
                    argument: Box::new(argument),
                },
                span,
            ));
        }

        self.parse_postfix()
    }

    /// `PostfixExpr = CallExpr [ "++" | "--" ]`
    fn parse_postfix(&mut self) -> Result<Expr, SyntaxError> {
        let expr = self.parse_call_member()?;
        let operator = match self.peek_kind() {
            TokenKind::PlusPlus => UpdateOp::Increment,
            TokenKind::MinusMinus => UpdateOp::Decrement,
            _ => return Ok(expr),
        };
        // A line break before `++`/`--` ends the statement instead (ASI).
        if self.peek().newline_before {
            return Ok(expr);
        }
        self.check_update_target(&expr)?;
        let end = self.advance().span;
        let span = expr.span.merge(end);
        Ok(Expr::new(
            ExprKind::Update {
                operator,
                prefix: false,
                argument: Box::new(expr),
            },
            span,
        ))
    }

    fn check_update_target(&self, target: &Expr) -> Result<(), SyntaxError> {
        if matches!(
            target.kind,
            ExprKind::Identifier(_) | ExprKind::Member { .. }
        ) {
            Ok(())
        } else {
            Err(SyntaxError::new(
                "Invalid update expression target",
                target.span,
            ))
        }
    }

    /// `CallExpr = PrimaryExpr { "." Ident | "[" Expr "]" | "(" Args ")" }`
    fn parse_call_member(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let prop = self.parse_ident("a property name")?;
                    let span = expr.span.merge(prop.span);
                    let property = Expr::new(ExprKind::Identifier(prop.name), prop.span);
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property: Box::new(property),
                            computed: false,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let property = self.parse_expression()?;
                    let end = self.expect(&TokenKind::RBracket, "']'")?.span;
                    let span = expr.span.merge(end);
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property: Box::new(property),
                            computed: true,
                        },
                        span,
                    );
                }
                TokenKind::LParen => {
                    self.advance();
                    let mut arguments = Vec::new();
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            arguments.push(self.parse_expression()?);
                            if !self.eat(&TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    let end = self.expect(&TokenKind::RParen, "')'")?.span;
                    let span = expr.span.merge(end);
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            arguments,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        match self.peek_kind() {
            TokenKind::NumberLit(n) => {
                let n = *n;
                let span = self.advance().span;
                Ok(Expr::new(ExprKind::NumberLit(n), span))
            }
            TokenKind::StringLiteral(s) => {
                let s = s.clone();
                let span = self.advance().span;
                Ok(Expr::new(ExprKind::StringLit(s), span))
            }
            TokenKind::True => {
                let span = self.advance().span;
                Ok(Expr::new(ExprKind::BoolLit(true), span))
            }
            TokenKind::False => {
                let span = self.advance().span;
                Ok(Expr::new(ExprKind::BoolLit(false), span))
            }
            TokenKind::Null => {
                let span = self.advance().span;
                Ok(Expr::new(ExprKind::NullLit, span))
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Ok(Expr::new(ExprKind::Identifier(name), span))
            }
            TokenKind::TemplateString(_)
            | TokenKind::TemplateStart(_) => self.parse_template(),
            TokenKind::LParen => {
                // Parenthesized group — the inner expression is returned
                // directly, acorn-style (no Paren node).
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_object(),
            _ => Err(self.unexpected()),
        }
    }

    /// `[a, b, c]`
    fn parse_array(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.advance().span;
        let mut elements = Vec::new();
        if !self.check(&TokenKind::RBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
                // trailing comma
                if self.check(&TokenKind::RBracket) {
                    break;
                }
            }
        }
        let end = self.expect(&TokenKind::RBracket, "']'")?.span;
        Ok(Expr::new(
            ExprKind::Array { elements },
            start.merge(end),
        ))
    }

    /// `{ key: value, "quoted": value, 1: value }`
    fn parse_object(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.advance().span;
        let mut properties = Vec::new();
        if !self.check(&TokenKind::RBrace) {
            loop {
                let (key, key_span) = match self.peek_kind() {
                    TokenKind::Identifier(name) => {
                        let key = name.clone();
                        (key, self.advance().span)
                    }
                    TokenKind::StringLiteral(s) => {
                        let key = s.clone();
                        (key, self.advance().span)
                    }
                    TokenKind::NumberLit(n) => {
                        let key = kata_types::jsfmt::format_number(*n);
                        (key, self.advance().span)
                    }
                    _ => return Err(self.expected("a property key")),
                };
                self.expect(&TokenKind::Colon, "':'")?;
                let value = self.parse_expression()?;
                let span = key_span.merge(value.span);
                properties.push(Property { key, value, span });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
                if self.check(&TokenKind::RBrace) {
                    break;
                }
            }
        }
        let end = self.expect(&TokenKind::RBrace, "'}'")?.span;
        Ok(Expr::new(
            ExprKind::Object { properties },
            start.merge(end),
        ))
    }

    /// Template literals, plain or interpolated.
    ///
    /// Token shapes (from the lexer's mode stack):
    /// - `TemplateString("a")` — no interpolation
    /// - `TemplateStart("a ")` expr `InterpolationEnd` (`TemplatePart(" b ")`
    ///   expr `InterpolationEnd`)* `TemplateEnd(" c")`
    fn parse_template(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.advance();
        let start = token.span;
        match token.kind {
            TokenKind::TemplateString(text) => Ok(Expr::new(
                ExprKind::TemplateLiteral {
                    quasis: vec![text],
                    expressions: Vec::new(),
                },
                start,
            )),
            TokenKind::TemplateStart(first) => {
                let mut quasis = vec![first];
                let mut expressions = Vec::new();
                loop {
                    expressions.push(self.parse_expression()?);
                    self.expect(&TokenKind::InterpolationEnd, "'}'")?;
                    match self.peek_kind() {
                        TokenKind::TemplatePart(text) => {
                            quasis.push(text.clone());
                            self.advance();
                        }
                        TokenKind::TemplateEnd(text) => {
                            quasis.push(text.clone());
                            let end = self.advance().span;
                            return Ok(Expr::new(
                                ExprKind::TemplateLiteral { quasis, expressions },
                                start.merge(end),
                            ));
                        }
                        _ => return Err(self.expected("template text")),
                    }
                }
            }
            _ => Err(SyntaxError::new("Unexpected token", start)),
        }
    }
}
