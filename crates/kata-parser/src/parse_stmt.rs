//! Statement parsing: declarations, control flow, loops, functions.

use kata_lexer::TokenKind;
use kata_types::ast::*;
use kata_types::SyntaxError;

use crate::parser::Parser;

impl Parser {
    /// Parse a whole program: statements until end of input.
    pub(crate) fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let start = self.current_span();
        let mut body = Vec::new();
        while !self.at_end() {
            body.push(self.parse_statement()?);
        }
        let span = match (body.first(), body.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => start,
        };
        Ok(Program { body, span })
    }

    /// Parse one statement.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, SyntaxError> {
        match self.peek_kind() {
            TokenKind::Let => self.parse_variable_declaration(DeclKind::Let),
            TokenKind::Const => self.parse_variable_declaration(DeclKind::Const),
            TokenKind::Var => self.parse_variable_declaration(DeclKind::Var),
            TokenKind::LBrace => self.parse_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Function => self.parse_function_declaration(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                let span = self.advance().span;
                self.consume_statement_end()?;
                Ok(Stmt::new(StmtKind::Break, span.merge(self.previous_span())))
            }
            TokenKind::Continue => {
                let span = self.advance().span;
                self.consume_statement_end()?;
                Ok(Stmt::new(
                    StmtKind::Continue,
                    span.merge(self.previous_span()),
                ))
            }
            TokenKind::Semicolon => {
                let span = self.advance().span;
                Ok(Stmt::new(StmtKind::Empty, span))
            }
            _ => self.parse_expression_statement(),
        }
    }

    // ── Declarations ──────────────────────────────────────────────────────────

    /// `let x = 1, y;` — the `let`/`const`/`var` keyword is current.
    fn parse_variable_declaration(&mut self, kind: DeclKind) -> Result<Stmt, SyntaxError> {
        let start = self.advance().span;
        let declarations = self.parse_declarator_list(kind)?;
        self.consume_statement_end()?;
        Ok(Stmt::new(
            StmtKind::VariableDeclaration { kind, declarations },
            start.merge(self.previous_span()),
        ))
    }

    /// One or more comma-separated declarators.
    fn parse_declarator_list(&mut self, kind: DeclKind) -> Result<Vec<Declarator>, SyntaxError> {
        let mut declarations = Vec::new();
        loop {
            let id = self.parse_ident("a variable name")?;
            let init = if self.eat(&TokenKind::Eq) {
                Some(self.parse_expression()?)
            } else if kind == DeclKind::Const {
                return Err(self.expected("'=' (const declarations need an initializer)"));
            } else {
                None
            };
            let span = match &init {
                Some(e) => id.span.merge(e.span),
                None => id.span,
            };
            declarations.push(Declarator { id, init, span });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(declarations)
    }

    /// Parse an identifier token into an [`Ident`].
    pub(crate) fn parse_ident(&mut self, what: &str) -> Result<Ident, SyntaxError> {
        match self.peek_kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Ok(Ident::new(name, span))
            }
            _ => Err(self.expected(what)),
        }
    }

    // ── Blocks & control flow ─────────────────────────────────────────────────

    /// `{ ... }` — span covers the braces (the guard transformer inserts
    /// immediately after `span.start`).
    fn parse_block(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.expect(&TokenKind::LBrace, "'{'")?.span;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(self.expected("'}'"));
            }
            body.push(self.parse_statement()?);
        }
        let end = self.advance().span; // consume `}`
        Ok(Stmt::new(StmtKind::Block { body }, start.merge(end)))
    }

    /// `if (test) consequent [else alternate]`
    fn parse_if(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.advance().span;
        self.expect(&TokenKind::LParen, "'('")?;
        let test = self.parse_expression()?;
        self.expect(&TokenKind::RParen, "')'")?;
        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Stmt::new(
            StmtKind::If {
                test,
                consequent,
                alternate,
            },
            start.merge(self.previous_span()),
        ))
    }

    /// `while (test) body`
    fn parse_while(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.advance().span;
        self.expect(&TokenKind::LParen, "'('")?;
        let test = self.parse_expression()?;
        self.expect(&TokenKind::RParen, "')'")?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::new(
            StmtKind::While { test, body },
            start.merge(self.previous_span()),
        ))
    }

    /// `do body while (test);`
    fn parse_do_while(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.advance().span;
        let body = Box::new(self.parse_statement()?);
        self.expect(&TokenKind::While, "'while'")?;
        self.expect(&TokenKind::LParen, "'('")?;
        let test = self.parse_expression()?;
        self.expect(&TokenKind::RParen, "')'")?;
        self.consume_statement_end()?;
        Ok(Stmt::new(
            StmtKind::DoWhile { body, test },
            start.merge(self.previous_span()),
        ))
    }

    /// All three `for` forms: classic, `for-in`, `for-of`.
    fn parse_for(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.advance().span;
        self.expect(&TokenKind::LParen, "'('")?;

        // `for (let x in/of ...)` and `for (x in/of ...)` divert to the
        // collection-iteration forms.
        match self.peek_kind() {
            TokenKind::Let | TokenKind::Const | TokenKind::Var => {
                let kind = match self.advance().kind {
                    TokenKind::Let => DeclKind::Let,
                    TokenKind::Const => DeclKind::Const,
                    _ => DeclKind::Var,
                };
                let id = self.parse_ident("a variable name")?;
                match self.peek_kind() {
                    TokenKind::In => {
                        self.advance();
                        return self.parse_for_each(start, ForTarget::Declaration { kind, id }, true);
                    }
                    TokenKind::Of => {
                        self.advance();
                        return self.parse_for_each(start, ForTarget::Declaration { kind, id }, false);
                    }
                    _ => {
                        // Classic for with a declaration init: finish the
                        // declarator we started, then any further ones.
                        let init = if self.eat(&TokenKind::Eq) {
                            Some(self.parse_expression()?)
                        } else {
                            None
                        };
                        let span = match &init {
                            Some(e) => id.span.merge(e.span),
                            None => id.span,
                        };
                        let mut declarations = vec![Declarator { id, init, span }];
                        while self.eat(&TokenKind::Comma) {
                            declarations.extend(self.parse_declarator_list(kind)?);
                        }
                        self.expect(&TokenKind::Semicolon, "';'")?;
                        return self.parse_for_classic(
                            start,
                            Some(ForInit::Declaration { kind, declarations }),
                        );
                    }
                }
            }
            TokenKind::Semicolon => {
                self.advance();
                return self.parse_for_classic(start, None);
            }
            _ => {}
        }

        let first = self.parse_expression()?;
        match self.peek_kind() {
            TokenKind::In | TokenKind::Of => {
                let is_in = matches!(self.peek_kind(), TokenKind::In);
                let target = match first.kind {
                    ExprKind::Identifier(name) => {
                        ForTarget::Identifier(Ident::new(name, first.span))
                    }
                    _ => {
                        return Err(SyntaxError::new(
                            "Invalid left-hand side in for-loop",
                            first.span,
                        ))
                    }
                };
                self.advance();
                self.parse_for_each(start, target, is_in)
            }
            _ => {
                self.expect(&TokenKind::Semicolon, "';'")?;
                self.parse_for_classic(start, Some(ForInit::Expression(first)))
            }
        }
    }

    /// The remainder of a classic `for` after its init clause and first `;`.
    fn parse_for_classic(
        &mut self,
        start: kata_types::Span,
        init: Option<ForInit>,
    ) -> Result<Stmt, SyntaxError> {
        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon, "';'")?;
        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RParen, "')'")?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::new(
            StmtKind::For {
                init,
                test,
                update,
                body,
            },
            start.merge(self.previous_span()),
        ))
    }

    /// The remainder of a `for-in` / `for-of` after the `in`/`of` keyword.
    fn parse_for_each(
        &mut self,
        start: kata_types::Span,
        left: ForTarget,
        is_in: bool,
    ) -> Result<Stmt, SyntaxError> {
        let right = self.parse_expression()?;
        self.expect(&TokenKind::RParen, "')'")?;
        let body = Box::new(self.parse_statement()?);
        let span = start.merge(self.previous_span());
        let kind = if is_in {
            StmtKind::ForIn { left, right, body }
        } else {
            StmtKind::ForOf { left, right, body }
        };
        Ok(Stmt::new(kind, span))
    }

    // ── Functions ─────────────────────────────────────────────────────────────

    /// `function name(params) { body }`
    fn parse_function_declaration(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.advance().span;
        let id = self.parse_ident("a function name")?;
        self.expect(&TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.parse_ident("a parameter name")?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "')'")?;
        if !self.check(&TokenKind::LBrace) {
            return Err(self.expected("'{'"));
        }
        let body = Box::new(self.parse_block()?);
        Ok(Stmt::new(
            StmtKind::FunctionDeclaration { id, params, body },
            start.merge(self.previous_span()),
        ))
    }

    /// `return [argument];` — no argument is parsed across a line break.
    fn parse_return(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.advance().span;
        let next = self.peek();
        let argument = if matches!(
            next.kind,
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
        ) || next.newline_before
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_statement_end()?;
        Ok(Stmt::new(
            StmtKind::Return { argument },
            start.merge(self.previous_span()),
        ))
    }

    // ── Expression statements ─────────────────────────────────────────────────

    fn parse_expression_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let expression = self.parse_expression()?;
        let start = expression.span;
        self.consume_statement_end()?;
        Ok(Stmt::new(
            StmtKind::Expression { expression },
            start.merge(self.previous_span()),
        ))
    }
}
