//! Kata parser: converts learner source text into an ESTree-shaped AST.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parser::Parser;

use kata_lexer::Lexer;
use kata_types::ast::Program;
use kata_types::SyntaxError;

/// Parse a complete program from source text.
///
/// Deterministic: the same source always yields the same AST, with node
/// spans carrying byte offsets stable against this exact source string.
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    let tokens = Lexer::new(source).lex()?;
    let mut parser = Parser::new(tokens);
    parser.parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kata_types::ast::*;

    fn parse_ok(source: &str) -> Program {
        parse(source).unwrap_or_else(|e| panic!("unexpected parse error: {e}"))
    }

    fn first_kind(source: &str) -> StmtKind {
        parse_ok(source).body.remove(0).kind
    }

    #[test]
    fn test_declaration_with_literal() {
        let prog = parse_ok("let age = 18;");
        assert_eq!(prog.body.len(), 1);
        match &prog.body[0].kind {
            StmtKind::VariableDeclaration { kind, declarations } => {
                assert_eq!(*kind, DeclKind::Let);
                assert_eq!(declarations[0].id.name, "age");
                assert_eq!(
                    declarations[0].init.as_ref().map(|e| &e.kind),
                    Some(&ExprKind::NumberLit(18.0))
                );
            }
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_declarators() {
        let prog = parse_ok("var a = 1, b, c = 3;");
        match &prog.body[0].kind {
            StmtKind::VariableDeclaration { declarations, .. } => {
                assert_eq!(declarations.len(), 3);
                assert!(declarations[1].init.is_none());
            }
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_const_requires_initializer() {
        assert!(parse("const x;").is_err());
    }

    #[test]
    fn test_if_else_chain() {
        let prog = parse_ok("if (a) { b(); } else if (c) { d(); } else { e(); }");
        match &prog.body[0].kind {
            StmtKind::If { alternate, .. } => {
                let alt = alternate.as_ref().expect("else branch");
                assert!(matches!(alt.kind, StmtKind::If { .. }));
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_all_five_loop_kinds() {
        let sources = [
            "while (x) {}",
            "do {} while (x);",
            "for (let i = 0; i < 3; i++) {}",
            "for (let k in obj) {}",
            "for (let v of xs) {}",
        ];
        let expected = [
            "WhileStatement",
            "DoWhileStatement",
            "ForStatement",
            "ForInStatement",
            "ForOfStatement",
        ];
        for (src, want) in sources.iter().zip(expected) {
            let prog = parse_ok(src);
            assert!(prog.body[0].is_loop(), "{src}");
            assert_eq!(prog.body[0].kind.node_type(), want, "{src}");
        }
    }

    #[test]
    fn test_for_without_declaration() {
        let prog = parse_ok("for (i = 0; i < 3; i++) {}");
        match &prog.body[0].kind {
            StmtKind::For { init, .. } => {
                assert!(matches!(init, Some(ForInit::Expression(_))));
            }
            other => panic!("expected for, got {other:?}"),
        }
    }

    #[test]
    fn test_for_of_existing_binding() {
        let prog = parse_ok("for (item of items) {}");
        match &prog.body[0].kind {
            StmtKind::ForOf { left, .. } => {
                assert_eq!(left.ident().name, "item");
                assert!(matches!(left, ForTarget::Identifier(_)));
            }
            other => panic!("expected for-of, got {other:?}"),
        }
    }

    #[test]
    fn test_single_statement_loop_body() {
        let prog = parse_ok("while (x) x--;");
        match &prog.body[0].kind {
            StmtKind::While { body, .. } => {
                assert!(matches!(body.kind, StmtKind::Expression { .. }));
            }
            other => panic!("expected while, got {other:?}"),
        }
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let prog = parse_ok("x = 1 + 2 * 3;");
        match &prog.body[0].kind {
            StmtKind::Expression { expression } => match &expression.kind {
                ExprKind::Assignment { right, .. } => match &right.kind {
                    ExprKind::Binary { operator, right, .. } => {
                        assert_eq!(*operator, BinOp::Add);
                        assert!(matches!(
                            right.kind,
                            ExprKind::Binary {
                                operator: BinOp::Mul,
                                ..
                            }
                        ));
                    }
                    other => panic!("expected binary, got {other:?}"),
                },
                other => panic!("expected assignment, got {other:?}"),
            },
            other => panic!("expected expression, got {other:?}"),
        }
    }

    #[test]
    fn test_member_call_chain() {
        let prog = parse_ok("console.log(a[0].name);");
        match &prog.body[0].kind {
            StmtKind::Expression { expression } => match &expression.kind {
                ExprKind::Call { callee, arguments } => {
                    assert_eq!(callee.kind.node_type(), "MemberExpression");
                    assert_eq!(arguments.len(), 1);
                    assert_eq!(arguments[0].kind.node_type(), "MemberExpression");
                }
                other => panic!("expected call, got {other:?}"),
            },
            other => panic!("expected expression, got {other:?}"),
        }
    }

    #[test]
    fn test_template_literal() {
        let prog = parse_ok("let s = `sum: ${a + b}!`;");
        match &prog.body[0].kind {
            StmtKind::VariableDeclaration { declarations, .. } => {
                match &declarations[0].init.as_ref().unwrap().kind {
                    ExprKind::TemplateLiteral { quasis, expressions } => {
                        assert_eq!(quasis, &["sum: ".to_string(), "!".to_string()]);
                        assert_eq!(expressions.len(), 1);
                    }
                    other => panic!("expected template, got {other:?}"),
                }
            }
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_object_and_array_literals() {
        let prog = parse_ok(r#"let o = { a: 1, "b c": [2, 3] };"#);
        match &prog.body[0].kind {
            StmtKind::VariableDeclaration { declarations, .. } => {
                match &declarations[0].init.as_ref().unwrap().kind {
                    ExprKind::Object { properties } => {
                        assert_eq!(properties[0].key, "a");
                        assert_eq!(properties[1].key, "b c");
                        assert!(matches!(
                            properties[1].value.kind,
                            ExprKind::Array { .. }
                        ));
                    }
                    other => panic!("expected object, got {other:?}"),
                }
            }
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_function_declaration() {
        let prog = parse_ok("function add(a, b) { return a + b; }");
        match &prog.body[0].kind {
            StmtKind::FunctionDeclaration { id, params, body } => {
                assert_eq!(id.name, "add");
                assert_eq!(params.len(), 2);
                assert!(matches!(body.kind, StmtKind::Block { .. }));
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_asi_newline_boundary() {
        let prog = parse_ok("let a = 1\nlet b = 2");
        assert_eq!(prog.body.len(), 2);
    }

    #[test]
    fn test_missing_separator_fails() {
        assert!(parse("let a = 1 let b = 2").is_err());
    }

    #[test]
    fn test_invalid_assignment_target() {
        assert!(parse("1 = x;").is_err());
    }

    #[test]
    fn test_unclosed_block_fails() {
        assert!(parse("if (a) { b();").is_err());
    }

    #[test]
    fn test_block_body_span_covers_braces() {
        let source = "while (true) { x(); }";
        let prog = parse_ok(source);
        match &prog.body[0].kind {
            StmtKind::While { body, .. } => {
                assert_eq!(&source[body.span.start..body.span.end], "{ x(); }");
            }
            other => panic!("expected while, got {other:?}"),
        }
    }

    #[test]
    fn test_ternary_and_logical() {
        assert!(matches!(
            first_kind("x = a > 0 && b || c ? 1 : 2;"),
            StmtKind::Expression { .. }
        ));
    }

    #[test]
    fn test_determinism() {
        let source = "for (let i = 0; i < 10; i++) { console.log(i * 2); }";
        let first = parse_ok(source);
        for _ in 0..10 {
            assert_eq!(parse_ok(source), first);
        }
    }
}
