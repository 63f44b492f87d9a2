//! Generic pre-order AST traversal.
//!
//! [`walk`] invokes a callback on every node reachable from a [`Program`] in
//! depth-first pre-order: statements, declarators, expressions, object
//! properties, and identifier positions. Position metadata is not a node and
//! is never visited.
//!
//! [`Node`] is a borrowed, type-erased view over the closed AST enums. It
//! exposes the ESTree kind name plus [`Node::property`], a typed projection
//! of named children used by shape-pattern matching in the validator.

use crate::ast::*;
use crate::Span;

/// A borrowed view of any AST node.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Stmt(&'a Stmt),
    Declarator(&'a Declarator),
    Property(&'a Property),
    Expr(&'a Expr),
    Ident(&'a Ident),
}

/// A typed view of one named property of a node.
///
/// Mirrors what dynamic AST consumers read off ESTree nodes: either a child
/// node, a list of child nodes, or a scalar.
#[derive(Debug, Clone)]
pub enum PropView<'a> {
    Node(Node<'a>),
    List(Vec<Node<'a>>),
    Str(&'a str),
    Num(f64),
    Bool(bool),
    Null,
}

impl<'a> Node<'a> {
    /// ESTree node kind name.
    pub fn node_type(&self) -> &'static str {
        match self {
            Node::Program(_) => "Program",
            Node::Stmt(s) => s.kind.node_type(),
            Node::Declarator(_) => "VariableDeclarator",
            Node::Property(_) => "Property",
            Node::Expr(e) => e.kind.node_type(),
            Node::Ident(_) => "Identifier",
        }
    }

    /// The node's source span.
    pub fn span(&self) -> Span {
        match self {
            Node::Program(p) => p.span,
            Node::Stmt(s) => s.span,
            Node::Declarator(d) => d.span,
            Node::Property(p) => p.span,
            Node::Expr(e) => e.span,
            Node::Ident(i) => i.span,
        }
    }

    /// Project a named child or scalar property, ESTree-style.
    ///
    /// Returns `None` for unknown keys; absent optional children project to
    /// [`PropView::Null`] (the dynamic engines this mirrors read `null`).
    pub fn property(&self, key: &str) -> Option<PropView<'a>> {
        match self {
            Node::Program(p) => match key {
                "body" => Some(PropView::List(p.body.iter().map(Node::Stmt).collect())),
                _ => None,
            },
            Node::Stmt(s) => stmt_property(&s.kind, key),
            Node::Declarator(d) => match key {
                "id" => Some(PropView::Node(Node::Ident(&d.id))),
                "init" => Some(opt_expr(d.init.as_ref())),
                _ => None,
            },
            Node::Property(p) => match key {
                "key" => Some(PropView::Str(&p.key)),
                "value" => Some(PropView::Node(Node::Expr(&p.value))),
                _ => None,
            },
            Node::Expr(e) => expr_property(&e.kind, key),
            Node::Ident(i) => match key {
                "name" => Some(PropView::Str(&i.name)),
                _ => None,
            },
        }
    }
}

fn opt_expr<'a>(expr: Option<&'a Expr>) -> PropView<'a> {
    match expr {
        Some(e) => PropView::Node(Node::Expr(e)),
        None => PropView::Null,
    }
}

fn stmt_property<'a>(kind: &'a StmtKind, key: &str) -> Option<PropView<'a>> {
    match kind {
        StmtKind::VariableDeclaration { kind, declarations } => match key {
            "kind" => Some(PropView::Str(kind.as_str())),
            "declarations" => Some(PropView::List(
                declarations.iter().map(Node::Declarator).collect(),
            )),
            _ => None,
        },
        StmtKind::Expression { expression } => match key {
            "expression" => Some(PropView::Node(Node::Expr(expression))),
            _ => None,
        },
        StmtKind::Block { body } => match key {
            "body" => Some(PropView::List(body.iter().map(Node::Stmt).collect())),
            _ => None,
        },
        StmtKind::If {
            test,
            consequent,
            alternate,
        } => match key {
            "test" => Some(PropView::Node(Node::Expr(test))),
            "consequent" => Some(PropView::Node(Node::Stmt(consequent))),
            "alternate" => Some(match alternate {
                Some(alt) => PropView::Node(Node::Stmt(alt)),
                None => PropView::Null,
            }),
            _ => None,
        },
        StmtKind::While { test, body } => match key {
            "test" => Some(PropView::Node(Node::Expr(test))),
            "body" => Some(PropView::Node(Node::Stmt(body))),
            _ => None,
        },
        StmtKind::DoWhile { body, test } => match key {
            "body" => Some(PropView::Node(Node::Stmt(body))),
            "test" => Some(PropView::Node(Node::Expr(test))),
            _ => None,
        },
        StmtKind::For {
            init,
            test,
            update,
            body,
        } => match key {
            "init" => Some(match init {
                Some(ForInit::Expression(e)) => PropView::Node(Node::Expr(e)),
                // Declaration inits have no single-node projection.
                Some(ForInit::Declaration { .. }) => return None,
                None => PropView::Null,
            }),
            "test" => Some(opt_expr(test.as_ref())),
            "update" => Some(opt_expr(update.as_ref())),
            "body" => Some(PropView::Node(Node::Stmt(body))),
            _ => None,
        },
        StmtKind::ForIn { left, right, body } | StmtKind::ForOf { left, right, body } => {
            match key {
                "left" => Some(PropView::Node(Node::Ident(left.ident()))),
                "right" => Some(PropView::Node(Node::Expr(right))),
                "body" => Some(PropView::Node(Node::Stmt(body))),
                _ => None,
            }
        }
        StmtKind::FunctionDeclaration { id, params, body } => match key {
            "id" => Some(PropView::Node(Node::Ident(id))),
            "params" => Some(PropView::List(params.iter().map(Node::Ident).collect())),
            "body" => Some(PropView::Node(Node::Stmt(body))),
            _ => None,
        },
        StmtKind::Return { argument } => match key {
            "argument" => Some(opt_expr(argument.as_ref())),
            _ => None,
        },
        StmtKind::Break | StmtKind::Continue | StmtKind::Empty => None,
    }
}

fn expr_property<'a>(kind: &'a ExprKind, key: &str) -> Option<PropView<'a>> {
    match kind {
        ExprKind::NumberLit(n) => match key {
            "value" => Some(PropView::Num(*n)),
            _ => None,
        },
        ExprKind::StringLit(s) => match key {
            "value" => Some(PropView::Str(s)),
            _ => None,
        },
        ExprKind::BoolLit(b) => match key {
            "value" => Some(PropView::Bool(*b)),
            _ => None,
        },
        ExprKind::NullLit => match key {
            "value" => Some(PropView::Null),
            _ => None,
        },
        ExprKind::TemplateLiteral { expressions, .. } => match key {
            "expressions" => Some(PropView::List(
                expressions.iter().map(Node::Expr).collect(),
            )),
            _ => None,
        },
        ExprKind::Array { elements } => match key {
            "elements" => Some(PropView::List(elements.iter().map(Node::Expr).collect())),
            _ => None,
        },
        ExprKind::Object { properties } => match key {
            "properties" => Some(PropView::List(
                properties.iter().map(Node::Property).collect(),
            )),
            _ => None,
        },
        ExprKind::Identifier(name) => match key {
            "name" => Some(PropView::Str(name)),
            _ => None,
        },
        ExprKind::Assignment {
            operator,
            left,
            right,
        } => match key {
            "operator" => Some(PropView::Str(operator.as_str())),
            "left" => Some(PropView::Node(Node::Expr(left))),
            "right" => Some(PropView::Node(Node::Expr(right))),
            _ => None,
        },
        ExprKind::Update {
            operator,
            prefix,
            argument,
        } => match key {
            "operator" => Some(PropView::Str(operator.as_str())),
            "prefix" => Some(PropView::Bool(*prefix)),
            "argument" => Some(PropView::Node(Node::Expr(argument))),
            _ => None,
        },
        ExprKind::Binary {
            operator,
            left,
            right,
        } => match key {
            "operator" => Some(PropView::Str(operator.as_str())),
            "left" => Some(PropView::Node(Node::Expr(left))),
            "right" => Some(PropView::Node(Node::Expr(right))),
            _ => None,
        },
        ExprKind::Logical {
            operator,
            left,
            right,
        } => match key {
            "operator" => Some(PropView::Str(operator.as_str())),
            "left" => Some(PropView::Node(Node::Expr(left))),
            "right" => Some(PropView::Node(Node::Expr(right))),
            _ => None,
        },
        ExprKind::Unary { operator, argument } => match key {
            "operator" => Some(PropView::Str(operator.as_str())),
            "argument" => Some(PropView::Node(Node::Expr(argument))),
            _ => None,
        },
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => match key {
            "test" => Some(PropView::Node(Node::Expr(test))),
            "consequent" => Some(PropView::Node(Node::Expr(consequent))),
            "alternate" => Some(PropView::Node(Node::Expr(alternate))),
            _ => None,
        },
        ExprKind::Call { callee, arguments } => match key {
            "callee" => Some(PropView::Node(Node::Expr(callee))),
            "arguments" => Some(PropView::List(arguments.iter().map(Node::Expr).collect())),
            _ => None,
        },
        ExprKind::Member {
            object,
            property,
            computed,
        } => match key {
            "object" => Some(PropView::Node(Node::Expr(object))),
            "property" => Some(PropView::Node(Node::Expr(property))),
            "computed" => Some(PropView::Bool(*computed)),
            _ => None,
        },
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Traversal
// ══════════════════════════════════════════════════════════════════════════════

/// Walk every node of a program in depth-first pre-order.
///
/// The callback must not mutate the tree it is walking (the borrow makes
/// that impossible here, which is the point).
pub fn walk<'a>(program: &'a Program, visit: &mut impl FnMut(Node<'a>)) {
    visit(Node::Program(program));
    for stmt in &program.body {
        walk_stmt(stmt, visit);
    }
}

/// Walk a statement subtree in pre-order.
pub fn walk_stmt<'a>(stmt: &'a Stmt, visit: &mut impl FnMut(Node<'a>)) {
    visit(Node::Stmt(stmt));
    match &stmt.kind {
        StmtKind::VariableDeclaration { declarations, .. } => {
            for decl in declarations {
                visit(Node::Declarator(decl));
                visit(Node::Ident(&decl.id));
                if let Some(init) = &decl.init {
                    walk_expr(init, visit);
                }
            }
        }
        StmtKind::Expression { expression } => walk_expr(expression, visit),
        StmtKind::Block { body } => {
            for s in body {
                walk_stmt(s, visit);
            }
        }
        StmtKind::If {
            test,
            consequent,
            alternate,
        } => {
            walk_expr(test, visit);
            walk_stmt(consequent, visit);
            if let Some(alt) = alternate {
                walk_stmt(alt, visit);
            }
        }
        StmtKind::While { test, body } => {
            walk_expr(test, visit);
            walk_stmt(body, visit);
        }
        StmtKind::DoWhile { body, test } => {
            walk_stmt(body, visit);
            walk_expr(test, visit);
        }
        StmtKind::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Declaration { declarations, .. }) => {
                    for decl in declarations {
                        visit(Node::Declarator(decl));
                        visit(Node::Ident(&decl.id));
                        if let Some(e) = &decl.init {
                            walk_expr(e, visit);
                        }
                    }
                }
                Some(ForInit::Expression(e)) => walk_expr(e, visit),
                None => {}
            }
            if let Some(t) = test {
                walk_expr(t, visit);
            }
            if let Some(u) = update {
                walk_expr(u, visit);
            }
            walk_stmt(body, visit);
        }
        StmtKind::ForIn { left, right, body } | StmtKind::ForOf { left, right, body } => {
            visit(Node::Ident(left.ident()));
            walk_expr(right, visit);
            walk_stmt(body, visit);
        }
        StmtKind::FunctionDeclaration { id, params, body } => {
            visit(Node::Ident(id));
            for p in params {
                visit(Node::Ident(p));
            }
            walk_stmt(body, visit);
        }
        StmtKind::Return { argument } => {
            if let Some(arg) = argument {
                walk_expr(arg, visit);
            }
        }
        StmtKind::Break | StmtKind::Continue | StmtKind::Empty => {}
    }
}

/// Walk an expression subtree in pre-order.
pub fn walk_expr<'a>(expr: &'a Expr, visit: &mut impl FnMut(Node<'a>)) {
    visit(Node::Expr(expr));
    match &expr.kind {
        ExprKind::NumberLit(_)
        | ExprKind::StringLit(_)
        | ExprKind::BoolLit(_)
        | ExprKind::NullLit
        | ExprKind::Identifier(_) => {}
        ExprKind::TemplateLiteral { expressions, .. } => {
            for e in expressions {
                walk_expr(e, visit);
            }
        }
        ExprKind::Array { elements } => {
            for e in elements {
                walk_expr(e, visit);
            }
        }
        ExprKind::Object { properties } => {
            for p in properties {
                visit(Node::Property(p));
                walk_expr(&p.value, visit);
            }
        }
        ExprKind::Assignment { left, right, .. }
        | ExprKind::Binary { left, right, .. }
        | ExprKind::Logical { left, right, .. } => {
            walk_expr(left, visit);
            walk_expr(right, visit);
        }
        ExprKind::Update { argument, .. } | ExprKind::Unary { argument, .. } => {
            walk_expr(argument, visit);
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            walk_expr(test, visit);
            walk_expr(consequent, visit);
            walk_expr(alternate, visit);
        }
        ExprKind::Call { callee, arguments } => {
            walk_expr(callee, visit);
            for arg in arguments {
                walk_expr(arg, visit);
            }
        }
        ExprKind::Member {
            object, property, ..
        } => {
            walk_expr(object, visit);
            walk_expr(property, visit);
        }
    }
}
