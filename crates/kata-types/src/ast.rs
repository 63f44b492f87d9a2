//! AST node types for the learner-JavaScript subset.
//!
//! Every node carries a [`Span`] with byte offsets into the original source.
//! Large recursive types are boxed to keep enum sizes reasonable.
//!
//! Node kind names (see [`StmtKind::node_type`] and [`ExprKind::node_type`])
//! follow the ESTree convention (`"VariableDeclaration"`, `"WhileStatement"`,
//! ...) because lesson rule content references node kinds by those strings.

use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete learner program: a flat list of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns `true` for the five loop statement kinds.
    pub fn is_loop(&self) -> bool {
        matches!(
            self.kind,
            StmtKind::While { .. }
                | StmtKind::DoWhile { .. }
                | StmtKind::For { .. }
                | StmtKind::ForIn { .. }
                | StmtKind::ForOf { .. }
        )
    }
}

/// The kind of statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `let x = 1, y;` / `const c = 2;` / `var v;`
    VariableDeclaration {
        kind: DeclKind,
        declarations: Vec<Declarator>,
    },
    /// A bare expression followed by a statement boundary.
    Expression { expression: Expr },
    /// `{ ... }`
    Block { body: Vec<Stmt> },
    /// `if (test) consequent [else alternate]`
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    /// `while (test) body`
    While { test: Expr, body: Box<Stmt> },
    /// `do body while (test);`
    DoWhile { body: Box<Stmt>, test: Expr },
    /// `for (init; test; update) body`
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    /// `for (left in right) body`
    ForIn {
        left: ForTarget,
        right: Expr,
        body: Box<Stmt>,
    },
    /// `for (left of right) body`
    ForOf {
        left: ForTarget,
        right: Expr,
        body: Box<Stmt>,
    },
    /// `function name(params) { body }`
    FunctionDeclaration {
        id: Ident,
        params: Vec<Ident>,
        body: Box<Stmt>,
    },
    /// `return [argument];`
    Return { argument: Option<Expr> },
    /// `break;`
    Break,
    /// `continue;`
    Continue,
    /// A lone `;`
    Empty,
}

impl StmtKind {
    /// ESTree node kind name.
    pub fn node_type(&self) -> &'static str {
        match self {
            StmtKind::VariableDeclaration { .. } => "VariableDeclaration",
            StmtKind::Expression { .. } => "ExpressionStatement",
            StmtKind::Block { .. } => "BlockStatement",
            StmtKind::If { .. } => "IfStatement",
            StmtKind::While { .. } => "WhileStatement",
            StmtKind::DoWhile { .. } => "DoWhileStatement",
            StmtKind::For { .. } => "ForStatement",
            StmtKind::ForIn { .. } => "ForInStatement",
            StmtKind::ForOf { .. } => "ForOfStatement",
            StmtKind::FunctionDeclaration { .. } => "FunctionDeclaration",
            StmtKind::Return { .. } => "ReturnStatement",
            StmtKind::Break => "BreakStatement",
            StmtKind::Continue => "ContinueStatement",
            StmtKind::Empty => "EmptyStatement",
        }
    }
}

/// Declaration binding kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Let,
    Const,
    Var,
}

impl DeclKind {
    /// Returns the source keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Let => "let",
            DeclKind::Const => "const",
            DeclKind::Var => "var",
        }
    }

    /// Parse a keyword string, as found in lesson rule content.
    pub fn from_keyword(kw: &str) -> Option<Self> {
        match kw {
            "let" => Some(DeclKind::Let),
            "const" => Some(DeclKind::Const),
            "var" => Some(DeclKind::Var),
            _ => None,
        }
    }
}

/// One declarator inside a declaration: `x = 1` or a bare `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub id: Ident,
    pub init: Option<Expr>,
    pub span: Span,
}

/// The init clause of a classic `for` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// `for (let i = 0; ...)`
    Declaration {
        kind: DeclKind,
        declarations: Vec<Declarator>,
    },
    /// `for (i = 0; ...)`
    Expression(Expr),
}

/// The loop variable of a `for-in` / `for-of` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ForTarget {
    /// `for (let item of xs)`
    Declaration { kind: DeclKind, id: Ident },
    /// `for (item of xs)` — assigns an existing binding
    Identifier(Ident),
}

impl ForTarget {
    /// The bound identifier, regardless of declaration form.
    pub fn ident(&self) -> &Ident {
        match self {
            ForTarget::Declaration { id, .. } => id,
            ForTarget::Identifier(id) => id,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node. Uses `Box` for recursive variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals (all report node type "Literal", like acorn) ──
    /// `42`, `3.14`
    NumberLit(f64),
    /// `"hello"` / `'hello'`
    StringLit(String),
    /// `true` / `false`
    BoolLit(bool),
    /// `null`
    NullLit,

    /// `` `a ${b} c` `` — `quasis.len() == expressions.len() + 1`
    TemplateLiteral {
        quasis: Vec<String>,
        expressions: Vec<Expr>,
    },
    /// `[a, b, c]`
    Array { elements: Vec<Expr> },
    /// `{ key: value, "str key": value }`
    Object { properties: Vec<Property> },

    /// `count`, `myVar`
    Identifier(String),

    /// `target op value` where op is `=`, `+=`, ...
    Assignment {
        operator: AssignOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `i++`, `--i`
    Update {
        operator: UpdateOp,
        prefix: bool,
        argument: Box<Expr>,
    },
    /// `a + b`, `a === b`, ...
    Binary {
        operator: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `a && b`, `a || b`
    Logical {
        operator: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `-x`, `!x`, `+x`
    Unary { operator: UnaryOp, argument: Box<Expr> },
    /// `test ? consequent : alternate`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// `callee(args...)`
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    /// `object.property` (`computed: false`) or `object[property]`
    /// (`computed: true`).
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },
}

impl ExprKind {
    /// ESTree node kind name.
    pub fn node_type(&self) -> &'static str {
        match self {
            ExprKind::NumberLit(_)
            | ExprKind::StringLit(_)
            | ExprKind::BoolLit(_)
            | ExprKind::NullLit => "Literal",
            ExprKind::TemplateLiteral { .. } => "TemplateLiteral",
            ExprKind::Array { .. } => "ArrayExpression",
            ExprKind::Object { .. } => "ObjectExpression",
            ExprKind::Identifier(_) => "Identifier",
            ExprKind::Assignment { .. } => "AssignmentExpression",
            ExprKind::Update { .. } => "UpdateExpression",
            ExprKind::Binary { .. } => "BinaryExpression",
            ExprKind::Logical { .. } => "LogicalExpression",
            ExprKind::Unary { .. } => "UnaryExpression",
            ExprKind::Conditional { .. } => "ConditionalExpression",
            ExprKind::Call { .. } => "CallExpression",
            ExprKind::Member { .. } => "MemberExpression",
        }
    }
}

/// An entry in an object literal: `key: value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Key text — identifier name, string content, or number rendering.
    pub key: String,
    pub value: Expr,
    pub span: Span,
}

// ── Operators ─────────────────────────────────────────────────────────────────

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::ModAssign => "%=",
        }
    }
}

/// Update operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    EqLoose,
    NotEqLoose,
    EqStrict,
    NotEqStrict,
    Less,
    Greater,
    LessEq,
    GreaterEq,
}

impl BinOp {
    /// Returns the operator symbol, as written in source and in rule shapes.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::EqLoose => "==",
            BinOp::NotEqLoose => "!=",
            BinOp::EqStrict => "===",
            BinOp::NotEqStrict => "!==",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::LessEq => "<=",
            BinOp::GreaterEq => ">=",
        }
    }
}

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Pos,
    /// `!x`
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Not => "!",
        }
    }
}
