//! Tree-walking evaluator for the learner-JavaScript subset.
//!
//! Loops are NOT metered here. Budget enforcement happens through the
//! `_checkLoop` calls the guard transformer splices into every loop body,
//! which dispatch to [`LoopGuard::tick`]. Running an uninstrumented
//! program therefore runs with no iteration limits at all.

use crate::budget::{Budget, LoopGuard};
use crate::env::ScopeStack;
use crate::error::EvalError;
use crate::value::{Builtin, FunctionObj, Value};
use indexmap::IndexMap;
use kata_types::ast::{
    AssignOp, BinOp, DeclKind, Expr, ExprKind, ForInit, ForTarget, LogicalOp, Program, Stmt,
    StmtKind, UnaryOp, UpdateOp,
};
use std::rc::Rc;

/// Ceiling on nested user-function calls.
const MAX_CALL_DEPTH: usize = 200;

/// One evaluator instance. Created fresh per run so no state (scopes,
/// captured output, guard ticks) leaks between fixtures.
pub struct Interp {
    scopes: ScopeStack,
    guard: LoopGuard,
    output: Vec<String>,
    call_depth: usize,
}

impl Interp {
    pub fn new(budget: Budget) -> Self {
        let mut interp = Interp {
            scopes: ScopeStack::new(),
            guard: LoopGuard::new(budget),
            output: Vec::new(),
            call_depth: 0,
        };
        interp.install_globals();
        interp
    }

    /// Bind a host value in the global frame. Used by the sandbox to pass
    /// fixture input under the lesson's parameter name.
    pub fn define_global(&mut self, name: &str, value: Value) {
        self.scopes.define(name, value);
    }

    /// Captured console lines so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn into_output(self) -> Vec<String> {
        self.output
    }

    pub fn run(&mut self, program: &Program) -> Result<(), EvalError> {
        self.hoist_functions(&program.body)?;
        for stmt in &program.body {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    // ── Globals ───────────────────────────────────────────────────────────

    fn install_globals(&mut self) {
        let mut console = IndexMap::new();
        console.insert("log".to_string(), Value::Builtin(Builtin::ConsoleLog));
        self.scopes.define("console", Value::object(console));

        let mut math = IndexMap::new();
        math.insert("floor".to_string(), Value::Builtin(Builtin::MathFloor));
        math.insert("ceil".to_string(), Value::Builtin(Builtin::MathCeil));
        math.insert("round".to_string(), Value::Builtin(Builtin::MathRound));
        math.insert("abs".to_string(), Value::Builtin(Builtin::MathAbs));
        math.insert("sqrt".to_string(), Value::Builtin(Builtin::MathSqrt));
        math.insert("pow".to_string(), Value::Builtin(Builtin::MathPow));
        math.insert("min".to_string(), Value::Builtin(Builtin::MathMin));
        math.insert("max".to_string(), Value::Builtin(Builtin::MathMax));
        math.insert("PI".to_string(), Value::Number(std::f64::consts::PI));
        self.scopes.define("Math", Value::object(math));

        self.scopes.define("String", Value::Builtin(Builtin::StringCast));
        self.scopes.define("Number", Value::Builtin(Builtin::NumberCast));
        self.scopes.define("_checkLoop", Value::Builtin(Builtin::LoopGuard));
        self.scopes.define("undefined", Value::Undefined);
        self.scopes.define("NaN", Value::Number(f64::NAN));
        self.scopes.define("Infinity", Value::Number(f64::INFINITY));
    }

    // ── Statements ────────────────────────────────────────────────────────

    /// Pre-declare `function` statements so calls can precede definitions,
    /// matching hoisting.
    fn hoist_functions(&mut self, body: &[Stmt]) -> Result<(), EvalError> {
        for stmt in body {
            if let StmtKind::FunctionDeclaration { id, params, body } = &stmt.kind {
                let block = match &body.kind {
                    StmtKind::Block { body } => body.clone(),
                    _ => return Err(EvalError::runtime("function body must be a block")),
                };
                let func = FunctionObj {
                    name: id.name.clone(),
                    params: params.iter().map(|p| p.name.clone()).collect(),
                    body: block,
                };
                self.scopes.define(&id.name, Value::Function(Rc::new(func)));
            }
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), EvalError> {
        match &stmt.kind {
            StmtKind::VariableDeclaration { kind, declarations } => {
                for decl in declarations {
                    let value = match &decl.init {
                        Some(init) => self.eval_expr(init)?,
                        None => Value::Undefined,
                    };
                    match kind {
                        // var tolerates redeclaration
                        DeclKind::Var => self.scopes.define(&decl.id.name, value),
                        DeclKind::Let => self.scopes.declare(&decl.id.name, value, true)?,
                        DeclKind::Const => self.scopes.declare(&decl.id.name, value, false)?,
                    }
                }
                Ok(())
            }
            StmtKind::Expression { expression } => {
                self.eval_expr(expression)?;
                Ok(())
            }
            StmtKind::Block { body } => self.exec_block(body),
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                if self.eval_expr(test)?.is_truthy() {
                    self.exec_stmt(consequent)
                } else if let Some(alt) = alternate {
                    self.exec_stmt(alt)
                } else {
                    Ok(())
                }
            }
            StmtKind::While { test, body } => {
                while self.eval_expr(test)?.is_truthy() {
                    match self.exec_stmt(body) {
                        Err(EvalError::Break) => break,
                        Err(EvalError::Continue) => continue,
                        other => other?,
                    }
                }
                Ok(())
            }
            StmtKind::DoWhile { body, test } => {
                loop {
                    match self.exec_stmt(body) {
                        Err(EvalError::Break) => break,
                        Err(EvalError::Continue) => {}
                        other => other?,
                    }
                    if !self.eval_expr(test)?.is_truthy() {
                        break;
                    }
                }
                Ok(())
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => self.exec_for(init.as_ref(), test.as_ref(), update.as_ref(), body),
            StmtKind::ForIn { left, right, body } => {
                let keys = self.enumerable_keys(right)?;
                self.exec_for_each(left, keys, body)
            }
            StmtKind::ForOf { left, right, body } => {
                let items = self.iterable_items(right)?;
                self.exec_for_each(left, items, body)
            }
            // bound during hoisting
            StmtKind::FunctionDeclaration { .. } => Ok(()),
            StmtKind::Return { argument } => {
                let value = match argument {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Undefined,
                };
                Err(EvalError::Return(value))
            }
            StmtKind::Break => Err(EvalError::Break),
            StmtKind::Continue => Err(EvalError::Continue),
            StmtKind::Empty => Ok(()),
        }
    }

    fn exec_block(&mut self, body: &[Stmt]) -> Result<(), EvalError> {
        self.scopes.push();
        let result = self.hoist_functions(body).and_then(|_| {
            for stmt in body {
                self.exec_stmt(stmt)?;
            }
            Ok(())
        });
        self.scopes.pop();
        result
    }

    fn exec_for(
        &mut self,
        init: Option<&ForInit>,
        test: Option<&Expr>,
        update: Option<&Expr>,
        body: &Stmt,
    ) -> Result<(), EvalError> {
        // the init declaration gets its own frame enclosing the whole loop
        self.scopes.push();
        let result = (|| {
            match init {
                Some(ForInit::Declaration { kind, declarations }) => {
                    for decl in declarations {
                        let value = match &decl.init {
                            Some(e) => self.eval_expr(e)?,
                            None => Value::Undefined,
                        };
                        let mutable = !matches!(kind, DeclKind::Const);
                        self.scopes.declare(&decl.id.name, value, mutable)?;
                    }
                }
                Some(ForInit::Expression(expr)) => {
                    self.eval_expr(expr)?;
                }
                None => {}
            }
            loop {
                if let Some(test) = test {
                    if !self.eval_expr(test)?.is_truthy() {
                        break;
                    }
                }
                match self.exec_stmt(body) {
                    Err(EvalError::Break) => break,
                    Err(EvalError::Continue) => {}
                    other => other?,
                }
                if let Some(update) = update {
                    self.eval_expr(update)?;
                }
            }
            Ok(())
        })();
        self.scopes.pop();
        result
    }

    fn exec_for_each(
        &mut self,
        left: &ForTarget,
        items: Vec<Value>,
        body: &Stmt,
    ) -> Result<(), EvalError> {
        for item in items {
            match left {
                ForTarget::Declaration { .. } => {
                    self.scopes.push();
                    self.scopes.define(&left.ident().name, item);
                    let result = match self.exec_stmt(body) {
                        Err(EvalError::Break) => {
                            self.scopes.pop();
                            break;
                        }
                        Err(EvalError::Continue) => Ok(()),
                        other => other,
                    };
                    self.scopes.pop();
                    result?;
                }
                ForTarget::Identifier(id) => {
                    self.scopes.assign(&id.name, item)?;
                    match self.exec_stmt(body) {
                        Err(EvalError::Break) => break,
                        Err(EvalError::Continue) => continue,
                        other => other?,
                    }
                }
            }
        }
        Ok(())
    }

    /// Keys for `for-in`: object property names, array/string indices.
    fn enumerable_keys(&mut self, right: &Expr) -> Result<Vec<Value>, EvalError> {
        let value = self.eval_expr(right)?;
        Ok(match value {
            Value::Object(fields) => fields
                .borrow()
                .keys()
                .map(|k| Value::Str(k.clone()))
                .collect(),
            Value::Array(items) => (0..items.borrow().len())
                .map(|i| Value::Str(i.to_string()))
                .collect(),
            Value::Str(s) => (0..s.chars().count())
                .map(|i| Value::Str(i.to_string()))
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Items for `for-of`: array elements or string characters.
    fn iterable_items(&mut self, right: &Expr) -> Result<Vec<Value>, EvalError> {
        let value = self.eval_expr(right)?;
        match value {
            Value::Array(items) => Ok(items.borrow().clone()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
            other => Err(EvalError::runtime(format!(
                "{} is not iterable",
                other.type_name()
            ))),
        }
    }

    // ── Expressions ───────────────────────────────────────────────────────

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        match &expr.kind {
            ExprKind::NumberLit(n) => Ok(Value::Number(*n)),
            ExprKind::StringLit(s) => Ok(Value::Str(s.clone())),
            ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
            ExprKind::NullLit => Ok(Value::Null),
            ExprKind::TemplateLiteral {
                quasis,
                expressions,
            } => {
                let mut out = String::new();
                for (i, quasi) in quasis.iter().enumerate() {
                    out.push_str(quasi);
                    if let Some(expr) = expressions.get(i) {
                        out.push_str(&self.eval_expr(expr)?.to_display_string());
                    }
                }
                Ok(Value::Str(out))
            }
            ExprKind::Array { elements } => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.eval_expr(element)?);
                }
                Ok(Value::array(items))
            }
            ExprKind::Object { properties } => {
                let mut fields = IndexMap::with_capacity(properties.len());
                for prop in properties {
                    let value = self.eval_expr(&prop.value)?;
                    fields.insert(prop.key.clone(), value);
                }
                Ok(Value::object(fields))
            }
            ExprKind::Identifier(name) => self.scopes.get(name),
            ExprKind::Assignment {
                operator,
                left,
                right,
            } => self.eval_assignment(*operator, left, right),
            ExprKind::Update {
                operator,
                prefix,
                argument,
            } => self.eval_update(*operator, *prefix, argument),
            ExprKind::Binary {
                operator,
                left,
                right,
            } => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                Ok(eval_binary(*operator, &lhs, &rhs))
            }
            ExprKind::Logical {
                operator,
                left,
                right,
            } => {
                let lhs = self.eval_expr(left)?;
                match operator {
                    LogicalOp::And if !lhs.is_truthy() => Ok(lhs),
                    LogicalOp::Or if lhs.is_truthy() => Ok(lhs),
                    _ => self.eval_expr(right),
                }
            }
            ExprKind::Unary { operator, argument } => {
                let value = self.eval_expr(argument)?;
                Ok(match operator {
                    UnaryOp::Neg => Value::Number(-value.to_number()),
                    UnaryOp::Pos => Value::Number(value.to_number()),
                    UnaryOp::Not => Value::Bool(!value.is_truthy()),
                })
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval_expr(test)?.is_truthy() {
                    self.eval_expr(consequent)
                } else {
                    self.eval_expr(alternate)
                }
            }
            ExprKind::Call { callee, arguments } => self.eval_call(callee, arguments),
            ExprKind::Member {
                object,
                property,
                computed,
            } => {
                let obj = self.eval_expr(object)?;
                let key = self.member_key(property, *computed)?;
                self.get_property(&obj, &key)
            }
        }
    }

    /// Resolve a member expression's key to a string.
    fn member_key(&mut self, property: &Expr, computed: bool) -> Result<String, EvalError> {
        if computed {
            Ok(self.eval_expr(property)?.to_display_string())
        } else {
            match &property.kind {
                ExprKind::Identifier(name) => Ok(name.clone()),
                ExprKind::StringLit(s) => Ok(s.clone()),
                _ => Err(EvalError::runtime("invalid property access")),
            }
        }
    }

    fn get_property(&mut self, obj: &Value, key: &str) -> Result<Value, EvalError> {
        match obj {
            Value::Array(items) => {
                if key == "length" {
                    return Ok(Value::Number(items.borrow().len() as f64));
                }
                if let Ok(index) = key.parse::<usize>() {
                    return Ok(items.borrow().get(index).cloned().unwrap_or(Value::Undefined));
                }
                Ok(Value::Undefined)
            }
            Value::Str(s) => {
                if key == "length" {
                    return Ok(Value::Number(s.chars().count() as f64));
                }
                if let Ok(index) = key.parse::<usize>() {
                    return Ok(s
                        .chars()
                        .nth(index)
                        .map(|c| Value::Str(c.to_string()))
                        .unwrap_or(Value::Undefined));
                }
                Ok(Value::Undefined)
            }
            Value::Object(fields) => Ok(fields
                .borrow()
                .get(key)
                .cloned()
                .unwrap_or(Value::Undefined)),
            Value::Undefined | Value::Null => Err(EvalError::runtime(format!(
                "Cannot read properties of {} (reading '{key}')",
                obj.to_display_string()
            ))),
            _ => Ok(Value::Undefined),
        }
    }

    fn eval_assignment(
        &mut self,
        operator: AssignOp,
        left: &Expr,
        right: &Expr,
    ) -> Result<Value, EvalError> {
        let value = match operator {
            AssignOp::Assign => self.eval_expr(right)?,
            compound => {
                let current = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                let op = match compound {
                    AssignOp::AddAssign => BinOp::Add,
                    AssignOp::SubAssign => BinOp::Sub,
                    AssignOp::MulAssign => BinOp::Mul,
                    AssignOp::DivAssign => BinOp::Div,
                    AssignOp::ModAssign => BinOp::Mod,
                    AssignOp::Assign => unreachable!(),
                };
                eval_binary(op, &current, &rhs)
            }
        };
        self.assign_target(left, value.clone())?;
        Ok(value)
    }

    fn eval_update(
        &mut self,
        operator: UpdateOp,
        prefix: bool,
        argument: &Expr,
    ) -> Result<Value, EvalError> {
        let old = self.eval_expr(argument)?.to_number();
        let new = match operator {
            UpdateOp::Increment => old + 1.0,
            UpdateOp::Decrement => old - 1.0,
        };
        self.assign_target(argument, Value::Number(new))?;
        Ok(Value::Number(if prefix { new } else { old }))
    }

    /// Store into an assignment target: identifier, array index, or object
    /// property. Array stores past the end fill the gap with `undefined`.
    fn assign_target(&mut self, target: &Expr, value: Value) -> Result<(), EvalError> {
        match &target.kind {
            ExprKind::Identifier(name) => self.scopes.assign(name, value),
            ExprKind::Member {
                object,
                property,
                computed,
            } => {
                let obj = self.eval_expr(object)?;
                let key = self.member_key(property, *computed)?;
                match obj {
                    Value::Array(items) => {
                        if let Ok(index) = key.parse::<usize>() {
                            let mut items = items.borrow_mut();
                            if index >= items.len() {
                                items.resize(index + 1, Value::Undefined);
                            }
                            items[index] = value;
                        }
                        Ok(())
                    }
                    Value::Object(fields) => {
                        fields.borrow_mut().insert(key, value);
                        Ok(())
                    }
                    other => Err(EvalError::runtime(format!(
                        "cannot assign property '{key}' on {}",
                        other.type_name()
                    ))),
                }
            }
            _ => Err(EvalError::runtime("invalid assignment target")),
        }
    }

    // ── Calls ─────────────────────────────────────────────────────────────

    fn eval_call(&mut self, callee: &Expr, arguments: &[Expr]) -> Result<Value, EvalError> {
        // method call: dispatch on the receiver
        if let ExprKind::Member {
            object,
            property,
            computed,
        } = &callee.kind
        {
            let receiver = self.eval_expr(object)?;
            let method = self.member_key(property, *computed)?;
            let args = self.eval_args(arguments)?;
            return self.call_method(receiver, &method, args);
        }

        let func = self.eval_expr(callee)?;
        let args = self.eval_args(arguments)?;
        match func {
            Value::Function(f) => self.call_function(&f, args),
            Value::Builtin(b) => self.call_builtin(b, args),
            other => {
                let name = match &callee.kind {
                    ExprKind::Identifier(name) => name.clone(),
                    _ => other.type_name().to_string(),
                };
                Err(EvalError::runtime(format!("{name} is not a function")))
            }
        }
    }

    fn eval_args(&mut self, arguments: &[Expr]) -> Result<Vec<Value>, EvalError> {
        let mut args = Vec::with_capacity(arguments.len());
        for arg in arguments {
            args.push(self.eval_expr(arg)?);
        }
        Ok(args)
    }

    fn call_function(
        &mut self,
        func: &Rc<FunctionObj>,
        args: Vec<Value>,
    ) -> Result<Value, EvalError> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(EvalError::StackOverflow);
        }
        self.call_depth += 1;
        self.scopes.push();
        let mut result = Ok(Value::Undefined);
        for (i, param) in func.params.iter().enumerate() {
            let value = args.get(i).cloned().unwrap_or(Value::Undefined);
            self.scopes.define(param, value);
        }
        if let Err(e) = self.hoist_functions(&func.body) {
            result = Err(e);
        } else {
            for stmt in &func.body {
                match self.exec_stmt(stmt) {
                    Err(EvalError::Return(value)) => {
                        result = Ok(value);
                        break;
                    }
                    Err(e) => {
                        result = Err(e);
                        break;
                    }
                    Ok(()) => {}
                }
            }
        }
        self.scopes.pop();
        self.call_depth -= 1;
        result
    }

    fn call_builtin(&mut self, builtin: Builtin, args: Vec<Value>) -> Result<Value, EvalError> {
        let arg = |i: usize| args.get(i).cloned().unwrap_or(Value::Undefined);
        let num = |i: usize| arg(i).to_number();
        Ok(match builtin {
            Builtin::ConsoleLog => {
                let line = args
                    .iter()
                    .map(Value::console_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                self.output.push(line);
                Value::Undefined
            }
            Builtin::LoopGuard => {
                self.guard.tick()?;
                Value::Undefined
            }
            Builtin::MathFloor => Value::Number(num(0).floor()),
            Builtin::MathCeil => Value::Number(num(0).ceil()),
            // halves round toward +Infinity, so round(-2.5) is -2
            Builtin::MathRound => Value::Number((num(0) + 0.5).floor()),
            Builtin::MathAbs => Value::Number(num(0).abs()),
            Builtin::MathSqrt => Value::Number(num(0).sqrt()),
            Builtin::MathPow => Value::Number(num(0).powf(num(1))),
            Builtin::MathMin => Value::Number(
                args.iter()
                    .map(Value::to_number)
                    .fold(f64::INFINITY, f64::min),
            ),
            Builtin::MathMax => Value::Number(
                args.iter()
                    .map(Value::to_number)
                    .fold(f64::NEG_INFINITY, f64::max),
            ),
            Builtin::StringCast => Value::Str(arg(0).to_display_string()),
            Builtin::NumberCast => Value::Number(num(0)),
        })
    }

    fn call_method(
        &mut self,
        receiver: Value,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, EvalError> {
        let arg = |i: usize| args.get(i).cloned().unwrap_or(Value::Undefined);
        match &receiver {
            Value::Array(items) => match method {
                "push" => {
                    let mut items = items.borrow_mut();
                    items.extend(args);
                    Ok(Value::Number(items.len() as f64))
                }
                "pop" => Ok(items.borrow_mut().pop().unwrap_or(Value::Undefined)),
                "shift" => {
                    let mut items = items.borrow_mut();
                    if items.is_empty() {
                        Ok(Value::Undefined)
                    } else {
                        Ok(items.remove(0))
                    }
                }
                "unshift" => {
                    let mut items = items.borrow_mut();
                    for (i, value) in args.into_iter().enumerate() {
                        items.insert(i, value);
                    }
                    Ok(Value::Number(items.len() as f64))
                }
                "includes" => {
                    let needle = arg(0);
                    Ok(Value::Bool(
                        items.borrow().iter().any(|v| v.strict_eq(&needle)),
                    ))
                }
                "indexOf" => {
                    let needle = arg(0);
                    let index = items
                        .borrow()
                        .iter()
                        .position(|v| v.strict_eq(&needle))
                        .map(|i| i as f64)
                        .unwrap_or(-1.0);
                    Ok(Value::Number(index))
                }
                "join" => {
                    let sep = match arg(0) {
                        Value::Undefined => ",".to_string(),
                        other => other.to_display_string(),
                    };
                    Ok(Value::Str(
                        items
                            .borrow()
                            .iter()
                            .map(Value::to_display_string)
                            .collect::<Vec<_>>()
                            .join(&sep),
                    ))
                }
                "slice" => {
                    let items = items.borrow();
                    let (start, end) = slice_bounds(&args, items.len());
                    Ok(Value::array(items[start..end].to_vec()))
                }
                "reverse" => {
                    items.borrow_mut().reverse();
                    Ok(receiver.clone())
                }
                _ => Err(method_error(&receiver, method)),
            },
            Value::Str(s) => match method {
                "toUpperCase" => Ok(Value::Str(s.to_uppercase())),
                "toLowerCase" => Ok(Value::Str(s.to_lowercase())),
                "includes" => Ok(Value::Bool(s.contains(&arg(0).to_display_string()))),
                "indexOf" => {
                    let needle = arg(0).to_display_string();
                    // char index, not byte index
                    let index = s
                        .find(&needle)
                        .map(|byte| s[..byte].chars().count() as f64)
                        .unwrap_or(-1.0);
                    Ok(Value::Number(index))
                }
                "charAt" => {
                    let index = arg(0).to_number();
                    let ch = if index >= 0.0 {
                        s.chars().nth(index as usize)
                    } else {
                        None
                    };
                    Ok(Value::Str(ch.map(String::from).unwrap_or_default()))
                }
                "slice" => {
                    let chars: Vec<char> = s.chars().collect();
                    let (start, end) = slice_bounds(&args, chars.len());
                    Ok(Value::Str(chars[start..end].iter().collect()))
                }
                "split" => {
                    let parts: Vec<Value> = match arg(0) {
                        Value::Undefined => vec![Value::Str(s.clone())],
                        sep => {
                            let sep = sep.to_display_string();
                            if sep.is_empty() {
                                s.chars().map(|c| Value::Str(c.to_string())).collect()
                            } else {
                                s.split(&sep).map(|p| Value::Str(p.to_string())).collect()
                            }
                        }
                    };
                    Ok(Value::array(parts))
                }
                "trim" => Ok(Value::Str(s.trim().to_string())),
                "repeat" => {
                    let count = arg(0).to_number();
                    if count < 0.0 || !count.is_finite() {
                        Err(EvalError::runtime("Invalid count value"))
                    } else {
                        Ok(Value::Str(s.repeat(count as usize)))
                    }
                }
                _ => Err(method_error(&receiver, method)),
            },
            Value::Number(n) => match method {
                "toFixed" => {
                    let digits = arg(0).to_number().max(0.0) as usize;
                    Ok(Value::Str(format!("{n:.digits$}")))
                }
                _ => Err(method_error(&receiver, method)),
            },
            Value::Object(fields) => {
                let member = fields.borrow().get(method).cloned();
                match member {
                    Some(Value::Function(f)) => self.call_function(&f, args),
                    Some(Value::Builtin(b)) => self.call_builtin(b, args),
                    _ => Err(method_error(&receiver, method)),
                }
            }
            Value::Undefined | Value::Null => Err(EvalError::runtime(format!(
                "Cannot read properties of {} (reading '{method}')",
                receiver.to_display_string()
            ))),
            _ => Err(method_error(&receiver, method)),
        }
    }
}

fn method_error(receiver: &Value, method: &str) -> EvalError {
    EvalError::runtime(format!(
        "{}.{method} is not a function",
        receiver.type_name()
    ))
}

/// Resolve `slice(start, end)` arguments against a length, clamping and
/// supporting negative offsets.
fn slice_bounds(args: &[Value], len: usize) -> (usize, usize) {
    let resolve = |v: Option<&Value>, default: usize| -> usize {
        match v {
            None | Some(Value::Undefined) => default,
            Some(v) => {
                let n = v.to_number();
                if n.is_nan() {
                    0
                } else if n < 0.0 {
                    len.saturating_sub((-n) as usize)
                } else {
                    (n as usize).min(len)
                }
            }
        }
    };
    let start = resolve(args.first(), 0);
    let end = resolve(args.get(1), len);
    (start, end.max(start))
}

/// Apply a binary operator. Pure over its operands.
fn eval_binary(op: BinOp, lhs: &Value, rhs: &Value) -> Value {
    match op {
        BinOp::Add => {
            // string concatenation wins if either side is stringy or an
            // object (both coerce through toString)
            let stringy = |v: &Value| {
                matches!(
                    v,
                    Value::Str(_) | Value::Array(_) | Value::Object(_) | Value::Function(_)
                )
            };
            if stringy(lhs) || stringy(rhs) {
                Value::Str(format!(
                    "{}{}",
                    lhs.to_display_string(),
                    rhs.to_display_string()
                ))
            } else {
                Value::Number(lhs.to_number() + rhs.to_number())
            }
        }
        BinOp::Sub => Value::Number(lhs.to_number() - rhs.to_number()),
        BinOp::Mul => Value::Number(lhs.to_number() * rhs.to_number()),
        BinOp::Div => Value::Number(lhs.to_number() / rhs.to_number()),
        BinOp::Mod => Value::Number(lhs.to_number() % rhs.to_number()),
        BinOp::EqLoose => Value::Bool(lhs.loose_eq(rhs)),
        BinOp::NotEqLoose => Value::Bool(!lhs.loose_eq(rhs)),
        BinOp::EqStrict => Value::Bool(lhs.strict_eq(rhs)),
        BinOp::NotEqStrict => Value::Bool(!lhs.strict_eq(rhs)),
        BinOp::Less | BinOp::Greater | BinOp::LessEq | BinOp::GreaterEq => {
            let result = match (lhs, rhs) {
                (Value::Str(a), Value::Str(b)) => match op {
                    BinOp::Less => a < b,
                    BinOp::Greater => a > b,
                    BinOp::LessEq => a <= b,
                    _ => a >= b,
                },
                _ => {
                    let a = lhs.to_number();
                    let b = rhs.to_number();
                    match op {
                        BinOp::Less => a < b,
                        BinOp::Greater => a > b,
                        BinOp::LessEq => a <= b,
                        _ => a >= b,
                    }
                }
            };
            Value::Bool(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Vec<String> {
        let program = kata_parser::parse(source).expect("parse");
        let mut interp = Interp::new(Budget::default());
        interp.run(&program).expect("run");
        interp.into_output()
    }

    fn run_err(source: &str) -> EvalError {
        let program = kata_parser::parse(source).expect("parse");
        let mut interp = Interp::new(Budget::default());
        interp.run(&program).expect_err("expected failure")
    }

    #[test]
    fn test_arithmetic_and_logging() {
        assert_eq!(run("console.log(2 + 3 * 4);"), vec!["14"]);
        assert_eq!(run("console.log(10 / 4);"), vec!["2.5"]);
        assert_eq!(run("console.log(7 % 3);"), vec!["1"]);
    }

    #[test]
    fn test_console_joins_arguments_with_spaces() {
        assert_eq!(run(r#"console.log("a", 1, true);"#), vec!["a 1 true"]);
    }

    #[test]
    fn test_console_serializes_objects() {
        assert_eq!(
            run(r#"console.log({ name: "Ada", age: 36 });"#),
            vec![r#"{"name":"Ada","age":36}"#]
        );
        assert_eq!(run("console.log([1, 2, 3]);"), vec!["[1,2,3]"]);
    }

    #[test]
    fn test_string_concat_beats_addition() {
        assert_eq!(run(r#"console.log("n=" + 5);"#), vec!["n=5"]);
        assert_eq!(run(r#"console.log(1 + "2");"#), vec!["12"]);
    }

    #[test]
    fn test_template_literal() {
        assert_eq!(
            run("let name = \"Kata\"; console.log(`hi ${name}, ${1 + 1}`);"),
            vec!["hi Kata, 2"]
        );
    }

    #[test]
    fn test_while_loop_counts() {
        let out = run("let i = 0; while (i < 3) { console.log(i); i++; }");
        assert_eq!(out, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_for_loop_scoping() {
        let out = run("for (let i = 0; i < 2; i++) { console.log(i); }");
        assert_eq!(out, vec!["0", "1"]);
    }

    #[test]
    fn test_for_of_and_for_in() {
        assert_eq!(
            run("for (const x of [10, 20]) { console.log(x); }"),
            vec!["10", "20"]
        );
        assert_eq!(
            run("const o = { a: 1, b: 2 }; for (const k in o) { console.log(k); }"),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_break_and_continue() {
        let out = run(
            "for (let i = 0; i < 5; i++) { if (i === 1) { continue; } if (i === 3) { break; } console.log(i); }",
        );
        assert_eq!(out, vec!["0", "2"]);
    }

    #[test]
    fn test_do_while_runs_once() {
        assert_eq!(run("let i = 9; do { console.log(i); } while (i < 3);"), vec!["9"]);
    }

    #[test]
    fn test_function_call_and_return() {
        let out = run("function add(a, b) { return a + b; } console.log(add(2, 3));");
        assert_eq!(out, vec!["5"]);
    }

    #[test]
    fn test_function_hoisting() {
        let out = run("console.log(twice(4)); function twice(n) { return n * 2; }");
        assert_eq!(out, vec!["8"]);
    }

    #[test]
    fn test_recursion() {
        let out = run(
            "function fact(n) { if (n <= 1) { return 1; } return n * fact(n - 1); } console.log(fact(5));",
        );
        assert_eq!(out, vec!["120"]);
    }

    #[test]
    fn test_unbounded_recursion_overflows() {
        let err = run_err("function f() { return f(); } f();");
        assert!(matches!(err, EvalError::StackOverflow));
        assert_eq!(err.to_string(), "Maximum call stack size exceeded");
    }

    #[test]
    fn test_array_methods() {
        let out = run("let a = [1, 2]; a.push(3); console.log(a.length, a.indexOf(3), a.join(\"-\"));");
        assert_eq!(out, vec!["3 2 1-2-3"]);
    }

    #[test]
    fn test_array_reference_semantics() {
        let out = run("let a = [1]; let b = a; b.push(2); console.log(a);");
        assert_eq!(out, vec!["[1,2]"]);
    }

    #[test]
    fn test_string_methods() {
        let out = run(r#"console.log("Hello".toUpperCase(), "Hello".slice(1, 3), "a,b".split(","));"#);
        assert_eq!(out, vec![r#"HELLO el ["a","b"]"#]);
    }

    #[test]
    fn test_object_property_assignment() {
        let out = run(r#"let o = { a: 1 }; o.b = 2; o["c"] = 3; console.log(o);"#);
        assert_eq!(out, vec![r#"{"a":1,"b":2,"c":3}"#]);
    }

    #[test]
    fn test_math_builtins() {
        assert_eq!(run("console.log(Math.floor(2.7), Math.max(1, 5, 3));"), vec!["2 5"]);
    }

    #[test]
    fn test_const_reassignment_fails() {
        let err = run_err("const c = 1; c = 2;");
        assert!(err.to_string().contains("constant"));
    }

    #[test]
    fn test_undefined_variable_fails() {
        let err = run_err("console.log(missing);");
        assert_eq!(err.to_string(), "missing is not defined");
    }

    #[test]
    fn test_guard_builtin_trips_iteration_limit() {
        let program = kata_parser::parse("while (true) { _checkLoop(); }").expect("parse");
        let mut interp = Interp::new(Budget {
            check_after: 10,
            timeout_ms: 60_000,
            max_iterations: 50,
        });
        let err = interp.run(&program).expect_err("must trip");
        assert!(matches!(err, EvalError::IterationLimit));
    }

    #[test]
    fn test_uninstrumented_loop_is_not_metered() {
        // no guard call, so the budget never ticks; loop exits on its own
        let out = run("let n = 0; while (n < 100000) { n++; } console.log(n);");
        assert_eq!(out, vec!["100000"]);
    }

    #[test]
    fn test_output_captured_before_error_is_kept() {
        let program = kata_parser::parse("console.log(\"first\"); boom();").expect("parse");
        let mut interp = Interp::new(Budget::default());
        assert!(interp.run(&program).is_err());
        assert_eq!(interp.output(), ["first"]);
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(run(r#"console.log(0 || "fallback", 1 && 2);"#), vec!["fallback 2"]);
    }

    #[test]
    fn test_conditional_expression() {
        assert_eq!(run("console.log(5 > 3 ? \"yes\" : \"no\");"), vec!["yes"]);
    }

    #[test]
    fn test_update_expressions() {
        assert_eq!(run("let i = 1; console.log(i++, i, ++i);"), vec!["1 2 3"]);
    }
}
