//! Rule evaluation against a parsed program.
//!
//! Rules run in declared order and the first failure wins: `validate`
//! returns immediately with that rule's diagnostic and later rules never
//! run. Each per-kind check is a pure function of the tree returning
//! `Result<(), String>`, so `AnyOf` needs no diagnostic snapshotting:
//! failed alternatives simply drop their `Err`, and total failure
//! synthesizes one generic diagnostic.

use crate::rule::Rule;
use kata_types::ast::{Expr, ExprKind, Program};
use kata_types::jsfmt::js_string_of_json;
use kata_types::visit::{walk, Node, PropView};
use serde_json::Value as Json;

/// Verdict for one rule list against one program.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        ValidationResult {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn fail(diagnostic: String) -> Self {
        ValidationResult {
            valid: false,
            errors: vec![diagnostic],
        }
    }
}

/// Evaluate `rules` in order against `program`, fail-fast.
pub fn validate(program: &Program, rules: &[Rule]) -> ValidationResult {
    for rule in rules {
        if let Err(diagnostic) = check_rule(program, rule) {
            return ValidationResult::fail(diagnostic);
        }
    }
    ValidationResult::ok()
}

fn check_rule(program: &Program, rule: &Rule) -> Result<(), String> {
    match rule {
        Rule::Declaration {
            kind,
            name,
            init_value,
        } => check_declaration(program, kind.as_deref(), name, init_value.as_ref()),
        Rule::Assignment { name, value } => check_assignment(program, name, value.as_ref()),
        Rule::MethodCall { object, method } => check_method_call(program, object, method),
        Rule::CallExpression { callee, arguments } => {
            check_call_expression(program, callee, arguments.as_deref())
        }
        Rule::Structure { node_type } => check_structure(program, node_type),
        Rule::SpecificStructure {
            node_type,
            properties,
            description,
        } => check_specific_structure(program, node_type, properties.as_ref(), description.as_deref()),
        Rule::AnyOf { rules } => check_any_of(program, rules),
        Rule::NoHardcodedConsole => check_no_hardcoded_console(program),
        Rule::Unknown { kind } => {
            tracing::warn!(kind, "ignoring unknown rule kind");
            Ok(())
        }
    }
}

// ── Per-kind checks ───────────────────────────────────────────────────────────

fn check_declaration(
    program: &Program,
    kind: Option<&str>,
    name: &str,
    init_value: Option<&Json>,
) -> Result<(), String> {
    let mut found = false;
    walk(program, &mut |node| {
        let Node::Stmt(stmt) = node else { return };
        let kata_types::ast::StmtKind::VariableDeclaration {
            kind: decl_kind,
            declarations,
        } = &stmt.kind
        else {
            return;
        };
        if let Some(required) = kind {
            if decl_kind.as_str() != required {
                return;
            }
        }
        for decl in declarations {
            if decl.id.name != name {
                continue;
            }
            match init_value {
                Some(expected) => {
                    if let Some(init) = &decl.init {
                        if literal_matches_loose(init, expected) {
                            found = true;
                        }
                    }
                }
                None => found = true,
            }
        }
    });

    if found {
        Ok(())
    } else {
        let kind_part = kind.map(|k| format!("{k} ")).unwrap_or_default();
        let value_part = init_value
            .map(|v| format!(" initialized to {}", js_string_of_json(v)))
            .unwrap_or_default();
        Err(format!(
            "Missing required declaration: {kind_part}{name}{value_part}"
        ))
    }
}

fn check_assignment(program: &Program, name: &str, value: Option<&Json>) -> Result<(), String> {
    let mut found = false;
    walk(program, &mut |node| {
        let Node::Expr(expr) = node else { return };
        let ExprKind::Assignment { left, right, .. } = &expr.kind else {
            return;
        };
        let ExprKind::Identifier(target) = &left.kind else {
            return;
        };
        if target != name {
            return;
        }
        match value {
            Some(expected) => {
                if literal_matches_loose(right, expected) {
                    found = true;
                }
            }
            None => found = true,
        }
    });

    if found {
        Ok(())
    } else {
        let value_part = value
            .map(|v| format!(" to {}", js_string_of_json(v)))
            .unwrap_or_default();
        Err(format!(
            "Missing required assignment: {name} = ...{value_part}"
        ))
    }
}

fn check_method_call(program: &Program, object: &str, method: &str) -> Result<(), String> {
    let mut found = false;
    walk(program, &mut |node| {
        if member_call_names(node).is_some_and(|(obj, prop)| obj == object && prop == method) {
            found = true;
        }
    });

    if found {
        Ok(())
    } else {
        Err(format!("Missing required method call: {object}.{method}()"))
    }
}

fn check_call_expression(
    program: &Program,
    callee: &str,
    arguments: Option<&[Json]>,
) -> Result<(), String> {
    let mut found = false;
    walk(program, &mut |node| {
        let Node::Expr(expr) = node else { return };
        let ExprKind::Call {
            callee: callee_expr,
            arguments: actual_args,
        } = &expr.kind
        else {
            return;
        };
        let callee_name = match &callee_expr.kind {
            ExprKind::Identifier(name) => name.clone(),
            ExprKind::Member {
                object, property, ..
            } => match (&object.kind, &property.kind) {
                (ExprKind::Identifier(obj), ExprKind::Identifier(prop)) => {
                    format!("{obj}.{prop}")
                }
                _ => return,
            },
            _ => return,
        };
        if callee_name != callee {
            return;
        }
        match arguments {
            Some(accepted) => {
                // any accepted argument present is enough; this is not
                // full signature matching
                let matches = actual_args.iter().any(|arg| match &arg.kind {
                    ExprKind::Identifier(name) => {
                        accepted.iter().any(|a| a.as_str() == Some(name))
                    }
                    _ => accepted.iter().any(|a| literal_matches_strict(arg, a)),
                });
                if matches {
                    found = true;
                }
            }
            None => found = true,
        }
    });

    if found {
        Ok(())
    } else {
        let args_part = arguments
            .map(|args| {
                format!(
                    " with arguments: {}",
                    args.iter()
                        .map(js_string_of_json)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
            .unwrap_or_default();
        Err(format!("Missing required call: {callee}({args_part})"))
    }
}

fn check_structure(program: &Program, node_type: &str) -> Result<(), String> {
    let mut found = false;
    walk(program, &mut |node| {
        if node.node_type() == node_type {
            found = true;
        }
    });

    if found {
        Ok(())
    } else {
        Err(format!("Missing required structure: {node_type}"))
    }
}

fn check_specific_structure(
    program: &Program,
    node_type: &str,
    properties: Option<&Json>,
    description: Option<&str>,
) -> Result<(), String> {
    let mut found = false;
    walk(program, &mut |node| {
        if node.node_type() != node_type {
            return;
        }
        let matches = match properties.and_then(Json::as_object) {
            Some(props) => props
                .iter()
                .all(|(key, shape)| match node.property(key) {
                    Some(prop) => prop_matches_shape(&prop, shape),
                    None => false,
                }),
            None => true,
        };
        if matches {
            found = true;
        }
    });

    if found {
        Ok(())
    } else {
        Err(format!(
            "Missing required code structure: {}",
            description.unwrap_or(node_type)
        ))
    }
}

fn check_any_of(program: &Program, rules: &[Rule]) -> Result<(), String> {
    // first Ok wins; failed alternatives discard their diagnostics
    for rule in rules {
        if check_rule(program, rule).is_ok() {
            return Ok(());
        }
    }
    Err("Must match at least one of the required patterns.".to_string())
}

fn check_no_hardcoded_console(program: &Program) -> Result<(), String> {
    let mut hardcoded = false;
    walk(program, &mut |node| {
        let Node::Expr(expr) = node else { return };
        let ExprKind::Call { callee, arguments } = &expr.kind else {
            return;
        };
        let is_console_log = match &callee.kind {
            ExprKind::Member {
                object, property, ..
            } => matches!(
                (&object.kind, &property.kind),
                (ExprKind::Identifier(obj), ExprKind::Identifier(prop))
                    if obj == "console" && prop == "log"
            ),
            _ => false,
        };
        if is_console_log && !arguments.is_empty() && arguments.iter().all(is_static) {
            hardcoded = true;
        }
    });

    if hardcoded {
        Err("Hardcoded console.log statements are not allowed. Use variables or expressions."
            .to_string())
    } else {
        Ok(())
    }
}

// ── Matching helpers ──────────────────────────────────────────────────────────

/// True if a call expression's callee is `obj.prop` with plain identifiers
/// on both sides; returns the pair.
fn member_call_names<'a>(node: Node<'a>) -> Option<(&'a str, &'a str)> {
    let Node::Expr(expr) = node else { return None };
    let ExprKind::Call { callee, .. } = &expr.kind else {
        return None;
    };
    let ExprKind::Member {
        object, property, ..
    } = &callee.kind
    else {
        return None;
    };
    match (&object.kind, &property.kind) {
        (ExprKind::Identifier(obj), ExprKind::Identifier(prop)) => {
            Some((obj.as_str(), prop.as_str()))
        }
        _ => None,
    }
}

/// An expression is static when it can be fully evaluated without any
/// runtime binding: literals, containers of static values, and template
/// strings with no interpolations.
fn is_static(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::NumberLit(_)
        | ExprKind::StringLit(_)
        | ExprKind::BoolLit(_)
        | ExprKind::NullLit => true,
        ExprKind::Array { elements } => elements.iter().all(is_static),
        ExprKind::Object { properties } => properties.iter().all(|p| is_static(&p.value)),
        ExprKind::TemplateLiteral { expressions, .. } => expressions.is_empty(),
        _ => false,
    }
}

/// Loose (`==`-style) comparison between a literal expression and an
/// expected JSON value: `18` matches both `18` and `"18"` in rule content.
fn literal_matches_loose(expr: &Expr, expected: &Json) -> bool {
    match &expr.kind {
        ExprKind::NumberLit(n) => match expected {
            Json::Number(e) => e.as_f64() == Some(*n),
            Json::String(s) => s.trim().parse::<f64>().ok() == Some(*n),
            Json::Bool(b) => (*b as u8 as f64) == *n,
            _ => false,
        },
        ExprKind::StringLit(s) => match expected {
            Json::String(e) => s == e,
            Json::Number(e) => s.trim().parse::<f64>().ok() == e.as_f64(),
            _ => false,
        },
        ExprKind::BoolLit(b) => match expected {
            Json::Bool(e) => b == e,
            Json::Number(e) => e.as_f64() == Some(*b as u8 as f64),
            _ => false,
        },
        ExprKind::NullLit => expected.is_null(),
        _ => false,
    }
}

/// Strict (`===`-style) comparison: types must agree.
fn literal_matches_strict(expr: &Expr, expected: &Json) -> bool {
    match (&expr.kind, expected) {
        (ExprKind::NumberLit(n), Json::Number(e)) => e.as_f64() == Some(*n),
        (ExprKind::StringLit(s), Json::String(e)) => s == e,
        (ExprKind::BoolLit(b), Json::Bool(e)) => b == e,
        (ExprKind::NullLit, Json::Null) => true,
        _ => false,
    }
}

/// Recursive shape match of one projected property against a rule pattern.
///
/// Object patterns descend key by key, with `nodeType` matching the node's
/// kind name; array patterns match list children positionally; scalars
/// compare strictly.
fn prop_matches_shape(prop: &PropView<'_>, shape: &Json) -> bool {
    match shape {
        Json::Object(pattern) => {
            let PropView::Node(node) = prop else {
                return false;
            };
            pattern.iter().all(|(key, sub_shape)| {
                if key == "nodeType" {
                    sub_shape.as_str() == Some(node.node_type())
                } else {
                    match node.property(key) {
                        Some(child) => prop_matches_shape(&child, sub_shape),
                        None => false,
                    }
                }
            })
        }
        Json::Array(pattern) => {
            let PropView::List(children) = prop else {
                return false;
            };
            pattern.iter().enumerate().all(|(i, sub_shape)| {
                children
                    .get(i)
                    .is_some_and(|child| prop_matches_shape(&PropView::Node(*child), sub_shape))
            })
        }
        Json::String(expected) => matches!(prop, PropView::Str(s) if s == expected),
        Json::Number(expected) => {
            matches!(prop, PropView::Num(n) if expected.as_f64() == Some(*n))
        }
        Json::Bool(expected) => matches!(prop, PropView::Bool(b) if b == expected),
        Json::Null => matches!(prop, PropView::Null),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules_of(json: Json) -> Vec<Rule> {
        json.as_array()
            .expect("rule array")
            .iter()
            .map(Rule::from_value)
            .collect()
    }

    fn validate_source(source: &str, rules: Json) -> ValidationResult {
        let program = kata_parser::parse(source).expect("parse");
        validate(&program, &rules_of(rules))
    }

    #[test]
    fn test_declaration_with_init_value() {
        let result = validate_source(
            "let age = 18;",
            json!([{ "type": "declaration", "kind": "let", "name": "age", "initValue": 18 }]),
        );
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_declaration_wrong_kind_fails() {
        let result = validate_source(
            "const age = 18;",
            json!([{ "type": "declaration", "kind": "let", "name": "age" }]),
        );
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["Missing required declaration: let age"]);
    }

    #[test]
    fn test_declaration_init_value_is_loose() {
        // rule content sometimes writes numbers as strings
        let result = validate_source(
            "let age = 18;",
            json!([{ "type": "declaration", "kind": "let", "name": "age", "initValue": "18" }]),
        );
        assert!(result.valid);
    }

    #[test]
    fn test_declaration_missing_init_diagnostic() {
        let result = validate_source(
            "let age;",
            json!([{ "type": "declaration", "kind": "let", "name": "age", "initValue": 18 }]),
        );
        assert_eq!(
            result.errors,
            vec!["Missing required declaration: let age initialized to 18"]
        );
    }

    #[test]
    fn test_assignment_rule() {
        let result = validate_source(
            "let x; x = 5;",
            json!([{ "type": "assignment", "name": "x", "value": 5 }]),
        );
        assert!(result.valid);

        let result = validate_source(
            "let x = 5;",
            json!([{ "type": "assignment", "name": "x" }]),
        );
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["Missing required assignment: x = ..."]);
    }

    #[test]
    fn test_method_call_rule() {
        let result = validate_source(
            "console.log(1);",
            json!([{ "type": "methodCall", "object": "console", "method": "log" }]),
        );
        assert!(result.valid);

        let result = validate_source(
            "greet();",
            json!([{ "type": "methodCall", "object": "console", "method": "log" }]),
        );
        assert_eq!(
            result.errors,
            vec!["Missing required method call: console.log()"]
        );
    }

    #[test]
    fn test_call_expression_by_joined_name() {
        let result = validate_source(
            "console.log(msg);",
            json!([{ "type": "callExpression", "callee": "console.log" }]),
        );
        assert!(result.valid);
    }

    #[test]
    fn test_call_expression_argument_matching() {
        // identifier argument matches its name; literal matches its value
        let rules = json!([{
            "type": "callExpression", "callee": "greet", "arguments": ["name", 5]
        }]);
        assert!(validate_source("greet(name);", rules.clone()).valid);
        assert!(validate_source("greet(5);", rules.clone()).valid);

        let result = validate_source("greet(other);", rules);
        assert_eq!(
            result.errors,
            vec!["Missing required call: greet( with arguments: name, 5)"]
        );
    }

    #[test]
    fn test_structure_rule() {
        let result = validate_source(
            "for (let i = 0; i < 3; i++) {}",
            json!([{ "type": "structure", "nodeType": "ForStatement" }]),
        );
        assert!(result.valid);

        let result = validate_source(
            "let x = 1;",
            json!([{ "type": "structure", "nodeType": "WhileStatement" }]),
        );
        assert_eq!(result.errors, vec!["Missing required structure: WhileStatement"]);
    }

    #[test]
    fn test_specific_structure_shape_match() {
        let rules = json!([{
            "type": "specificStructure",
            "nodeType": "IfStatement",
            "properties": {
                "test": {
                    "nodeType": "BinaryExpression",
                    "operator": ">="
                }
            },
            "description": "an if comparing with >="
        }]);
        assert!(validate_source("if (age >= 18) { }", rules.clone()).valid);

        let result = validate_source("if (age > 18) { }", rules);
        assert_eq!(
            result.errors,
            vec!["Missing required code structure: an if comparing with >="]
        );
    }

    #[test]
    fn test_specific_structure_nested_identifier_name() {
        let rules = json!([{
            "type": "specificStructure",
            "nodeType": "BinaryExpression",
            "properties": {
                "left": { "nodeType": "Identifier", "name": "age" },
                "right": { "nodeType": "Literal", "value": 18 }
            }
        }]);
        assert!(validate_source("if (age >= 18) { }", rules.clone()).valid);
        assert!(!validate_source("if (height >= 18) { }", rules).valid);
    }

    #[test]
    fn test_any_of_first_pass_wins() {
        let rules = json!([{
            "type": "anyOf",
            "rules": [
                { "type": "structure", "nodeType": "ForStatement" },
                { "type": "structure", "nodeType": "WhileStatement" }
            ]
        }]);
        assert!(validate_source("while (x) { }", rules.clone()).valid);
        assert!(validate_source("for (let i = 0; i < 1; i++) { }", rules).valid);
    }

    #[test]
    fn test_any_of_never_leaks_alternative_diagnostics() {
        let result = validate_source(
            "while (x) { }",
            json!([{
                "type": "anyOf",
                "rules": [
                    { "type": "structure", "nodeType": "ForStatement" },
                    { "type": "structure", "nodeType": "WhileStatement" }
                ]
            }]),
        );
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_any_of_total_failure_is_one_generic_diagnostic() {
        let result = validate_source(
            "let x = 1;",
            json!([{
                "type": "anyOf",
                "rules": [
                    { "type": "structure", "nodeType": "ForStatement" },
                    { "type": "structure", "nodeType": "WhileStatement" }
                ]
            }]),
        );
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["Must match at least one of the required patterns."]
        );
    }

    #[test]
    fn test_no_hardcoded_console() {
        let rule = json!([{ "type": "noHardcodedConsole" }]);
        let result = validate_source(r#"console.log("hi");"#, rule.clone());
        assert_eq!(
            result.errors,
            vec!["Hardcoded console.log statements are not allowed. Use variables or expressions."]
        );

        assert!(validate_source("console.log(name);", rule.clone()).valid);
        // a zero-argument call is not a violation
        assert!(validate_source("console.log();", rule.clone()).valid);
        // one runtime argument redeems the call
        assert!(validate_source(r#"console.log("total:", total);"#, rule).valid);
    }

    #[test]
    fn test_static_containers_and_templates() {
        let rule = json!([{ "type": "noHardcodedConsole" }]);
        assert!(!validate_source("console.log([1, 2, 3]);", rule.clone()).valid);
        assert!(!validate_source("console.log(`plain`);", rule.clone()).valid);
        assert!(validate_source("console.log(`n=${n}`);", rule.clone()).valid);
        assert!(validate_source("console.log([1, x]);", rule).valid);
    }

    #[test]
    fn test_fail_fast_reports_first_failure_only() {
        let result = validate_source(
            "let x = 1;",
            json!([
                { "type": "declaration", "kind": "let", "name": "x" },
                { "type": "structure", "nodeType": "WhileStatement" },
                { "type": "structure", "nodeType": "ForStatement" }
            ]),
        );
        assert!(!result.valid);
        // the second rule fails first; the third is never evaluated
        assert_eq!(result.errors, vec!["Missing required structure: WhileStatement"]);
    }

    #[test]
    fn test_unknown_rule_kind_passes() {
        let result = validate_source(
            "let x = 1;",
            json!([{ "type": "someFutureRule" }]),
        );
        assert!(result.valid);
    }

    #[test]
    fn test_empty_rule_list_is_valid() {
        let result = validate_source("let x = 1;", json!([]));
        assert!(result.valid);
    }
}
