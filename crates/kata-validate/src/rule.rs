//! Declarative structural rules.
//!
//! Lesson content supplies rules as JSON objects tagged by a `type` field
//! (`"declaration"`, `"anyOf"`, ...). The tag set is closed here as an
//! enum so rule dispatch is an exhaustive match; tags outside the set
//! still deserialize, into [`Rule::Unknown`], because lesson content
//! evolves independently of the engine and an unrecognized rule must not
//! break an existing lesson.

use serde::de::{Deserialize, Deserializer};
use serde_json::Value as Json;

/// One structural requirement against the learner's AST.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// `let`/`const`/`var` binding of a given name, optionally with a
    /// required literal initializer.
    Declaration {
        kind: Option<String>,
        name: String,
        init_value: Option<Json>,
    },
    /// A plain assignment (not a declaration) to a name, optionally with
    /// a required literal right-hand side.
    Assignment { name: String, value: Option<Json> },
    /// A call of the shape `object.method(...)`, arguments ignored.
    MethodCall { object: String, method: String },
    /// A call matched by callee name (`"greet"` or `"console.log"`); if
    /// `arguments` is given, at least one actual argument must match one
    /// of the listed values, by identifier name or literal value.
    CallExpression {
        callee: String,
        arguments: Option<Vec<Json>>,
    },
    /// At least one node of the given kind exists anywhere.
    Structure { node_type: String },
    /// A node of the given kind whose properties match a shape pattern.
    SpecificStructure {
        node_type: String,
        properties: Option<Json>,
        description: Option<String>,
    },
    /// At least one of the nested rules must pass.
    AnyOf { rules: Vec<Rule> },
    /// No `console.log` call whose arguments are all static.
    NoHardcodedConsole,
    /// A tag this engine does not know. Vacuously passes.
    Unknown { kind: String },
}

impl Rule {
    /// Build a rule from its JSON form. Infallible: malformed or
    /// unrecognized content degrades to [`Rule::Unknown`].
    pub fn from_value(value: &Json) -> Rule {
        let kind = value.get("type").and_then(Json::as_str).unwrap_or("");
        let str_field = |key: &str| {
            value
                .get(key)
                .and_then(Json::as_str)
                .map(str::to_string)
        };
        match kind {
            "declaration" => match str_field("name") {
                Some(name) => Rule::Declaration {
                    kind: str_field("kind"),
                    name,
                    init_value: value.get("initValue").cloned(),
                },
                None => Rule::Unknown {
                    kind: kind.to_string(),
                },
            },
            "assignment" => match str_field("name") {
                Some(name) => Rule::Assignment {
                    name,
                    value: value.get("value").cloned(),
                },
                None => Rule::Unknown {
                    kind: kind.to_string(),
                },
            },
            "methodCall" => match (str_field("object"), str_field("method")) {
                (Some(object), Some(method)) => Rule::MethodCall { object, method },
                _ => Rule::Unknown {
                    kind: kind.to_string(),
                },
            },
            "callExpression" => match str_field("callee") {
                Some(callee) => Rule::CallExpression {
                    callee,
                    arguments: value
                        .get("arguments")
                        .and_then(Json::as_array)
                        .map(|args| args.to_vec()),
                },
                None => Rule::Unknown {
                    kind: kind.to_string(),
                },
            },
            "structure" => match str_field("nodeType") {
                Some(node_type) => Rule::Structure { node_type },
                None => Rule::Unknown {
                    kind: kind.to_string(),
                },
            },
            "specificStructure" => match str_field("nodeType") {
                Some(node_type) => Rule::SpecificStructure {
                    node_type,
                    properties: value.get("properties").cloned(),
                    description: str_field("description"),
                },
                None => Rule::Unknown {
                    kind: kind.to_string(),
                },
            },
            "anyOf" => Rule::AnyOf {
                rules: value
                    .get("rules")
                    .and_then(Json::as_array)
                    .map(|rules| rules.iter().map(Rule::from_value).collect())
                    .unwrap_or_default(),
            },
            "noHardcodedConsole" => Rule::NoHardcodedConsole,
            other => Rule::Unknown {
                kind: other.to_string(),
            },
        }
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Json::deserialize(deserializer)?;
        Ok(Rule::from_value(&value))
    }
}
