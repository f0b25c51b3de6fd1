//! Condition tree consumed by the backend.
//!
//! The tree is built once per rule by the upstream Sigma parser and is only
//! ever read during translation. JSON form (externally tagged):
//!
//! ```json
//! {"and": [
//!     {"map_item": {"field": "Image", "value": "*\\cmd.exe"}},
//!     {"not": {"map_item": {"field": "User", "value": ["SYSTEM", "LOCAL SERVICE"]}}}
//! ]}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single node of a parsed detection condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionNode {
    /// Conjunction of the children, in order
    And(Vec<ConditionNode>),
    /// Disjunction of the children, in order
    Or(Vec<ConditionNode>),
    /// Negation of a single operand
    Not(Box<ConditionNode>),
    /// Nested condition, e.g. a referenced selection
    Subexpression(Box<ConditionNode>),
    /// `field` compared against `value`
    MapItem { field: String, value: MapValue },
    /// Bare search term with no field, matched against the full text
    Value(Scalar),
}

impl ConditionNode {
    pub fn and(children: impl IntoIterator<Item = ConditionNode>) -> Self {
        Self::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = ConditionNode>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    pub fn not(operand: ConditionNode) -> Self {
        Self::Not(Box::new(operand))
    }

    pub fn group(inner: ConditionNode) -> Self {
        Self::Subexpression(Box::new(inner))
    }

    pub fn map_item(field: impl Into<String>, value: impl Into<MapValue>) -> Self {
        Self::MapItem {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Bare keyword term
    pub fn keyword(value: impl Into<Scalar>) -> Self {
        Self::Value(value.into())
    }

    /// The scalar carried by a bare value node, if this is one
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Value(scalar) => Some(scalar),
            _ => None,
        }
    }
}

/// Scalar value appearing in a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Int(i64),
}

impl Scalar {
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Value side of a map item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    /// `field: null` in the rule
    Null,
}

impl MapValue {
    /// Type name used in error reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(Scalar::String(_)) => "string",
            Self::Scalar(Scalar::Int(_)) => "integer",
            Self::List(_) => "list",
            Self::Null => "null",
        }
    }
}

/// Untranslated text, used where the value is structural rather than textual
impl fmt::Display for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => scalar.fmt(f),
            Self::List(items) => {
                let rendered: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                f.write_str(&rendered.join(", "))
            }
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<Scalar> for MapValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for MapValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<String> for MapValue {
    fn from(value: String) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i64> for MapValue {
    fn from(value: i64) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<Vec<Scalar>> for MapValue {
    fn from(values: Vec<Scalar>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for MapValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(Scalar::from).collect())
    }
}

impl From<Vec<i64>> for MapValue {
    fn from(values: Vec<i64>) -> Self {
        Self::List(values.into_iter().map(Scalar::from).collect())
    }
}
