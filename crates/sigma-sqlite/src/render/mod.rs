//! Target renderers for condition trees.
//!
//! Renderers turn a parsed [`ConditionNode`] into a query string for one
//! target. [`SqlTemplates`] holds the generic SQL shapes (join tokens,
//! predicate templates, the `SELECT` skeleton) that dialect backends build on.

pub mod escape;
mod sqlite;

pub use sqlite::{GeneratedQuery, SqliteBackend};

use crate::condition::ConditionNode;
use crate::error::Result;

/// Trait for rendering a condition tree to a target query language.
pub trait ConditionRenderer: Send + Sync {
    /// Unique name for this renderer
    fn name(&self) -> &str;

    /// Render the tree to a complete query
    fn render(&self, tree: &ConditionNode) -> Result<String>;
}

/// Generic SQL shapes shared by SQL dialects.
///
/// Every method has the plain SQL default; dialects override what differs.
pub trait SqlTemplates: Send + Sync {
    fn and_token(&self) -> &str {
        " AND "
    }

    fn or_token(&self) -> &str {
        " OR "
    }

    fn not_token(&self) -> &str {
        "NOT "
    }

    fn sub_expression(&self, inner: &str) -> String {
        format!("({})", inner)
    }

    fn list_expression(&self, items: &[String]) -> String {
        format!("({})", items.join(", "))
    }

    /// Quote an already cleaned value
    fn value_expression(&self, cleaned: &str) -> String {
        format!("'{}'", cleaned)
    }

    fn null_expression(&self) -> &str {
        "NULL"
    }

    fn map_expression(&self, field: &str, value: &str) -> String {
        format!("{} = {}", field, value)
    }

    fn map_multi(&self, field: &str, values: &str) -> String {
        format!("{} IN {}", field, values)
    }

    fn map_wildcard(&self, field: &str, value: &str) -> String {
        format!("{} LIKE {} ESCAPE '\\'", field, value)
    }

    /// `field: null` in the rule; `= NULL` never matches, so it gets its own shape
    fn map_null(&self, field: &str) -> String {
        format!("{} IS NULL", field)
    }

    fn map_source(&self, field: &str, value: &str) -> String {
        format!("{}={}", field, value)
    }

    fn map_length(&self, field: &str, raw_value: &str) -> String {
        format!("({} {})", field, raw_value)
    }

    /// Outer query around a WHERE fragment; no fragment means no constraint
    fn select(&self, table: &str, condition: Option<&str>) -> String {
        match condition {
            Some(condition) => format!("SELECT * FROM {} WHERE {}", table, condition),
            None => format!("SELECT * FROM {}", table),
        }
    }
}

/// Plain SQL templates with no dialect overrides
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlBase;

impl SqlTemplates for SqlBase {}
