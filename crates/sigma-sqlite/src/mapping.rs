//! Field name resolution.
//!
//! Rule field names are resolved to physical column expressions before a
//! predicate is rendered. The mapper's output is also how the translator
//! learns that a field is a length computation or a categorical column, so
//! that detection lives in [`FieldShape::classify`] and nowhere else.

use crate::condition::MapValue;
use std::collections::HashMap;

/// Resolves a logical field name to a physical column expression.
pub trait FieldMapper: Send + Sync {
    fn resolve(&self, field: &str, value: &MapValue) -> String;
}

/// Mapper backed by a static name table; unknown fields pass through.
#[derive(Debug, Clone, Default)]
pub struct ConfigFieldMapper {
    mappings: HashMap<String, String>,
}

impl ConfigFieldMapper {
    pub fn new(mappings: HashMap<String, String>) -> Self {
        Self { mappings }
    }
}

impl FieldMapper for ConfigFieldMapper {
    fn resolve(&self, field: &str, _value: &MapValue) -> String {
        self.mappings
            .get(field)
            .cloned()
            .unwrap_or_else(|| field.to_string())
    }
}

/// What a resolved field expression computes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// `LENGTH(...)`: compared numerically against the raw value
    Length,
    /// Source/category column (`sourcetype`)
    Categorical,
    Plain,
}

impl FieldShape {
    /// Classify a physical expression by the markers the mapper emits.
    pub fn classify(expression: &str) -> Self {
        if expression.contains("LENGTH") {
            Self::Length
        } else if expression.contains("sourcetype") {
            Self::Categorical
        } else {
            Self::Plain
        }
    }
}
