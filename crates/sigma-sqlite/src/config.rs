//! Backend configuration
//!
//! Loaded from a TOML document such as:
//!
//! ```toml
//! table = "eventlog"
//! fts_table = "eventlog_fts"
//! list_handling = "direct_literals"
//!
//! [field_mappings]
//! CommandLine = "process_command_line"
//! "CommandLine|length" = "LENGTH(process_command_line)"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// How top-level list values on map items are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListHandling {
    /// Lists are accepted as direct literals alongside strings and integers
    #[default]
    DirectLiterals,
    /// Only strings and integers are direct literals; lists need dedicated handling
    SpecialHandling,
}

/// SQLite backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteBackendConfig {
    /// Table queried in the generated `SELECT`
    pub table: String,
    /// MATCH target for full-text clauses; falls back to `table`
    pub fts_table: Option<String>,
    pub list_handling: ListHandling,
    /// Logical rule field name to physical column expression
    pub field_mappings: HashMap<String, String>,
}

impl Default for SqliteBackendConfig {
    fn default() -> Self {
        Self {
            table: "eventlog".to_string(),
            fts_table: None,
            list_handling: ListHandling::default(),
            field_mappings: HashMap::new(),
        }
    }
}

impl SqliteBackendConfig {
    /// Config for the given table with everything else defaulted
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), table = %config.table, "Loaded backend config");
        Ok(config)
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_fts_table(mut self, fts_table: impl Into<String>) -> Self {
        self.fts_table = Some(fts_table.into());
        self
    }

    pub fn with_list_handling(mut self, list_handling: ListHandling) -> Self {
        self.list_handling = list_handling;
        self
    }

    pub fn with_field_mapping(
        mut self,
        field: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        self.field_mappings.insert(field.into(), expression.into());
        self
    }

    /// Table named in MATCH clauses
    pub fn match_table(&self) -> &str {
        self.fts_table.as_deref().unwrap_or(&self.table)
    }
}
