//! Sigma condition tree to SQLite translation.
//!
//! Takes an already parsed Sigma detection condition and renders it as a
//! SQLite query, using FTS5 `MATCH` for bare keywords and `LIKE` for
//! wildcard field values.
//!
//! ## Features
//!
//! - **Single MATCH per query**: flat keyword groups fold into one FTS phrase;
//!   queries needing more than one MATCH are rejected
//! - **Wildcard translation**: Sigma `*`/`?` become SQL `%`/`_`, literal SQL
//!   wildcards are escaped
//! - **Field mapping**: rule field names resolve to column expressions via
//!   config or a custom [`FieldMapper`]
//!
//! ## Usage
//!
//! ```rust
//! use sigma_sqlite::{ConditionNode, SqliteBackend, SqliteBackendConfig};
//!
//! let backend = SqliteBackend::new(SqliteBackendConfig::new("eventlog"));
//! let tree = ConditionNode::and([
//!     ConditionNode::map_item("Image", "*\\whoami.exe"),
//!     ConditionNode::keyword("admin"),
//! ]);
//!
//! let sql = backend.convert(&tree)?;
//! assert_eq!(
//!     sql,
//!     r#"SELECT * FROM eventlog WHERE Image LIKE '%\\whoami.exe' ESCAPE '\' AND eventlog MATCH ('"admin"')"#
//! );
//! # Ok::<(), sigma_sqlite::TranslateError>(())
//! ```

pub mod condition;
pub mod config;
pub mod error;
pub mod mapping;
pub mod render;

// Re-exports
pub use condition::{ConditionNode, MapValue, Scalar};
pub use config::{ListHandling, SqliteBackendConfig};
pub use error::{ConfigError, Result, TranslateError};
pub use mapping::{ConfigFieldMapper, FieldMapper, FieldShape};
pub use render::{ConditionRenderer, GeneratedQuery, SqlBase, SqlTemplates, SqliteBackend};
