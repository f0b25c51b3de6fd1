//! SQLite condition renderer.
//!
//! Renders a condition tree to SQLite SQL with:
//! - FTS5 `MATCH` for bare keyword terms
//! - `LIKE ... ESCAPE '\'` for wildcard values
//! - `IN (...)` for multi-value fields
//!
//! SQLite allows the MATCH operator at most once per query. Flat AND/OR
//! groups of keywords are therefore folded into a single MATCH phrase, and a
//! query that still ends up with several MATCH clauses is rejected.

use crate::condition::{ConditionNode, MapValue, Scalar};
use crate::config::{ListHandling, SqliteBackendConfig};
use crate::error::{Result, TranslateError};
use crate::mapping::{ConfigFieldMapper, FieldMapper, FieldShape};
use crate::render::escape::{clean_value, has_wildcard};
use crate::render::{ConditionRenderer, SqlBase, SqlTemplates};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::{debug, trace};

/// SQLite backend with configurable tables, field mapping and SQL templates.
///
/// The backend itself is immutable; each translation gets its own
/// translation context, so one backend can serve concurrent callers.
pub struct SqliteBackend {
    config: SqliteBackendConfig,
    mapper: Arc<dyn FieldMapper>,
    templates: Arc<dyn SqlTemplates>,
}

/// Output of [`SqliteBackend::generate_query`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuery {
    /// The generated query string
    pub sql: String,
    /// Number of MATCH clauses emitted while generating `sql`
    pub fts_count: usize,
}

impl Default for SqliteBackend {
    fn default() -> Self {
        Self::new(SqliteBackendConfig::default())
    }
}

impl SqliteBackend {
    /// Create a backend that maps fields through `config.field_mappings`
    pub fn new(config: SqliteBackendConfig) -> Self {
        let mapper = ConfigFieldMapper::new(config.field_mappings.clone());
        Self {
            config,
            mapper: Arc::new(mapper),
            templates: Arc::new(SqlBase),
        }
    }

    /// Replace the field mapper
    pub fn with_mapper(mut self, mapper: impl FieldMapper + 'static) -> Self {
        self.mapper = Arc::new(mapper);
        self
    }

    /// Replace the SQL templates
    pub fn with_templates(mut self, templates: impl SqlTemplates + 'static) -> Self {
        self.templates = Arc::new(templates);
        self
    }

    pub fn config(&self) -> &SqliteBackendConfig {
        &self.config
    }

    /// Translate a tree into a full query without the MATCH count check.
    ///
    /// Pair with [`check_fts`](Self::check_fts), or use
    /// [`convert`](Self::convert) which runs both.
    pub fn generate_query(&self, tree: &ConditionNode) -> Result<GeneratedQuery> {
        let mut translator = Translator::new(self);
        let condition = translator.generate_node(tree)?;
        let sql = self.templates.select(&self.config.table, condition.as_deref());

        debug!(
            table = %self.config.table,
            fts_count = translator.ctx.fts_count,
            "Generated SQLite query"
        );

        Ok(GeneratedQuery {
            sql,
            fts_count: translator.ctx.fts_count,
        })
    }

    /// Reject a generated query that uses MATCH more than once
    pub fn check_fts(&self, query: &GeneratedQuery) -> Result<()> {
        ensure_single_match(query.fts_count, &query.sql)
    }

    /// Translate a tree into a checked, complete query
    pub fn convert(&self, tree: &ConditionNode) -> Result<String> {
        let query = self.generate_query(tree)?;
        self.check_fts(&query)?;
        Ok(query.sql)
    }

    /// Translate a tree into a checked WHERE fragment only.
    ///
    /// Returns `None` when the tree places no constraint on rows.
    pub fn generate_where(&self, tree: &ConditionNode) -> Result<Option<String>> {
        let mut translator = Translator::new(self);
        let condition = translator.generate_node(tree)?;
        if let Some(condition) = &condition {
            ensure_single_match(translator.ctx.fts_count, condition)?;
        }
        Ok(condition)
    }
}

impl ConditionRenderer for SqliteBackend {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn render(&self, tree: &ConditionNode) -> Result<String> {
        self.convert(tree)
    }
}

fn ensure_single_match(fts_count: usize, query: &str) -> Result<()> {
    if fts_count > 1 {
        debug!(fts_count, "Rejecting query with multiple MATCH clauses");
        return Err(TranslateError::MultipleFtsClauses {
            count: fts_count,
            query: query.to_string(),
        });
    }
    Ok(())
}

/// State for one translation; never shared between translations.
#[derive(Debug, Default)]
struct TranslationContext {
    /// Set while rendering the value side of a map item
    in_map_item: bool,
    fts_count: usize,
}

struct Translator<'a> {
    backend: &'a SqliteBackend,
    ctx: TranslationContext,
}

impl<'a> Translator<'a> {
    fn new(backend: &'a SqliteBackend) -> Self {
        Self {
            backend,
            ctx: TranslationContext::default(),
        }
    }

    fn templates(&self) -> &'a dyn SqlTemplates {
        self.backend.templates.as_ref()
    }

    fn generate_node(&mut self, node: &ConditionNode) -> Result<Option<String>> {
        let templates = self.templates();
        match node {
            ConditionNode::And(children) => self.generate_and_or(children, templates.and_token()),
            ConditionNode::Or(children) => self.generate_and_or(children, templates.or_token()),
            ConditionNode::Not(operand) => Ok(self
                .generate_node(operand)?
                .map(|inner| format!("{}{}", templates.not_token(), inner))),
            ConditionNode::Subexpression(inner) => Ok(self
                .generate_node(inner)?
                .map(|inner| templates.sub_expression(&inner))),
            ConditionNode::MapItem { field, value } => self.generate_map_item(field, value).map(Some),
            ConditionNode::Value(scalar) => self.generate_value_node(scalar).map(Some),
        }
    }

    /// Children fold into one MATCH phrase when they are all bare strings or
    /// all bare integers and we are not rendering a map item value.
    fn requires_fts(&self, children: &[ConditionNode]) -> bool {
        // An empty group would be an empty MATCH phrase; it contributes nothing instead
        if self.ctx.in_map_item || children.is_empty() {
            return false;
        }
        let scalars: Option<Vec<&Scalar>> = children.iter().map(ConditionNode::as_scalar).collect();
        match scalars {
            Some(scalars) => {
                scalars.iter().all(|s| s.is_string()) || scalars.iter().all(|s| s.is_int())
            }
            None => false,
        }
    }

    fn generate_and_or(&mut self, children: &[ConditionNode], token: &str) -> Result<Option<String>> {
        if self.requires_fts(children) {
            let separator = format!("\"{}\"", token);
            let phrase = children
                .iter()
                .filter_map(ConditionNode::as_scalar)
                .map(|scalar| clean_value(&scalar.to_string()))
                .collect::<Vec<_>>()
                .join(separator.as_str());
            return self.generate_fts(&phrase).map(Some);
        }

        let mut fragments = Vec::with_capacity(children.len());
        for child in children {
            if let Some(fragment) = self.generate_node(child)? {
                fragments.push(fragment);
            }
        }

        if fragments.is_empty() {
            Ok(None)
        } else {
            Ok(Some(fragments.join(token)))
        }
    }

    fn generate_fts(&mut self, phrase: &str) -> Result<String> {
        if has_wildcard(phrase) {
            return Err(TranslateError::UnsupportedFtsWildcard {
                phrase: phrase.to_string(),
            });
        }

        self.ctx.fts_count += 1;
        trace!(phrase, fts_count = self.ctx.fts_count, "Emitting MATCH clause");

        Ok(format!(
            "{} MATCH ('\"{}\"')",
            self.backend.config.match_table(),
            phrase
        ))
    }

    /// Bare scalar: a quoted literal inside a map item, a MATCH term outside.
    fn generate_value_node(&mut self, scalar: &Scalar) -> Result<String> {
        let cleaned = clean_value(&scalar.to_string());
        if self.ctx.in_map_item {
            Ok(self.templates().value_expression(&cleaned))
        } else {
            self.generate_fts(&cleaned)
        }
    }

    fn generate_value(&mut self, value: &MapValue) -> Result<String> {
        match value {
            MapValue::Scalar(scalar) => self.generate_value_node(scalar),
            MapValue::List(items) => {
                let rendered = items
                    .iter()
                    .map(|item| self.generate_value_node(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(self.templates().list_expression(&rendered))
            }
            MapValue::Null => Ok(self.templates().null_expression().to_string()),
        }
    }

    fn enter_map_item(&mut self) -> MapItemScope<'_, 'a> {
        let previous = std::mem::replace(&mut self.ctx.in_map_item, true);
        MapItemScope {
            translator: self,
            previous,
        }
    }

    fn generate_map_item(&mut self, field: &str, value: &MapValue) -> Result<String> {
        let mut scope = self.enter_map_item();
        scope.map_item_predicate(field, value)
    }

    /// Predicate shapes are tried in a fixed order; the first match wins.
    /// Null is checked up front since no comparison shape can match it.
    fn map_item_predicate(&mut self, field: &str, value: &MapValue) -> Result<String> {
        let templates = self.templates();
        let column = self.backend.mapper.resolve(field, value);
        if *value == MapValue::Null {
            return Ok(templates.map_null(&column));
        }
        let generated = self.generate_value(value)?;
        let wildcard = has_wildcard(&generated);
        let shape = FieldShape::classify(&column);

        if is_multi_value(&generated) && !wildcard {
            return Ok(templates.map_multi(&column, &generated));
        }
        if shape == FieldShape::Length {
            return Ok(templates.map_length(&column, &value.to_string()));
        }
        if let MapValue::List(items) = value {
            return self.generate_map_item_list(&column, items);
        }
        if self.is_direct_literal(value) {
            return Ok(if wildcard {
                templates.map_wildcard(&column, &generated)
            } else {
                templates.map_expression(&column, &generated)
            });
        }
        if shape == FieldShape::Categorical {
            return Ok(templates.map_source(&column, &generated));
        }
        if wildcard {
            return Ok(templates.map_wildcard(&column, &generated));
        }

        Err(TranslateError::UnsupportedValueType {
            kind: value.kind().to_string(),
        })
    }

    fn is_direct_literal(&self, value: &MapValue) -> bool {
        match value {
            MapValue::Scalar(_) => true,
            MapValue::List(_) => self.backend.config.list_handling == ListHandling::DirectLiterals,
            MapValue::Null => false,
        }
    }

    /// `(f LIKE v1 ESCAPE '\' OR f LIKE v2 ESCAPE '\' ...)`
    fn generate_map_item_list(&mut self, column: &str, items: &[Scalar]) -> Result<String> {
        if items.is_empty() {
            return Err(TranslateError::UnsupportedValueType {
                kind: "empty list".to_string(),
            });
        }

        let templates = self.templates();
        let mut predicates = Vec::with_capacity(items.len());
        for item in items {
            let value = self.generate_value_node(item)?;
            predicates.push(templates.map_wildcard(column, &value));
        }

        Ok(templates.sub_expression(&predicates.join(templates.or_token())))
    }
}

/// Parenthesized, comma separated value list such as `('a', 'b')`
fn is_multi_value(generated: &str) -> bool {
    generated.starts_with('(') && generated.ends_with(')') && generated.contains(',')
}

/// Map item context guard; restores the previous flag on drop.
struct MapItemScope<'t, 'a> {
    translator: &'t mut Translator<'a>,
    previous: bool,
}

impl<'a> Deref for MapItemScope<'_, 'a> {
    type Target = Translator<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.translator
    }
}

impl<'a> DerefMut for MapItemScope<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.translator
    }
}

impl Drop for MapItemScope<'_, '_> {
    fn drop(&mut self) {
        self.translator.ctx.in_map_item = self.previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn backend() -> SqliteBackend {
        SqliteBackend::default()
    }

    fn convert(tree: &ConditionNode) -> String {
        backend().convert(tree).unwrap()
    }

    fn kw(value: &str) -> ConditionNode {
        ConditionNode::keyword(value)
    }

    // =========================================================================
    // Keyword / full-text search tests
    // =========================================================================

    #[test]
    fn test_single_keyword() {
        insta::assert_snapshot!(
            convert(&kw("alpha")),
            @r#"SELECT * FROM eventlog WHERE eventlog MATCH ('"alpha"')"#
        );
    }

    #[test]
    fn test_and_keywords_fold_into_one_phrase() {
        let query = backend()
            .generate_query(&ConditionNode::and([kw("alpha"), kw("beta")]))
            .unwrap();

        insta::assert_snapshot!(
            query.sql,
            @r#"SELECT * FROM eventlog WHERE eventlog MATCH ('"alpha" AND "beta"')"#
        );
        assert_eq!(query.fts_count, 1);
    }

    #[test]
    fn test_single_child_and_folds_into_one_match() {
        let query = backend()
            .generate_query(&ConditionNode::and([kw("x")]))
            .unwrap();

        assert_eq!(query.sql, r#"SELECT * FROM eventlog WHERE eventlog MATCH ('"x"')"#);
        assert_eq!(query.fts_count, 1);
    }

    #[test]
    fn test_single_child_or_integer_folds_into_one_match() {
        let query = backend()
            .generate_query(&ConditionNode::or([ConditionNode::keyword(5_i64)]))
            .unwrap();

        assert!(query.sql.ends_with(r#"eventlog MATCH ('"5"')"#));
        assert_eq!(query.fts_count, 1);
    }

    #[test]
    fn test_three_and_keywords_single_match() {
        let query = backend()
            .generate_query(&ConditionNode::and([kw("alpha"), kw("beta"), kw("gamma")]))
            .unwrap();

        assert_eq!(query.sql.matches("MATCH").count(), 1);
        assert!(query.sql.contains(r#"('"alpha" AND "beta" AND "gamma"')"#));
        assert_eq!(query.fts_count, 1);
    }

    #[test]
    fn test_or_keywords_fold_into_one_phrase() {
        let sql = convert(&ConditionNode::or([kw("mimikatz"), kw("sekurlsa")]));

        assert!(sql.ends_with(r#"eventlog MATCH ('"mimikatz" OR "sekurlsa"')"#));
    }

    #[test]
    fn test_integer_keywords_fold_into_one_phrase() {
        let tree = ConditionNode::or([ConditionNode::keyword(1_i64), ConditionNode::keyword(2_i64)]);

        assert!(convert(&tree).ends_with(r#"eventlog MATCH ('"1" OR "2"')"#));
    }

    #[test]
    fn test_keyword_quote_escaped() {
        assert!(convert(&kw("it's")).ends_with(r#"eventlog MATCH ('"it''s"')"#));
    }

    #[test]
    fn test_mixed_types_not_folded() {
        let tree = ConditionNode::or([kw("foo"), ConditionNode::keyword(42_i64)]);
        let query = backend().generate_query(&tree).unwrap();

        assert_eq!(
            query.sql,
            r#"SELECT * FROM eventlog WHERE eventlog MATCH ('"foo"') OR eventlog MATCH ('"42"')"#
        );
        assert_eq!(query.fts_count, 2);
        assert!(matches!(
            backend().check_fts(&query),
            Err(TranslateError::MultipleFtsClauses { count: 2, .. })
        ));
    }

    #[test]
    fn test_keyword_wildcard_rejected() {
        let result = backend().convert(&kw("foo*"));

        assert_eq!(
            result,
            Err(TranslateError::UnsupportedFtsWildcard {
                phrase: "foo%".to_string()
            })
        );
    }

    #[test]
    fn test_folded_phrase_wildcard_rejected() {
        let result = backend().convert(&ConditionNode::and([kw("ok"), kw("bad_term")]));

        assert!(matches!(
            result,
            Err(TranslateError::UnsupportedFtsWildcard { .. })
        ));
    }

    #[test]
    fn test_custom_fts_table() {
        let backend = SqliteBackend::new(SqliteBackendConfig::new("logs").with_fts_table("logs_fts"));

        assert_eq!(
            backend.convert(&kw("x")).unwrap(),
            r#"SELECT * FROM logs WHERE logs_fts MATCH ('"x"')"#
        );
    }

    // =========================================================================
    // MATCH count invariant
    // =========================================================================

    #[test]
    fn test_two_fts_subtrees_rejected() {
        let tree = ConditionNode::and([
            ConditionNode::group(ConditionNode::or([kw("a"), kw("b")])),
            ConditionNode::group(ConditionNode::or([kw("c"), kw("d")])),
        ]);
        let query = backend().generate_query(&tree).unwrap();

        assert_eq!(query.fts_count, 2);
        assert_eq!(
            backend().check_fts(&query),
            Err(TranslateError::MultipleFtsClauses {
                count: 2,
                query: query.sql.clone(),
            })
        );
        assert!(backend().convert(&tree).is_err());
    }

    #[test]
    fn test_count_does_not_leak_between_queries() {
        let backend = backend();
        let bad = ConditionNode::or([kw("foo"), ConditionNode::keyword(1_i64)]);

        assert!(backend.convert(&bad).is_err());
        assert!(backend.convert(&kw("foo")).is_ok());
        assert_eq!(backend.generate_query(&kw("foo")).unwrap().fts_count, 1);
    }

    #[test]
    fn test_generate_where_checks_match_count() {
        let tree = ConditionNode::or([kw("foo"), ConditionNode::keyword(1_i64)]);

        assert!(matches!(
            backend().generate_where(&tree),
            Err(TranslateError::MultipleFtsClauses { count: 2, .. })
        ));
    }

    // =========================================================================
    // Map item tests
    // =========================================================================

    fn where_of(tree: &ConditionNode) -> String {
        backend().generate_where(tree).unwrap().unwrap()
    }

    #[test]
    fn test_map_item_equality() {
        assert_eq!(where_of(&ConditionNode::map_item("a", "foo")), "a = 'foo'");
    }

    #[test]
    fn test_map_item_integer_equality() {
        assert_eq!(
            where_of(&ConditionNode::map_item("EventID", 4688_i64)),
            "EventID = '4688'"
        );
    }

    #[test]
    fn test_map_item_wildcard() {
        assert_eq!(
            where_of(&ConditionNode::map_item("a", "foo*bar")),
            r"a LIKE 'foo%bar' ESCAPE '\'"
        );
    }

    #[test]
    fn test_map_item_underscore_uses_like() {
        assert_eq!(
            where_of(&ConditionNode::map_item("a", "x_y")),
            r"a LIKE 'x\_y' ESCAPE '\'"
        );
    }

    #[test]
    fn test_map_item_wildcard_same_value_as_keyword_fails() {
        assert!(backend().convert(&ConditionNode::map_item("a", "foo*")).is_ok());
        assert!(matches!(
            backend().convert(&kw("foo*")),
            Err(TranslateError::UnsupportedFtsWildcard { .. })
        ));
    }

    #[test]
    fn test_map_item_list_membership() {
        assert_eq!(
            where_of(&ConditionNode::map_item("EventID", vec![1_i64, 4688])),
            "EventID IN ('1', '4688')"
        );
    }

    #[test]
    fn test_map_item_wildcard_list_expands() {
        let tree = ConditionNode::map_item("Image", vec![r"*\cmd.exe", r"*\powershell.exe"]);

        assert_eq!(
            where_of(&tree),
            r"(Image LIKE '%\\cmd.exe' ESCAPE '\' OR Image LIKE '%\\powershell.exe' ESCAPE '\')"
        );
    }

    #[test]
    fn test_map_item_single_element_list_expands() {
        assert_eq!(
            where_of(&ConditionNode::map_item("a", vec!["foo"])),
            r"(a LIKE 'foo' ESCAPE '\')"
        );
    }

    #[test]
    fn test_map_item_empty_list_rejected() {
        let tree = ConditionNode::map_item("a", MapValue::List(Vec::new()));

        assert_eq!(
            backend().convert(&tree),
            Err(TranslateError::UnsupportedValueType {
                kind: "empty list".to_string()
            })
        );
    }

    #[test]
    fn test_map_item_list_ignores_list_handling_mode() {
        let backend = SqliteBackend::new(
            SqliteBackendConfig::default().with_list_handling(ListHandling::SpecialHandling),
        );
        let tree = ConditionNode::map_item("a", vec!["x*", "y"]);

        assert_eq!(
            backend.generate_where(&tree).unwrap().unwrap(),
            r"(a LIKE 'x%' ESCAPE '\' OR a LIKE 'y' ESCAPE '\')"
        );
    }

    #[test]
    fn test_map_item_length_uses_raw_value() {
        let backend = SqliteBackend::new(
            SqliteBackendConfig::default()
                .with_field_mapping("CommandLine", "LENGTH(CommandLine)"),
        );
        let tree = ConditionNode::map_item("CommandLine", ">1_000");

        assert_eq!(
            backend.generate_where(&tree).unwrap().unwrap(),
            "(LENGTH(CommandLine) >1_000)"
        );
    }

    #[test]
    fn test_map_item_null_is_null_check() {
        assert_eq!(
            where_of(&ConditionNode::map_item("User", MapValue::Null)),
            "User IS NULL"
        );
    }

    #[test]
    fn test_map_item_null_on_source_column() {
        assert_eq!(
            where_of(&ConditionNode::map_item("sourcetype", MapValue::Null)),
            "sourcetype IS NULL"
        );
    }

    #[test]
    fn test_negated_null_is_not_null_check() {
        let tree = ConditionNode::not(ConditionNode::map_item("sourcetype", MapValue::Null));

        assert_eq!(where_of(&tree), "NOT sourcetype IS NULL");
    }

    #[test]
    fn test_map_item_null_on_length_field() {
        let backend = SqliteBackend::new(
            SqliteBackendConfig::default().with_field_mapping("CommandLine", "LENGTH(CommandLine)"),
        );

        assert_eq!(
            backend
                .generate_where(&ConditionNode::map_item("CommandLine", MapValue::Null))
                .unwrap(),
            Some("LENGTH(CommandLine) IS NULL".to_string())
        );
    }

    #[test]
    fn test_field_mapping_applied() {
        let backend = SqliteBackend::new(
            SqliteBackendConfig::default().with_field_mapping("CommandLine", "cmdline"),
        );

        assert_eq!(
            backend
                .generate_where(&ConditionNode::map_item("CommandLine", "whoami"))
                .unwrap(),
            Some("cmdline = 'whoami'".to_string())
        );
    }

    #[test]
    fn test_custom_mapper() {
        struct Prefixed;

        impl FieldMapper for Prefixed {
            fn resolve(&self, field: &str, _value: &MapValue) -> String {
                format!("event.{}", field)
            }
        }

        let backend = SqliteBackend::default().with_mapper(Prefixed);

        assert_eq!(
            backend.generate_where(&ConditionNode::map_item("Image", "x")).unwrap(),
            Some("event.Image = 'x'".to_string())
        );
    }

    #[test]
    fn test_map_item_flag_cleared_after_error() {
        let backend = backend();
        let mut translator = Translator::new(&backend);

        let result = translator.generate_map_item("User", &MapValue::List(Vec::new()));

        assert!(result.is_err());
        assert!(!translator.ctx.in_map_item);
    }

    #[test]
    fn test_map_item_flag_scoped_to_value() {
        let backend = backend();
        let mut translator = Translator::new(&backend);

        translator.generate_map_item("a", &MapValue::from("b")).unwrap();

        assert!(!translator.ctx.in_map_item);
        assert_eq!(translator.ctx.fts_count, 0);
    }

    // =========================================================================
    // Boolean structure tests
    // =========================================================================

    #[test]
    fn test_map_items_and_keyword() {
        let tree = ConditionNode::and([ConditionNode::map_item("a", "x"), kw("y")]);

        assert_eq!(where_of(&tree), r#"a = 'x' AND eventlog MATCH ('"y"')"#);
    }

    #[test]
    fn test_not_node() {
        let tree = ConditionNode::not(ConditionNode::map_item("a", "b"));

        assert_eq!(where_of(&tree), "NOT a = 'b'");
    }

    #[test]
    fn test_subexpression() {
        let tree = ConditionNode::and([
            ConditionNode::group(ConditionNode::or([
                ConditionNode::map_item("a", "1"),
                ConditionNode::map_item("b", "2"),
            ])),
            ConditionNode::not(ConditionNode::group(ConditionNode::map_item("c", "3"))),
        ]);

        assert_eq!(where_of(&tree), "(a = '1' OR b = '2') AND NOT (c = '3')");
    }

    #[test]
    fn test_empty_branches_dropped() {
        let tree = ConditionNode::or([
            ConditionNode::And(Vec::new()),
            ConditionNode::map_item("a", "b"),
            ConditionNode::not(ConditionNode::Or(Vec::new())),
        ]);

        assert_eq!(where_of(&tree), "a = 'b'");
    }

    #[test]
    fn test_empty_tree_has_no_where_clause() {
        let tree = ConditionNode::group(ConditionNode::And(Vec::new()));

        assert_eq!(backend().generate_where(&tree).unwrap(), None);
        assert_eq!(backend().convert(&tree).unwrap(), "SELECT * FROM eventlog");
    }

    #[test]
    fn test_error_inside_branch_aborts_query() {
        let tree = ConditionNode::and([
            ConditionNode::map_item("a", "b"),
            ConditionNode::map_item("User", MapValue::List(Vec::new())),
        ]);

        assert!(backend().convert(&tree).is_err());
    }

    // =========================================================================
    // Renderer trait / concurrency
    // =========================================================================

    #[test]
    fn test_renderer_trait() {
        let renderer: Box<dyn ConditionRenderer> = Box::new(backend());

        assert_eq!(renderer.name(), "sqlite");
        assert_eq!(
            renderer.render(&ConditionNode::map_item("a", "b")).unwrap(),
            "SELECT * FROM eventlog WHERE a = 'b'"
        );
    }

    #[test]
    fn test_concurrent_translations_are_independent() {
        let backend = SqliteBackend::new(SqliteBackendConfig {
            field_mappings: HashMap::from([("a".to_string(), "col_a".to_string())]),
            ..Default::default()
        });
        let single = kw("x");
        let double = ConditionNode::or([kw("x"), ConditionNode::keyword(1_i64)]);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let backend = &backend;
                    let tree = if i % 2 == 0 { &single } else { &double };
                    s.spawn(move || backend.generate_query(tree).unwrap().fts_count)
                })
                .collect();

            for (i, handle) in handles.into_iter().enumerate() {
                let expected = if i % 2 == 0 { 1 } else { 2 };
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
