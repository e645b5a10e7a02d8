//! Catalog query literals and row shaping.
//!
//! The SQL text and the row grouping live here, away from the connection, so
//! both are unit testable without a server. Query failures from the
//! connection layer propagate unchanged; this layer never retries or
//! swallows them.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::warn;

use crate::schema::{EnumMap, SchemaTable};

/// Raw row from the enum listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumRow {
    pub schema: String,
    pub name: String,
    pub value: String,
}

/// Raw row from the relation listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub table_name: String,
    pub table_type: Option<String>,
}

/// Raw row from the column metadata query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    pub column_name: String,
    pub udt_name: String,
    pub nullable: bool,
    pub has_default: bool,
}

/// Relations in one schema, grouped and ordered by lowercased name.
pub const TABLE_LIST_QUERY: &str = "SELECT c.table_name, t.table_type FROM information_schema.columns c INNER JOIN information_schema.tables t ON t.table_name = c.table_name WHERE c.table_schema = $1 GROUP BY c.table_name, t.table_type ORDER BY lower(c.table_name)";

/// Column metadata for one table, in ordinal order.
pub const COLUMN_QUERY: &str = r#"
    SELECT
        column_name,
        udt_name,
        CASE WHEN is_nullable = 'YES' THEN true ELSE false END,
        column_default IS NOT NULL
    FROM information_schema.columns
    WHERE table_schema = $1 AND table_name = $2
    ORDER BY ordinal_position
"#;

/// Primary-key columns of a table, in key order.
pub const PRIMARY_KEY_QUERY: &str = r#"
    SELECT a.attname
    FROM pg_catalog.pg_constraint c
    JOIN pg_catalog.pg_class t ON t.oid = c.conrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
    JOIN pg_catalog.pg_attribute a ON a.attrelid = t.oid
    WHERE n.nspname = $1
      AND t.relname = $2
      AND c.contype = 'p'
      AND a.attnum = ANY(c.conkey)
    ORDER BY array_position(c.conkey, a.attnum)
"#;

/// Table-level comment, if any.
pub const TABLE_COMMENT_QUERY: &str = r#"
    SELECT obj_description(t.oid)
    FROM pg_catalog.pg_class t
    JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
    WHERE n.nspname = $1 AND t.relname = $2
"#;

/// Build the enum listing query, optionally filtered by schema.
///
/// The text is kept byte-compatible with existing consumers that diff
/// emitted SQL: when no schema is supplied the filter clause is omitted
/// entirely, leaving a doubled space before `order by`.
pub fn enum_query(schema: Option<&str>) -> String {
    let where_clause = match schema {
        Some(schema) => format!("where n.nspname = '{}'", schema),
        None => String::new(),
    };
    format!(
        "select n.nspname as schema, t.typname as name, e.enumlabel as value \
         from pg_type t join pg_enum e on t.oid = e.enumtypid \
         join pg_catalog.pg_namespace n ON n.oid = t.typnamespace \
         {} order by t.typname asc, e.enumlabel asc;",
        where_clause
    )
}

/// Group enum rows into `name -> labels`, preserving query order.
///
/// Rows arrive sorted by type name then label, so same-named types from
/// different schemas interleave. Labels accumulate per `(schema, name)`
/// pair; when a type name appears in more than one schema the last-seen
/// schema's complete label list wins, with a warning. The flattened map
/// cannot represent both.
pub fn group_enum_rows(rows: Vec<EnumRow>) -> EnumMap {
    let mut by_name: IndexMap<String, IndexMap<String, Vec<String>>> = IndexMap::new();
    let mut last_seen: HashMap<String, String> = HashMap::new();

    for row in rows {
        let per_schema = by_name.entry(row.name.clone()).or_default();
        if !per_schema.is_empty() && !per_schema.contains_key(&row.schema) {
            // Invariant: at most one warning per extra schema.
            let first = per_schema.keys().next().cloned().unwrap_or_default();
            warn!(
                "enum type '{}' exists in schemas '{}' and '{}'; the most recently seen schema's labels win",
                row.name, first, row.schema
            );
        }
        per_schema
            .entry(row.schema.clone())
            .or_default()
            .push(row.value);
        last_seen.insert(row.name, row.schema);
    }

    by_name
        .into_iter()
        .map(|(name, mut per_schema)| {
            let labels = last_seen
                .get(&name)
                .and_then(|schema| per_schema.shift_remove(schema))
                .unwrap_or_default();
            (name, labels)
        })
        .collect()
}

/// Translate relation listing rows into [`SchemaTable`]s.
///
/// `is_view` defaults to `false` when the catalog did not report a type.
pub fn to_schema_tables(rows: Vec<TableRow>) -> Vec<SchemaTable> {
    rows.into_iter()
        .map(|row| SchemaTable {
            table_name: row.table_name,
            is_view: row.table_type.as_deref() == Some("VIEW"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enum_row(schema: &str, name: &str, value: &str) -> EnumRow {
        EnumRow {
            schema: schema.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_enum_query_with_schema() {
        assert_eq!(
            enum_query(Some("public")),
            "select n.nspname as schema, t.typname as name, e.enumlabel as value \
             from pg_type t join pg_enum e on t.oid = e.enumtypid \
             join pg_catalog.pg_namespace n ON n.oid = t.typnamespace \
             where n.nspname = 'public' order by t.typname asc, e.enumlabel asc;"
        );
    }

    #[test]
    fn test_enum_query_without_schema() {
        // The omitted filter leaves exactly one extra space before `order by`.
        let sql = enum_query(None);
        assert!(sql.ends_with("typnamespace  order by t.typname asc, e.enumlabel asc;"));
        assert!(!sql.contains("where"));
    }

    #[test]
    fn test_enum_query_no_trailing_space_before_order_by() {
        let sql = enum_query(Some("api"));
        assert!(sql.contains("where n.nspname = 'api' order by"));
        assert!(!sql.contains("'api'  order by"));
    }

    #[test]
    fn test_table_list_query_literal() {
        assert_eq!(
            TABLE_LIST_QUERY,
            "SELECT c.table_name, t.table_type FROM information_schema.columns c \
             INNER JOIN information_schema.tables t ON t.table_name = c.table_name \
             WHERE c.table_schema = $1 GROUP BY c.table_name, t.table_type \
             ORDER BY lower(c.table_name)"
        );
    }

    #[test]
    fn test_group_enum_rows_accumulates_in_order() {
        let grouped = group_enum_rows(vec![
            enum_row("public", "x", "a"),
            enum_row("public", "x", "b"),
        ]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped["x"], vec!["a", "b"]);
    }

    #[test]
    fn test_group_enum_rows_multiple_types() {
        let grouped = group_enum_rows(vec![
            enum_row("public", "mood", "happy"),
            enum_row("public", "mood", "sad"),
            enum_row("public", "status", "active"),
        ]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["mood"], vec!["happy", "sad"]);
        assert_eq!(grouped["status"], vec!["active"]);
    }

    #[test]
    fn test_group_enum_rows_cross_schema_collision_last_wins() {
        let grouped = group_enum_rows(vec![
            enum_row("public", "mood", "happy"),
            enum_row("public", "mood", "sad"),
            enum_row("private", "mood", "grumpy"),
        ]);
        assert_eq!(grouped["mood"], vec!["grumpy"]);
    }

    #[test]
    fn test_group_enum_rows_interleaved_schemas_keep_full_list() {
        // Label ordering interleaves schemas for a shared type name; the
        // winning schema keeps every one of its labels, not just those
        // after the last alternation.
        let grouped = group_enum_rows(vec![
            enum_row("s1", "mood", "angry"),
            enum_row("s2", "mood", "bored"),
            enum_row("s1", "mood", "calm"),
        ]);
        assert_eq!(grouped["mood"], vec!["angry", "calm"]);
    }

    #[test]
    fn test_group_enum_rows_interleaved_later_schema_wins() {
        let grouped = group_enum_rows(vec![
            enum_row("s1", "mood", "angry"),
            enum_row("s2", "mood", "bored"),
            enum_row("s1", "mood", "calm"),
            enum_row("s2", "mood", "dour"),
        ]);
        assert_eq!(grouped["mood"], vec!["bored", "dour"]);
    }

    #[test]
    fn test_group_enum_rows_empty() {
        assert!(group_enum_rows(vec![]).is_empty());
    }

    #[test]
    fn test_to_schema_tables_defaults_is_view() {
        let tables = to_schema_tables(vec![
            TableRow {
                table_name: "t1".to_string(),
                table_type: None,
            },
            TableRow {
                table_name: "t2".to_string(),
                table_type: Some("BASE TABLE".to_string()),
            },
        ]);
        assert_eq!(
            tables,
            vec![
                SchemaTable {
                    table_name: "t1".to_string(),
                    is_view: false,
                },
                SchemaTable {
                    table_name: "t2".to_string(),
                    is_view: false,
                },
            ]
        );
    }

    #[test]
    fn test_to_schema_tables_marks_views() {
        let tables = to_schema_tables(vec![TableRow {
            table_name: "active_users".to_string(),
            table_type: Some("VIEW".to_string()),
        }]);
        assert!(tables[0].is_view);
    }
}
