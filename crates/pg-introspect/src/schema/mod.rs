//! Schema model types for introspected databases.
//!
//! These types are the output surface of an introspection pass: created once,
//! then read-only for downstream emitters. Serialized field names follow the
//! model's wire convention (`udtName`, `hasDefault`, `tsType`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single column as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    /// Native type identifier (e.g. `uuid`, `_int4` for an int4 array).
    pub udt_name: String,

    /// Whether the column allows NULL.
    ///
    /// Nullability is carried here and never folded into [`ts_type`];
    /// nullable-union composition is the emitter's responsibility.
    ///
    /// [`ts_type`]: ColumnDefinition::ts_type
    pub nullable: bool,

    /// Whether the column has a default expression.
    pub has_default: bool,

    /// Resolved output type name, suffixed `[]` for arrays.
    ///
    /// `None` until enrichment has run; `Some` afterwards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts_type: Option<String>,
}

/// A table (or view) definition: columns in catalog order, keyed by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDefinition {
    /// Columns keyed by column name, in ordinal position order.
    pub columns: IndexMap<String, ColumnDefinition>,

    /// First primary-key column name, if the table has one.
    pub primary_key: Option<String>,

    /// Table-level comment, if any.
    pub comment: Option<String>,
}

impl TableDefinition {
    /// Whether every column carries a resolved output type.
    pub fn is_enriched(&self) -> bool {
        self.columns.values().all(|c| c.ts_type.is_some())
    }
}

/// A relation discovered by enumerating a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaTable {
    /// Relation name.
    pub table_name: String,

    /// Whether the relation is a view (`false` for base tables).
    pub is_view: bool,
}

/// Enum type name to ordered member labels, in query order.
///
/// Same-named enum types from different schemas collapse onto one key;
/// the last-seen schema's labels win (see [`crate::catalog::group_enum_rows`]).
pub type EnumMap = IndexMap<String, Vec<String>>;

/// The enriched model handed to external emitters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaModel {
    /// The introspected schema name.
    pub schema: String,

    /// Enum types and their labels.
    pub enums: EnumMap,

    /// All relations in the schema, with view markers.
    pub relations: Vec<SchemaTable>,

    /// Enriched table definitions keyed by relation name.
    pub tables: IndexMap<String, TableDefinition>,
}
