//! Schema assembly: raw catalog rows into enriched table definitions.

use tracing::{debug, info, warn};

use crate::catalog::ColumnRow;
use crate::db::Database;
use crate::error::Result;
use crate::schema::{ColumnDefinition, SchemaModel, TableDefinition};
use crate::typemap::{self, MappingOptions};

/// Assemble a raw table definition from catalog rows.
///
/// Column order follows the rows as given, which the catalog queries return
/// in ordinal position. No type enrichment happens here.
pub fn build_table_definition(
    columns: Vec<ColumnRow>,
    primary_key: Option<String>,
    comment: Option<String>,
) -> TableDefinition {
    let mut table = TableDefinition {
        columns: Default::default(),
        primary_key,
        comment,
    };

    for row in columns {
        table.columns.insert(
            row.column_name,
            ColumnDefinition {
                udt_name: row.udt_name,
                nullable: row.nullable,
                has_default: row.has_default,
                ts_type: None,
            },
        );
    }

    table
}

/// Resolve an output type for every column of a table.
///
/// Columns keep their catalog-derived fields untouched; only `ts_type` is
/// filled in. Mapping failures abort the whole table so partial results
/// never escape.
pub fn enrich_with_types(
    mut table: TableDefinition,
    custom_types: &[String],
    options: &MappingOptions,
) -> Result<TableDefinition> {
    for (column_name, column) in table.columns.iter_mut() {
        let ts_type = typemap::map_type(column, custom_types, options).map_err(|e| {
            warn!("Failed to map column '{}': {}", column_name, e);
            e
        })?;
        column.ts_type = Some(ts_type);
    }
    Ok(table)
}

/// Introspect one schema end to end.
///
/// Enum names double as the custom-type universe for mapping, so columns
/// whose udt names match a discovered enum pass through by name.
pub async fn introspect_schema(
    db: &Database,
    schema: &str,
    options: &MappingOptions,
) -> Result<SchemaModel> {
    let enums = db.enum_types(Some(schema)).await?;
    let custom_types: Vec<String> = enums.keys().cloned().collect();

    let relations = db.schema_tables(schema).await?;
    info!(
        "Introspecting {} relations in schema '{}'",
        relations.len(),
        schema
    );

    let mut tables = indexmap::IndexMap::new();
    for relation in &relations {
        debug!("Introspecting table '{}'", relation.table_name);
        let table = db.table_definition(schema, &relation.table_name).await?;
        let table = enrich_with_types(table, &custom_types, options)?;
        tables.insert(relation.table_name.clone(), table);
    }

    Ok(SchemaModel {
        schema: schema.to_string(),
        enums,
        relations,
        tables,
    })
}
