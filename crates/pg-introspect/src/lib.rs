//! # pg-introspect
//!
//! PostgreSQL schema introspection with configurable output type mapping.
//!
//! The library reads catalog metadata over a single live connection and
//! produces an in-memory schema model (tables, columns, enums, views) in
//! which every column carries a resolved output type name:
//!
//! - **Type mapping** via a fixed, auditable rule table (overrides first,
//!   then built-in categories, then custom types, then a configurable
//!   unknown-type policy)
//! - **Catalog queries** against `pg_catalog` and `information_schema`,
//!   kept as testable literals
//! - **Schema assembly** into [`TableDefinition`]s enriched per column
//! - **A single-connection facade** with explicit teardown; no pooling
//!
//! The model is consumed by external emitters (code generators, diff tools);
//! this crate guarantees its shape, not its textual serialization.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pg_introspect::{introspect_schema, Config, Database};
//!
//! #[tokio::main]
//! async fn main() -> pg_introspect::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let db = Database::connect(&config.db).await?;
//!     let model = introspect_schema(&db, &config.schema, &config.mapping).await?;
//!     println!("{} tables, {} enums", model.tables.len(), model.enums.len());
//!     db.close().await;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod introspect;
pub mod schema;
pub mod typemap;

// Re-exports for convenient access
pub use config::{Config, DbConfig};
pub use db::Database;
pub use error::{IntrospectError, Result};
pub use introspect::{build_table_definition, enrich_with_types, introspect_schema};
pub use schema::{ColumnDefinition, EnumMap, SchemaModel, SchemaTable, TableDefinition};
pub use typemap::{map_type, CaseTransform, MappingOptions, UnknownPolicy};
