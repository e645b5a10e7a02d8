//! Native-to-output type mapping.
//!
//! The mapper is a pure function over a closed rule table. Resolution order:
//!
//! 1. user override table (keyed by array-stripped udt name)
//! 2. built-in category sets (string / number / boolean / Json / Date)
//! 3. custom-type passthrough (enums, composites)
//! 4. the configured unknown-type policy (error or fallback type)
//!
//! A leading underscore on the udt name marks an array; the base type is
//! resolved through the rules above and `[]` is appended to the result.
//! Nullability is deliberately not encoded here: emitters compose nullable
//! unions from [`ColumnDefinition::nullable`] themselves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{IntrospectError, Result};
use crate::schema::ColumnDefinition;

/// Native types rendered as `"string"`.
const STRING_TYPES: &[&str] = &[
    "bpchar", "char", "varchar", "text", "citext", "uuid", "bytea", "inet", "time", "timetz",
    "interval", "name",
];

/// Native types rendered as `"number"`.
const NUMBER_TYPES: &[&str] = &[
    "int2", "int4", "int8", "float4", "float8", "numeric", "money", "oid",
];

/// Native types rendered as `"boolean"`.
const BOOLEAN_TYPES: &[&str] = &["bool"];

/// Native types rendered as `"Json"` (structured-object marker).
const JSON_TYPES: &[&str] = &["json", "jsonb"];

/// Native types rendered as `"Date"`.
const DATE_TYPES: &[&str] = &["date", "timestamp", "timestamptz"];

/// The built-in classification rules, evaluated in order.
///
/// The sets are disjoint, so relative order between them cannot change a
/// result; keeping them in one table keeps the precedence auditable.
const CATEGORY_RULES: &[(&[&str], &str)] = &[
    (STRING_TYPES, "string"),
    (NUMBER_TYPES, "number"),
    (BOOLEAN_TYPES, "boolean"),
    (JSON_TYPES, "Json"),
    (DATE_TYPES, "Date"),
];

/// Behavior when no rule matches a native type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    /// Fail the mapping with [`IntrospectError::UnknownType`].
    Error,

    /// Emit the given permissive type (e.g. `any`) and log a warning.
    Fallback(String),
}

impl Default for UnknownPolicy {
    /// Warn-and-fall-through to `any`, matching the permissive behavior
    /// most generators expect. Strict mode is the explicit opt-in.
    fn default() -> Self {
        UnknownPolicy::Fallback("any".to_string())
    }
}

/// Case transform applied to custom-type passthrough results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseTransform {
    /// Keep the catalog name as-is.
    #[default]
    Preserve,

    /// `user_role` -> `UserRole`
    Pascal,

    /// `user_role` -> `userRole`
    Camel,
}

impl CaseTransform {
    /// Apply the transform to a type name.
    pub fn apply(&self, name: &str) -> String {
        match self {
            CaseTransform::Preserve => name.to_string(),
            CaseTransform::Pascal => transform_words(name, true),
            CaseTransform::Camel => transform_words(name, false),
        }
    }
}

fn transform_words(name: &str, capitalize_first: bool) -> String {
    let mut out = String::with_capacity(name.len());
    let mut boundary = true;
    for ch in name.chars() {
        if matches!(ch, '_' | '-' | ' ') {
            boundary = true;
            continue;
        }
        if boundary {
            if out.is_empty() && !capitalize_first {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            boundary = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Type mapping configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingOptions {
    /// User overrides keyed by array-stripped udt name. Checked before the
    /// built-in categories.
    pub overrides: BTreeMap<String, String>,

    /// What to do when no rule matches. Defaults to falling back to `any`.
    pub on_unknown: UnknownPolicy,

    /// Case transform for custom type names (overrides and built-in
    /// categories are emitted verbatim).
    pub custom_type_case: CaseTransform,
}

/// Map a column's native type to an output type name.
///
/// Pure and deterministic: the same `(udt_name, custom_types, options)`
/// triple always yields the same output. The only error path is the
/// unknown-type policy; recognized categories never fail.
pub fn map_type(
    column: &ColumnDefinition,
    custom_types: &[String],
    options: &MappingOptions,
) -> Result<String> {
    let (base, is_array) = split_array(&column.udt_name);
    let mapped = resolve_base(base, custom_types, options)?;
    Ok(if is_array {
        format!("{}[]", mapped)
    } else {
        mapped
    })
}

/// Split off the leading array marker, if present.
fn split_array(udt_name: &str) -> (&str, bool) {
    match udt_name.strip_prefix('_') {
        Some(base) => (base, true),
        None => (udt_name, false),
    }
}

fn resolve_base(base: &str, custom_types: &[String], options: &MappingOptions) -> Result<String> {
    if let Some(override_type) = options.overrides.get(base) {
        return Ok(override_type.clone());
    }

    for (set, result) in CATEGORY_RULES {
        if set.contains(&base) {
            return Ok((*result).to_string());
        }
    }

    if custom_types.iter().any(|t| t == base) {
        return Ok(options.custom_type_case.apply(base));
    }

    match &options.on_unknown {
        UnknownPolicy::Fallback(fallback) => {
            tracing::warn!(
                "No type mapping for udt '{}', falling back to '{}'",
                base,
                fallback
            );
            Ok(fallback.clone())
        }
        UnknownPolicy::Error => Err(IntrospectError::unknown_type(base)),
    }
}
