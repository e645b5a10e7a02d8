//! YAML configuration loading and validation.

mod types;
mod validation;

use std::path::Path;

use tracing::debug;

pub use types::{Config, DbConfig};

use crate::error::Result;

impl Config {
    /// Load and validate configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typemap::UnknownPolicy;

    const MINIMAL_YAML: &str = r#"
db:
  host: localhost
  database: appdb
  user: reader
"#;

    #[test]
    fn test_minimal_yaml_defaults() {
        let config = Config::from_yaml(MINIMAL_YAML).unwrap();
        assert_eq!(config.db.port, 5432);
        assert_eq!(config.db.ssl_mode, "require");
        assert_eq!(config.schema, "public");
        assert!(config.mapping.overrides.is_empty());
        assert!(matches!(
            config.mapping.on_unknown,
            UnknownPolicy::Fallback(ref f) if f == "any"
        ));
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
db:
  host: db.internal
  port: 6432
  database: warehouse
  user: introspect
  password: s3cret
  ssl_mode: verify-full
schema: billing
mapping:
  overrides:
    citext: EmailAddress
  on_unknown: error
  custom_type_case: pascal
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.db.port, 6432);
        assert_eq!(config.schema, "billing");
        assert_eq!(
            config.mapping.overrides.get("citext").map(String::as_str),
            Some("EmailAddress")
        );
        assert!(matches!(config.mapping.on_unknown, UnknownPolicy::Error));
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        assert!(Config::from_yaml("db: [not, a, mapping]").is_err());
    }

    #[test]
    fn test_validation_applied_on_parse() {
        let yaml = r#"
db:
  host: ""
  database: appdb
  user: reader
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_connection_string() {
        let config = Config::from_yaml(MINIMAL_YAML).unwrap();
        assert_eq!(
            config.db.connection_string(),
            "host=localhost port=5432 dbname=appdb user=reader password= sslmode=require"
        );
    }
}
