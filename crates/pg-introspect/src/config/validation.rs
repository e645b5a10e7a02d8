//! Configuration validation.

use crate::error::{IntrospectError, Result};

use super::types::Config;

const VALID_SSL_MODES: &[&str] = &["disable", "require", "verify-ca", "verify-full"];

impl Config {
    /// Validate the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.db.host.is_empty() {
            return Err(IntrospectError::Config(
                "db.host must not be empty".to_string(),
            ));
        }

        if self.db.database.is_empty() {
            return Err(IntrospectError::Config(
                "db.database must not be empty".to_string(),
            ));
        }

        if self.db.user.is_empty() {
            return Err(IntrospectError::Config(
                "db.user must not be empty".to_string(),
            ));
        }

        if self.schema.is_empty() {
            return Err(IntrospectError::Config(
                "schema must not be empty".to_string(),
            ));
        }

        let ssl_mode = self.db.ssl_mode.to_lowercase();
        if !VALID_SSL_MODES.contains(&ssl_mode.as_str()) {
            return Err(IntrospectError::Config(format!(
                "Invalid db.ssl_mode '{}'. Valid options: {}",
                self.db.ssl_mode,
                VALID_SSL_MODES.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::types::{Config, DbConfig};

    fn valid_config() -> Config {
        Config {
            db: DbConfig {
                host: "localhost".to_string(),
                port: 5432,
                database: "appdb".to_string(),
                user: "reader".to_string(),
                password: "secret".to_string(),
                ssl_mode: "require".to_string(),
            },
            schema: "public".to_string(),
            mapping: Default::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_empty_host_fails() {
        let mut config = valid_config();
        config.db.host = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("db.host"));
    }

    #[test]
    fn test_empty_database_fails() {
        let mut config = valid_config();
        config.db.database = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_user_fails() {
        let mut config = valid_config();
        config.db.user = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_schema_fails() {
        let mut config = valid_config();
        config.schema = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_ssl_mode_fails() {
        let mut config = valid_config();
        config.db.ssl_mode = "prefer".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ssl_mode"));
    }

    #[test]
    fn test_ssl_mode_case_insensitive() {
        let mut config = valid_config();
        config.db.ssl_mode = "Verify-Full".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = valid_config();
        let rendered = format!("{:?}", config.db);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secret"));
    }
}
