//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::typemap::MappingOptions;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection settings
    pub db: DbConfig,

    /// Schema to introspect
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Type mapping settings
    #[serde(default)]
    pub mapping: MappingOptions,
}

/// PostgreSQL connection configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub database: String,

    pub user: String,

    #[serde(default)]
    pub password: String,

    /// TLS mode: disable, require, verify-ca, verify-full
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

impl DbConfig {
    /// Render a libpq-style connection string.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={} sslmode={}",
            self.host, self.port, self.database, self.user, self.password, self.ssl_mode
        )
    }
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_ssl_mode() -> String {
    "require".to_string()
}
