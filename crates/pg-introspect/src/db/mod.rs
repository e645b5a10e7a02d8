//! Database facade owning the live connection.
//!
//! One connection handle per introspection run, used sequentially; there is
//! no pooling. Teardown is explicit via [`Database::close`], invoked by the
//! caller (the CLI) rather than by any introspection operation.

use std::sync::Arc;

use rustls::ClientConfig;
use tokio::task::JoinHandle;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Config as PgConfig, NoTls, Row};
use tokio_postgres_rustls::MakeRustlsConnect;
use tracing::{debug, info, warn};

use crate::catalog::{self, ColumnRow, EnumRow, TableRow};
use crate::config::DbConfig;
use crate::error::{IntrospectError, Result};
use crate::introspect;
use crate::schema::{EnumMap, SchemaTable, TableDefinition};

/// Owns the live PostgreSQL connection for one introspection run.
pub struct Database {
    client: Client,
    conn_task: JoinHandle<()>,
}

impl Database {
    /// Connect using the given configuration.
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        // Built field by field; the driver's connection-string parser does
        // not accept the verify-ca and verify-full sslmode values.
        let mut pg_config = PgConfig::new();
        pg_config.host(&config.host);
        pg_config.port(config.port);
        pg_config.dbname(&config.database);
        pg_config.user(&config.user);
        pg_config.password(&config.password);

        let (client, conn_task) = match config.ssl_mode.to_lowercase().as_str() {
            "disable" => {
                warn!("PostgreSQL TLS is disabled. Credentials will be transmitted in plaintext.");
                let (client, connection) = pg_config.connect(NoTls).await?;
                let task = tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        warn!("connection task ended with error: {}", e);
                    }
                });
                (client, task)
            }
            mode => {
                let tls_config = build_tls_config(mode)?;
                let tls = MakeRustlsConnect::new(tls_config);
                let (client, connection) = pg_config.connect(tls).await?;
                let task = tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        warn!("connection task ended with error: {}", e);
                    }
                });
                (client, task)
            }
        };

        // Probe before handing the facade out
        client.simple_query("SELECT 1").await?;

        info!(
            "Connected to PostgreSQL: {}:{}/{}",
            config.host, config.port, config.database
        );

        Ok(Self { client, conn_task })
    }

    /// Forward a query verbatim to the underlying connection.
    ///
    /// Thin pass-through: rows come back in the driver's native shape,
    /// unprocessed.
    pub async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>> {
        Ok(self.client.query(sql, params).await?)
    }

    /// List enum types and their labels, optionally filtered by schema.
    pub async fn enum_types(&self, schema: Option<&str>) -> Result<EnumMap> {
        let sql = catalog::enum_query(schema);
        let rows = self.client.query(&sql, &[]).await?;
        let rows: Vec<EnumRow> = rows
            .into_iter()
            .map(|row| EnumRow {
                schema: row.get(0),
                name: row.get(1),
                value: row.get(2),
            })
            .collect();
        let enums = catalog::group_enum_rows(rows);
        debug!("Found {} enum types", enums.len());
        Ok(enums)
    }

    /// List relations (tables and views) in a schema.
    pub async fn schema_tables(&self, schema: &str) -> Result<Vec<SchemaTable>> {
        let rows = self
            .client
            .query(catalog::TABLE_LIST_QUERY, &[&schema])
            .await?;
        let rows: Vec<TableRow> = rows
            .into_iter()
            .map(|row| TableRow {
                table_name: row.get(0),
                table_type: row.try_get(1).ok(),
            })
            .collect();
        let tables = catalog::to_schema_tables(rows);
        debug!("Found {} relations in schema '{}'", tables.len(), schema);
        Ok(tables)
    }

    /// Fetch the raw (unenriched) definition of one table.
    pub async fn table_definition(&self, schema: &str, table: &str) -> Result<TableDefinition> {
        let columns: Vec<ColumnRow> = self
            .client
            .query(catalog::COLUMN_QUERY, &[&schema, &table])
            .await?
            .into_iter()
            .map(|row| ColumnRow {
                column_name: row.get(0),
                udt_name: row.get(1),
                nullable: row.get(2),
                has_default: row.get(3),
            })
            .collect();

        let primary_key: Option<String> = self
            .client
            .query(catalog::PRIMARY_KEY_QUERY, &[&schema, &table])
            .await?
            .first()
            .map(|row| row.get(0));

        let comment: Option<String> = self
            .client
            .query(catalog::TABLE_COMMENT_QUERY, &[&schema, &table])
            .await?
            .first()
            .and_then(|row| row.get(0));

        Ok(introspect::build_table_definition(
            columns,
            primary_key,
            comment,
        ))
    }

    /// Close the connection.
    ///
    /// Explicit teardown: drops the client and waits for the connection
    /// task to drain. Queries issued after this point fail with a
    /// connectivity error.
    pub async fn close(self) {
        drop(self.client);
        let _ = self.conn_task.await;
    }
}

/// Build TLS configuration based on ssl_mode.
fn build_tls_config(ssl_mode: &str) -> Result<ClientConfig> {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = match ssl_mode {
        "require" => {
            warn!(
                "ssl_mode=require: TLS enabled but server certificate is not verified. \
                 Consider using 'verify-full' for production."
            );
            ClientConfig::builder()
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoVerifier))
                .with_no_client_auth()
        }
        "verify-ca" | "verify-full" => {
            info!("ssl_mode={}: certificate verification enabled", ssl_mode);
            ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth()
        }
        other => {
            return Err(IntrospectError::Config(format!(
                "Invalid ssl_mode '{}'. Valid options: disable, require, verify-ca, verify-full",
                other
            )));
        }
    };

    Ok(config)
}

/// Certificate verifier that accepts any certificate.
///
/// Used only for `ssl_mode=require`, which encrypts the connection without
/// verifying the server. Untrusted networks should use `verify-full`.
#[derive(Debug)]
struct NoVerifier;

impl rustls::client::danger::ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        vec![
            rustls::SignatureScheme::RSA_PKCS1_SHA256,
            rustls::SignatureScheme::RSA_PKCS1_SHA384,
            rustls::SignatureScheme::RSA_PKCS1_SHA512,
            rustls::SignatureScheme::ECDSA_NISTP256_SHA256,
            rustls::SignatureScheme::ECDSA_NISTP384_SHA384,
            rustls::SignatureScheme::ECDSA_NISTP521_SHA512,
            rustls::SignatureScheme::RSA_PSS_SHA256,
            rustls::SignatureScheme::RSA_PSS_SHA384,
            rustls::SignatureScheme::RSA_PSS_SHA512,
            rustls::SignatureScheme::ED25519,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tls_config_rejects_unknown_mode() {
        let err = build_tls_config("sometimes").unwrap_err();
        assert!(matches!(err, IntrospectError::Config(_)));
    }

    #[test]
    fn test_build_tls_config_known_modes() {
        assert!(build_tls_config("require").is_ok());
        assert!(build_tls_config("verify-ca").is_ok());
        assert!(build_tls_config("verify-full").is_ok());
    }
}
