//! pg-introspect command-line interface.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pg_introspect::{introspect_schema, Config, Database, Result};

#[derive(Parser)]
#[command(name = "pg-introspect")]
#[command(about = "PostgreSQL schema introspection", version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Introspect a schema and print the model as JSON
    Dump {
        /// Schema to introspect (overrides the configured schema)
        #[arg(short, long)]
        schema: Option<String>,

        /// Write JSON to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List relations in a schema
    Tables {
        /// Schema to list (overrides the configured schema)
        #[arg(short, long)]
        schema: Option<String>,
    },

    /// Verify database connectivity and exit
    HealthCheck,
}

fn init_tracing(format: &str, verbosity: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity));

    if format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_format, &cli.verbosity);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Dump { schema, output } => {
            let schema = schema.unwrap_or_else(|| config.schema.clone());
            let db = Database::connect(&config.db).await?;
            let model = introspect_schema(&db, &schema, &config.mapping).await?;
            db.close().await;

            let json = serde_json::to_string_pretty(&model)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    info!("Wrote schema model to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Commands::Tables { schema } => {
            let schema = schema.unwrap_or_else(|| config.schema.clone());
            let db = Database::connect(&config.db).await?;
            let relations = db.schema_tables(&schema).await?;
            db.close().await;

            for relation in relations {
                let kind = if relation.is_view { "view" } else { "table" };
                println!("{}\t{}", relation.table_name, kind);
            }
        }
        Commands::HealthCheck => {
            let db = Database::connect(&config.db).await?;
            db.close().await;
            println!("OK: {}:{}/{}", config.db.host, config.db.port, config.db.database);
        }
    }

    Ok(())
}
