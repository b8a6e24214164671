//! mysql-online-migrate CLI - chunked copy for online MySQL table migrations.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mysql_online_migrate::{Chunker, ChunkerOptions, Config, MigrateError, MysqlConnection};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mysql-online-migrate")]
#[command(about = "Chunked copy engine for online MySQL table migrations")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the origin table into the destination in chunks
    Run {
        /// Resume from this key (overrides the configured start)
        #[arg(long)]
        start: Option<u64>,

        /// Stop at this key (overrides the configured limit)
        #[arg(long)]
        limit: Option<u64>,
    },

    /// Test the database connection
    HealthCheck,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), MigrateError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity)?;

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    let connection = MysqlConnection::connect(&config.database).await?;

    let outcome = match cli.command {
        Commands::Run { start, limit } => run_copy(&config, &connection, start, limit).await,
        Commands::HealthCheck => {
            info!("Database connection OK");
            Ok(())
        }
    };

    connection.close().await;
    outcome
}

async fn run_copy(
    config: &Config,
    connection: &MysqlConnection,
    start: Option<u64>,
    limit: Option<u64>,
) -> Result<(), MigrateError> {
    let migration = config.copy.migration()?;
    let throttler = config.copy.throttler();

    let chunker = Chunker::new(
        &migration,
        connection,
        ChunkerOptions {
            start: start.or(config.copy.start),
            limit: limit.or(config.copy.limit),
            throttler: Some(&throttler),
            autoincrementing: config.copy.autoincrementing,
        },
    )
    .await?;

    let stats = chunker.run().await?;
    info!(
        "{} -> {}: copied {} rows in {} chunks",
        config.copy.origin, config.copy.destination, stats.rows_copied, stats.chunks
    );
    Ok(())
}

fn setup_logging(verbosity: &str) -> Result<(), MigrateError> {
    let level = match verbosity {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => {
            return Err(MigrateError::Config(format!(
                "unknown verbosity '{}' (expected debug, info, warn or error)",
                other
            )))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}
