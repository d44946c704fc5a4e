//! sqlbatch - run multi-statement SQL scripts and report every statement.

use std::process::ExitCode;

use db_sqlbatch::cli::{Cli, OutputFormat};
use db_sqlbatch::config::{Config, ConnectionConfig};
use db_sqlbatch::db::{self, DatabaseGateway, MockGateway};
use db_sqlbatch::error::{Result, SqlBatchError};
use db_sqlbatch::logging;
use db_sqlbatch::present::{self, PresenterConfig};
use db_sqlbatch::query::{BatchExecutor, BatchResult};
use tracing::{debug, error, info, warn};

/// Exit code when at least one statement failed.
const EXIT_STATEMENT_FAILED: u8 = 1;

/// Exit code when the script held no statements.
const EXIT_EMPTY_SCRIPT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    logging::init_stderr_logging();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();
    let format = cli
        .parse_output_format()
        .map_err(SqlBatchError::invalid_argument)?;

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let mut presenter = config.presenter.clone();
    if let Some(page_size) = cli.page_size {
        presenter.page_size = page_size;
    }
    if presenter.page_size == 0 {
        return Err(SqlBatchError::invalid_argument(
            "--page-size must be greater than zero",
        ));
    }

    let script = cli.read_script()?;

    let gateway: Box<dyn DatabaseGateway> = if cli.mock_db {
        info!("Using mock database");
        Box::new(MockGateway::new())
    } else {
        let connection = resolve_connection(&cli, &config)?.ok_or_else(|| {
            SqlBatchError::config(
                "No database connection configured. Use --help for usage information.",
            )
        })?;
        info!("Connection: {}", connection.display_string());
        db::connect(&connection, &config.execution).await?
    };

    let batch = BatchExecutor::new(gateway.as_ref())
        .run_with(&script, |position, total, result| {
            debug!(position, total, success = result.is_success(), "Statement done");
        })
        .await;
    gateway.close().await?;

    let batch = match batch.ensure_not_empty() {
        Ok(batch) => batch,
        Err(e) => {
            warn!("{e}");
            eprintln!("{e}");
            return Ok(ExitCode::from(EXIT_EMPTY_SCRIPT));
        }
    };

    if let Some(path) = &cli.csv {
        match batch.last_row_set() {
            Some(rows) => present::write_csv(rows, path)?,
            None => warn!("No query result to export to {}", path.display()),
        }
    }

    print_batch(&batch, format, &presenter, cli.page)?;

    if batch.failed() > 0 {
        Ok(ExitCode::from(EXIT_STATEMENT_FAILED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_batch(
    batch: &BatchResult,
    format: OutputFormat,
    presenter: &PresenterConfig,
    page: i64,
) -> Result<()> {
    let output = match format {
        OutputFormat::Text => present::render_batch(batch, presenter, page)?,
        OutputFormat::Json => {
            let report = present::batch_to_json(batch)?;
            serde_json::to_string_pretty(&report)
                .map_err(|e| SqlBatchError::internal(format!("Failed to serialize report: {e}")))?
        }
    };
    println!("{output}");
    Ok(())
}

/// Resolves the final connection configuration from CLI args, config file, and environment.
///
/// A named connection is used as the base and CLI arguments override its
/// fields. Without a name, CLI arguments win outright, then the config's
/// default connection, then `DATABASE_URL`.
fn resolve_connection(cli: &Cli, config: &Config) -> Result<Option<ConnectionConfig>> {
    let cli_connection = cli.to_connection_config()?;

    let mut connection = match cli.connection_name() {
        Some(name) => {
            let mut named = config.get_connection(Some(name)).cloned().ok_or_else(|| {
                SqlBatchError::config(format!("Connection '{name}' not found in config file"))
            })?;
            if let Some(overrides) = &cli_connection {
                named.merge(overrides);
            }
            Some(named)
        }
        None => cli_connection.or_else(|| config.get_connection(None).cloned()),
    };

    if connection.is_none() {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            connection = Some(ConnectionConfig::from_connection_string(&url)?);
        }
    }

    if let Some(ref mut conn) = connection {
        conn.apply_env_defaults();
    }

    Ok(connection)
}
