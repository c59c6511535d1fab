//! shelf - predefined product and inventory lookups.

use shelf_lookup::catalog::{ModeId, CATALOG};
use shelf_lookup::cli::Cli;
use shelf_lookup::config::{Config, ConnectionConfig};
use shelf_lookup::db::{self, MockProductStore, ProductStore};
use shelf_lookup::dispatch::QueryDispatcher;
use shelf_lookup::error::{Result, ShelfError};
use shelf_lookup::tui::Tui;
use shelf_lookup::logging::{self, LogSink};
use shelf_lookup::output;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if let Err(e) = logging::init(&LogSink::for_session(cli.is_one_shot())) {
        eprintln!("Warning: {e}");
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        eprintln!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.list_modes {
        for mode in CATALOG.modes() {
            println!(
                "{}  {:<24} {:<8} {}",
                mode.id,
                mode.label,
                mode.input_kind.hint(),
                mode.columns.join(", ")
            );
        }
        return Ok(());
    }

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let store: Arc<dyn ProductStore>;
    let connection_info;
    if cli.mock_db {
        store = Arc::new(MockProductStore::grocery());
        connection_info = "mock".to_string();
    } else {
        let connection = resolve_connection(&cli, &config)?.ok_or_else(|| {
            ShelfError::config(
                "No database connection configured. Pass a connection string or use --mock-db.",
            )
        })?;
        info!("Connection: {}", connection.display_string());
        store = db::connect(&connection).await?;
        connection_info = connection.display_string();
    }

    let dispatcher = Arc::new(QueryDispatcher::new(store, &config.query));

    let result = match cli.mode {
        Some(mode_id) => run_once(&dispatcher, &cli, mode_id).await,
        None => match Tui::new() {
            Ok(mut tui) => tui.run(Arc::clone(&dispatcher), Some(connection_info)).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = dispatcher.close().await {
        warn!("Error closing database connection: {}", e);
    }

    result
}

/// Runs a single lookup and prints the result to stdout.
async fn run_once(dispatcher: &QueryDispatcher, cli: &Cli, mode_id: ModeId) -> Result<()> {
    let format = cli.output_format()?;
    let result_set = dispatcher.dispatch(mode_id, &cli.input).await?;
    print!("{}", output::render(&result_set, format)?);
    Ok(())
}

/// Resolves the final connection configuration from CLI args, config file, and environment.
///
/// Precedence: CLI arguments, named connection, default connection, then
/// `PG*` environment variables for anything still unset.
fn resolve_connection(cli: &Cli, config: &Config) -> Result<Option<ConnectionConfig>> {
    let mut connection = cli.to_connection_config()?;

    if connection.is_none() {
        if let Some(name) = cli.connection_name() {
            connection = config.get_connection(Some(name)).cloned();
            if connection.is_none() {
                return Err(ShelfError::config(format!(
                    "Connection '{}' not found in config file",
                    name
                )));
            }
        }
    }

    if connection.is_none() {
        connection = config.get_connection(None).cloned();
    }

    if let Some(ref mut conn) = connection {
        conn.apply_env_defaults();
    }

    Ok(connection)
}
