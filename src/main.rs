//! users-api entry point.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use users_api::api::{create_router, AppState};
use users_api::config::Config;
use users_api::metrics;
use users_api::store::InMemoryUserStore;
use users_api::utils::shutdown_signal;

/// How often buffered histogram samples are drained.
const METRICS_UPKEEP_PERIOD: Duration = Duration::from_secs(5);

/// In-memory user registry REST API.
#[derive(Parser, Debug)]
#[command(name = "users-api")]
#[command(about = "Serve CRUD endpoints over an in-memory user registry")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Address to bind to (overrides HOST).
    #[arg(long, global = true)]
    host: Option<String>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // CLI flags win over the environment
    let mut overrides = Vec::new();
    if let Some(host) = args.host {
        overrides.push(("HOST", host));
    }
    if let Some(port) = args.port {
        overrides.push(("PORT", port.to_string()));
    }
    let config = Config::load_with(overrides)?;

    init_logging(&config, args.verbose);

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Serve) | None => cmd_serve(config).await,
    }
}

/// Initialize the tracing subscriber.
fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("users_api=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("USERS API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    if let Err(e) = config.validate() {
        println!("FAILED");
        println!("  Error: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed"));
    }
    println!("OK");

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Listen Address: {}:{}", config.host, config.port);
    println!("  Seed Users: {}", config.seed_users);
    println!("  Log Level: {}", config.rust_log);
    println!("  JSON Logs: {}", config.log_json);
    println!("  Metrics: {}", if config.metrics_enabled { "Enabled" } else { "Disabled" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    let store = if config.seed_users {
        InMemoryUserStore::seeded()
    } else {
        InMemoryUserStore::new()
    };
    info!("Store initialized with {} users", store.len());

    let mut app_state = AppState::new(Arc::new(store));

    if config.metrics_enabled {
        match metrics::install_prometheus() {
            Ok(handle) => {
                metrics::init_metrics();
                metrics::spawn_upkeep(handle.clone(), METRICS_UPKEEP_PERIOD);
                app_state = app_state.with_metrics(handle);
            }
            Err(e) => warn!("Metrics disabled, recorder install failed: {}", e),
        }
    }

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
