//! homedash server
//!
//! Mounts every dashboard widget over the configured key-value store and
//! serves the REST API until Ctrl+C or SIGTERM.
//!
//! Run with: cargo run --bin homedash -- --config config.toml
//!
//! Configuration is read from `--config`, or the default locations, with
//! `HOMEDASH_*` environment overrides. `RUST_LOG` takes precedence over the
//! configured log level.

use anyhow::Context;
use clap::Parser;
use homedash::api::{serve, AppState};
use homedash::config::{Config, LoggingConfig};
use homedash::dashboard::Dashboard;
use homedash::storage::{KeyValueStore, MemoryStore, SqliteStore};
use homedash::widgets::sms_api::TwilioProvider;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "homedash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal home dashboard server")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to, overrides the config file
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_default(),
    };
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }

    init_tracing(&config.logging);

    tracing::info!("Starting homedash v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config)?;

    let mut dashboard = Dashboard::mount(store, config.simulation.dashboard_settings());
    match config.sms_api.twilio() {
        Some(twilio) => {
            tracing::info!(base_url = %twilio.base_url, "SMS provider enabled");
            dashboard = dashboard.with_sms_provider(Arc::new(TwilioProvider::new(twilio)));
        }
        None => tracing::info!("SMS provider disabled (set HOMEDASH_SMS_ACCOUNT_SID to enable)"),
    }
    let dashboard = Arc::new(dashboard);

    let state = AppState::new(Arc::clone(&dashboard), config.api.clone());
    let served = serve(state, &config.api).await;

    tracing::info!("Stopping deferred work...");
    dashboard.teardown();
    served?;

    tracing::info!("homedash stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("homedash={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn open_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    if config.storage.in_memory {
        tracing::warn!("Using in-memory storage; nothing survives a restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let path = config.storage.db_path();
    tracing::info!("Database: {}", path.display());
    let store = SqliteStore::open(&path)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    Ok(Arc::new(store))
}
