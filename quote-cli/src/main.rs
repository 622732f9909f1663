use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use quote_cli::config::AppConfig;
use quote_cli::{app, logging};

/// Config file picked up from the working directory when `--config` is
/// not given.
const LOCAL_CONFIG: &str = "quote.toml";

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Multi-step quote request form for the terminal.
///
/// Walks through service, budget and timeline questions, shows a live
/// estimate, keeps a draft between runs and submits the request.
#[derive(Debug, Parser)]
#[command(name = "quote", version, about)]
struct Cli {
    /// TOML configuration file. Defaults to `./quote.toml` when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Draft store backend (`sqlite` or `memory`).
    #[arg(long)]
    backend: Option<String>,

    /// Draft store connection string.
    /// For SQLite this is a file path (e.g. `quote-drafts.db`) or `:memory:`.
    #[arg(long)]
    store: Option<String>,

    /// Endpoint quote requests are POSTed to.
    #[arg(long)]
    endpoint: Option<String>,

    /// CSV rate table replacing the built-in rates.
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Log level or filter directive, e.g. `debug` or `quote_core=trace`.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            let local = Path::new(LOCAL_CONFIG);
            local.is_file().then(|| local.to_path_buf())
        })
    }

    /// Flags win over the config file.
    fn apply_overrides(
        self,
        config: &mut AppConfig,
    ) {
        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
        if let Some(store) = self.store {
            config.storage.connection_string = store;
        }
        if let Some(endpoint) = self.endpoint {
            config.submission.endpoint = Some(endpoint);
        }
        if let Some(rates) = self.rates {
            config.rates_file = Some(rates);
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config_path();
    let mut config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);

    logging::init_logging(&config.logging)?;
    debug!(config = ?config_path, "configuration loaded");

    app::run(config).await
}
