//! TOML configuration for the `quote` binary.
//!
//! Every section is optional; a missing file or section falls back to the
//! defaults below. Command-line flags are applied on top by `main`.

use std::path::{Path, PathBuf};

use quote_core::WizardConfig;
use quote_core::models::{DEFAULT_EXPRESS_LABEL, DEFAULT_FLEXIBLE_LABEL};
use quote_core::store::StoreConfig;
use quote_core::wizard::ValidationRules;
use serde::Deserialize;
use thiserror::Error;

/// Default SQLite file for drafts, relative to the working directory.
pub const DEFAULT_DRAFT_DB: &str = "quote-drafts.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// CSV rate table. The built-in table is used when absent.
    pub rates_file: Option<PathBuf>,
    pub timeline_labels: TimelineLabels,
    pub storage: StoreConfig,
    pub submission: SubmissionConfig,
    pub autosave: AutosaveConfig,
    pub logging: LoggingConfig,
    pub validation: ValidationRules,
    pub wizard: WizardConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rates_file: None,
            timeline_labels: TimelineLabels::default(),
            storage: StoreConfig {
                backend: "sqlite".to_string(),
                connection_string: DEFAULT_DRAFT_DB.to_string(),
            },
            submission: SubmissionConfig::default(),
            autosave: AutosaveConfig::default(),
            logging: LoggingConfig::default(),
            validation: ValidationRules::default(),
            wizard: WizardConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads a config file. A relative `rates_file` is resolved against
    /// the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(dir) = path.parent() {
            config.rates_file = config
                .rates_file
                .take()
                .map(|rates| if rates.is_relative() { dir.join(rates) } else { rates });
        }
        Ok(config)
    }

    /// Reads `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Labels shown instead of the service timeline for urgent and flexible
/// requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimelineLabels {
    pub express: String,
    pub flexible: String,
}

impl Default for TimelineLabels {
    fn default() -> Self {
        Self {
            express: DEFAULT_EXPRESS_LABEL.to_string(),
            flexible: DEFAULT_FLEXIBLE_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubmissionConfig {
    /// Where quote requests are POSTed. Without one, submissions are only
    /// logged.
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutosaveConfig {
    /// Seconds between autosave ticks; `0` disables the timer.
    pub interval_secs: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level or full `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    /// Log to stderr.
    pub console: bool,
    /// Append log records to this file as well.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: true,
            file: None,
        }
    }
}
