use std::path::PathBuf;

use market_data_ingestor::providers::{ProviderError, ProviderInitError};
use thiserror::Error;

/// Problems reading the symbol list.
#[derive(Debug, Error)]
pub enum SymbolFileError {
    #[error("Failed to read symbol file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Symbol file has no column named \"Symbol\" (found: {found})")]
    MissingSymbolColumn { found: String },

    #[error("Malformed CSV at record {record}: {source}")]
    Csv { record: u64, source: csv::Error },
}

/// Problems resolving the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Env(#[from] shared_utils::env::InvalidEnvVarError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Problems writing a chart.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to draw chart for {symbol}: {message}")]
    Draw { symbol: String, message: String },
}

/// Errors that abort a whole screening run.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("Failed to create market data provider: {0}")]
    ProviderInit(#[from] ProviderInitError),

    #[error("Failed to fetch benchmark {symbol}: {source}")]
    Benchmark {
        symbol: String,
        source: ProviderError,
    },

    #[error(transparent)]
    Sink(#[from] SinkError),
}
