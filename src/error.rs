//! Error types for the proteus scanner

use thiserror::Error;

/// Main error type for proteus operations
#[derive(Debug, Error)]
pub enum ProteusError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Scanner error: {0}")]
    ScanError(String),

    #[error("Malformed crawl input: {0}")]
    CrawlError(String),

    #[error("Target unreachable: {0}")]
    TargetUnreachable(String),

    #[error("Report error: {0}")]
    ReportError(String),

    #[error("Browser render error: {0}")]
    RenderError(String),
}

/// Result type alias for proteus operations
pub type Result<T> = std::result::Result<T, ProteusError>;
