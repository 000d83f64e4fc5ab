//! Error types for engine configuration
//!
//! The running engine is a best-effort background process with no fatal
//! paths: malformed appointments are skipped, a missing platform degrades to
//! in-app-only delivery. Errors therefore only arise while building the
//! engine, when its configuration is loaded and validated.

use thiserror::Error;

/// Errors raised while loading or validating engine configuration
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::ParseError(err.to_string())
    }
}
