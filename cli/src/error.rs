//! Unified error handling for the CLI.

use crate::config::ConfigError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Engine(#[from] contacts_engine::Error),

    #[error("{0} value(s) failed validation")]
    ValidationFailed(usize),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Log the error at a level matching its severity.
    pub fn log(&self) {
        match self {
            AppError::Engine(e) if e.is_soft() => tracing::warn!("Engine error: {:?}", e),
            AppError::Engine(e) => tracing::error!("Engine error: {:?}", e),
            AppError::ValidationFailed(count) => tracing::debug!(count, "validation failed"),
            other => tracing::error!("{}", other),
        }
    }
}
