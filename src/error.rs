use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::DomainError;

/// Failures that stop the server from starting or shutting down cleanly
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
