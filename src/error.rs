//! Error types for agentdock

use thiserror::Error;

use crate::container::ContainerStatus;

#[derive(Error, Debug)]
pub enum DockError {
    #[error("Container not found: {0}")]
    NotFound(String),

    #[error("Cannot {action} container '{id}' while it is {status}")]
    InvalidTransition {
        id: String,
        action: &'static str,
        status: ContainerStatus,
    },

    #[error("Container '{0}' is not running")]
    NotRunning(String),

    #[error("Container '{0}' already exists")]
    AlreadyExists(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Script error: {0}")]
    ScriptError(String),

    #[error("Session service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DockError>;
