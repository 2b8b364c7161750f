//! Error types for core module
//!
//! Provides custom error types for configuration loading and the
//! persistence failures shared by the game and service layers.

use thiserror::Error;

/// Errors that can occur in the core module
#[derive(Error, Debug)]
pub enum CoreError {
    /// Config file I/O error
    #[error("Config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Config serialization/deserialization error
    #[error("Config serialization error: {0}")]
    ConfigSerialization(#[from] serde_json::Error),

    /// Environment override that does not parse
    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: String, value: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Persistence failures, fatal to the operation that hit them
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record for {code}: {message}")]
    Corrupt { code: String, message: String },
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
