//! Core module - configuration and shared error types
//!
//! - [`ArenaConfig`] - turn length, tick rate, custody settings
//! - [`CoreError`] - config loading failures
//! - [`StoreError`] - persistence failures

pub mod config;
pub mod error;

pub use config::{default_config_path, ArenaConfig, ZERO_ADDRESS};
pub use error::{CoreError, CoreResult, StoreError, StoreResult};
