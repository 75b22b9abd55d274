//! Storage layer for shopline-cli
//!
//! Handles configuration management and credential storage.
//! Uses the OS keyring (or a JSON file on headless machines) for store
//! credentials and TOML for non-secret preferences.

use crate::error::StorageError;

/// Configuration file management (TOML)
pub mod config;
/// Store credential persistence (keyring, file, memory)
pub mod credentials;

type Result<T> = std::result::Result<T, StorageError>;
