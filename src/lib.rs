//! # shopline-cli
//!
//! Library behind the `spl` binary, a command-line client for the Shopline
//! admin REST API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           CLI Layer                 │  clap commands, dispatcher, handlers
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  profile resolution, guard, exit codes
//! ├─────────────────────────────────────┤
//! │           API Layer                 │  Open/Admin clients, resource families
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  config file, credential store
//! └─────────────────────────────────────┘
//! ```

pub use error::AppError;

/// Command-line surface: argument types, handlers and the dispatcher.
pub mod cli;

/// Profile resolution, dry-run/confirm guard and exit-code mapping.
pub mod core;

/// Config file and credential persistence.
pub mod storage;

/// Open API and Admin API clients plus the resource families.
pub mod api;

/// Tables, key/value text, JSON and `--query` evaluation.
pub mod display;

pub mod error;

/// Validation, JSON input, text helpers and logging setup.
pub mod utils;

pub type Result<T> = std::result::Result<T, AppError>;
