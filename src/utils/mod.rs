//! Utils module - Shared utilities and helpers
//!
//! Small helpers used across the CLI, API and display layers.

/// Reading JSON request bodies from flags, files and stdin
pub mod input;

/// Tracing subscriber setup
pub mod logging;

/// Width-aware truncation, secret masking and path escaping
pub mod text;

/// Input validation for URLs, dates and identifiers
pub mod validation;
