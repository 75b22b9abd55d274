//! Command line surface: argument types, per-resource handlers and the
//! dispatcher that wires them to storage, clients and the guard.

pub mod commands;
pub mod dispatcher;
pub mod main_types;
