//! Core logic shared by every command: which profile to use, whether a
//! mutation may run, and how a result maps to an exit code.

pub mod exit_code;
pub mod guard;
pub mod resolver;
