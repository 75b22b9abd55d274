//! Output formatting: tables and key/value text, JSON, and `--query` paths.

pub mod formatter;
pub mod outcome;
pub mod query;
pub mod table;

pub use formatter::Formatter;
pub use outcome::{Column, Outcome, col};
pub use query::PathQuery;
pub use table::TableDisplay;

use crate::error::ValidationError;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }

    /// `auto` colors only when stdout is a terminal and `NO_COLOR` is unset.
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout)
            }
        }
    }
}

/// Picks the output format. A query needs JSON: it forces JSON when no
/// format was asked for and is rejected alongside an explicit `text`.
pub fn resolve_output_format(
    requested: Option<OutputFormat>,
    configured: Option<&str>,
    query: Option<&str>,
) -> Result<OutputFormat, ValidationError> {
    match (requested, query) {
        (Some(OutputFormat::Text), Some(_)) => Err(ValidationError::InvalidValue {
            field: "query".to_string(),
            reason: "--query requires JSON output; drop --output text".to_string(),
        }),
        (Some(format), _) => Ok(format),
        (None, Some(_)) => Ok(OutputFormat::Json),
        (None, None) => Ok(configured
            .and_then(OutputFormat::from_config)
            .unwrap_or(OutputFormat::Text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_output_format() {
        assert_eq!(
            resolve_output_format(None, None, None),
            Ok(OutputFormat::Text)
        );
        assert_eq!(
            resolve_output_format(None, Some("json"), None),
            Ok(OutputFormat::Json)
        );
        assert_eq!(
            resolve_output_format(Some(OutputFormat::Text), Some("json"), None),
            Ok(OutputFormat::Text)
        );
        assert_eq!(
            resolve_output_format(None, None, Some(".items")),
            Ok(OutputFormat::Json)
        );
        assert!(resolve_output_format(Some(OutputFormat::Text), None, Some(".items")).is_err());
    }

    #[test]
    fn test_color_mode_fixed_values() {
        assert!(ColorMode::Always.enabled());
        assert!(!ColorMode::Never.enabled());
        assert_eq!(ColorMode::from_config("never"), Some(ColorMode::Never));
        assert_eq!(ColorMode::from_config("sometimes"), None);
    }
}
