//! Subcommand definitions and their handlers, one module per resource family.
//!
//! Handlers validate flags first, then consult the guard, and only then
//! resolve credentials and build a client.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod customers;
pub mod orders;
pub mod payments;
pub mod promotions;
pub mod settings;
pub mod shipping;

use crate::cli::main_types::{BodyArgs, PageArgs};
use crate::error::ValidationError;
use crate::utils::input::merge_objects;
use crate::utils::validation::{require_value, validate_page_size};
use serde::Serialize;
use serde_json::{Value, json};

/// Validated `(page, page_size)`.
pub(crate) fn paging(args: &PageArgs) -> Result<(u32, u32), ValidationError> {
    if args.page == 0 {
        return Err(ValidationError::InvalidValue {
            field: "page".to_string(),
            reason: "must be 1 or greater".to_string(),
        });
    }
    Ok((args.page, validate_page_size(args.page_size)?))
}

/// Trimmed, non-empty positional id.
pub(crate) fn id_arg(flag: &str, value: &str) -> Result<String, ValidationError> {
    require_value(flag, value).map(str::to_string)
}

/// Comma-separated ids from flags like `--product-ids a,b`, blanks dropped.
pub(crate) fn split_ids(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Request body from `--body`/`--body-file` with typed flag values laid on
/// top. Fails when both are empty.
pub(crate) fn compose_body<T: Serialize>(body: &BodyArgs, flags: &T) -> crate::Result<Value> {
    let flags = serde_json::to_value(flags).map_err(|e| ValidationError::InvalidJson {
        origin: "flags".to_string(),
        message: e.to_string(),
    })?;
    let merged = merge_objects(body.read()?.unwrap_or_else(|| json!({})), flags);
    if merged.as_object().is_some_and(|m| m.is_empty()) {
        return Err(ValidationError::MissingFlag {
            flag: "body".to_string(),
        }
        .into());
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_validation() {
        assert_eq!(
            paging(&PageArgs {
                page: 2,
                page_size: 50
            })
            .expect("valid"),
            (2, 50)
        );
        assert!(paging(&PageArgs {
            page: 0,
            page_size: 20
        })
        .is_err());
        assert!(paging(&PageArgs {
            page: 1,
            page_size: 251
        })
        .is_err());
    }

    #[test]
    fn test_split_ids() {
        let raw = vec!["a, b".to_string(), "".to_string(), "c".to_string()];
        assert_eq!(split_ids(&raw), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_compose_body_flags_override_body() {
        let body = BodyArgs {
            body: Some(r#"{"title": "old", "vendor": "acme"}"#.to_string()),
            body_file: None,
        };
        let merged = compose_body(&body, &json!({"title": "new"})).expect("compose");
        assert_eq!(merged, json!({"title": "new", "vendor": "acme"}));
    }

    #[test]
    fn test_compose_body_requires_something() {
        let err = compose_body(&BodyArgs::default(), &json!({})).unwrap_err();
        assert!(matches!(
            err,
            crate::AppError::Validation(ValidationError::MissingFlag { .. })
        ));
    }

    #[test]
    fn test_id_arg_rejects_blank() {
        assert!(matches!(
            id_arg("id", "  "),
            Err(ValidationError::MissingFlag { .. })
        ));
        assert_eq!(id_arg("id", " c1 ").expect("valid"), "c1");
    }
}
