//! JSON request bodies for create/update commands.
//!
//! Bodies come from `--body '<json>'` or `--body-file <path>`, where `-`
//! reads stdin.

use crate::error::{CliError, ValidationError};
use serde_json::Value;
use std::io::Read;

/// Parse an inline or file-provided JSON body. `None` when neither flag is set.
pub fn read_json_body(body: Option<&str>, body_file: Option<&str>) -> crate::Result<Option<Value>> {
    match (body, body_file) {
        (Some(_), Some(_)) => Err(CliError::InvalidArguments(
            "use either --body or --body-file, not both".to_string(),
        )
        .into()),
        (Some(raw), None) => Ok(Some(parse_json("--body", raw)?)),
        (None, Some(path)) => {
            let (origin, raw) = if path == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|e| ValidationError::InvalidJson {
                        origin: "stdin".to_string(),
                        message: e.to_string(),
                    })?;
                ("stdin".to_string(), buf)
            } else {
                let raw =
                    std::fs::read_to_string(path).map_err(|e| ValidationError::InvalidJson {
                        origin: path.to_string(),
                        message: e.to_string(),
                    })?;
                (path.to_string(), raw)
            };
            Ok(Some(parse_json(&origin, &raw)?))
        }
        (None, None) => Ok(None),
    }
}

/// Like [`read_json_body`] but one of the flags must be present.
pub fn require_json_body(body: Option<&str>, body_file: Option<&str>) -> crate::Result<Value> {
    read_json_body(body, body_file)?.ok_or_else(|| {
        ValidationError::MissingFlag {
            flag: "body".to_string(),
        }
        .into()
    })
}

pub fn parse_json(origin: &str, raw: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(raw).map_err(|e| ValidationError::InvalidJson {
        origin: origin.to_string(),
        message: e.to_string(),
    })
}

/// Merges `extra` object keys into `base`, overwriting existing keys.
pub fn merge_objects(mut base: Value, extra: Value) -> Value {
    if let (Some(target), Value::Object(source)) = (base.as_object_mut(), extra) {
        for (k, v) in source {
            target.insert(k, v);
        }
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppError;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_inline_body() {
        let body = read_json_body(Some(r#"{"title":"Mug"}"#), None).expect("valid json");
        assert_eq!(body, Some(json!({"title": "Mug"})));
    }

    #[test]
    fn test_no_body() {
        assert!(read_json_body(None, None).expect("no flags").is_none());
        assert!(matches!(
            require_json_body(None, None),
            Err(AppError::Validation(ValidationError::MissingFlag { .. }))
        ));
    }

    #[test]
    fn test_invalid_inline_body() {
        let err = read_json_body(Some("{oops"), None).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_body_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"name":"VIP"}}"#).expect("write");
        let path = file.path().to_string_lossy().to_string();

        let body = read_json_body(None, Some(&path)).expect("file body");
        assert_eq!(body, Some(json!({"name": "VIP"})));
    }

    #[test]
    fn test_missing_body_file() {
        let err = read_json_body(None, Some("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_both_flags_rejected() {
        assert!(matches!(
            read_json_body(Some("{}"), Some("x.json")),
            Err(AppError::Cli(CliError::InvalidArguments(_)))
        ));
    }

    #[test]
    fn test_merge_objects() {
        let merged = merge_objects(json!({"a": 1, "b": 2}), json!({"b": 3, "c": 4}));
        assert_eq!(merged, json!({"a": 1, "b": 3, "c": 4}));
    }
}
