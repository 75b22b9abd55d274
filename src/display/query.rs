//! `--query` path expressions
//!
//! Queries are written jq style (`.items[0].id`, `.items[].code`,
//! `."odd key"`) and evaluated as JSONPath. A query that already starts
//! with `$` is passed through untouched.

use crate::error::DisplayError;
use jsonpath_rust::{JsonPathFinder, JsonPathInst};
use serde_json::Value;
use std::str::FromStr;

/// A validated query ready to run against JSON documents.
#[derive(Debug, Clone, PartialEq)]
pub struct PathQuery {
    source: String,
    path: String,
}

impl PathQuery {
    pub fn parse(query: &str) -> Result<Self, DisplayError> {
        let source = query.trim().to_string();
        let fail = |reason: String| DisplayError::Query {
            query: source.clone(),
            reason,
        };

        let path = to_json_path(&source).map_err(fail)?;
        JsonPathInst::from_str(&path).map_err(|e| fail(e.to_string()))?;
        Ok(Self { source, path })
    }

    /// Values selected by the query, in document order.
    pub fn evaluate(&self, document: &Value) -> Result<Vec<Value>, DisplayError> {
        let finder = JsonPathFinder::from_str(&document.to_string(), &self.path).map_err(|e| {
            DisplayError::Query {
                query: self.source.clone(),
                reason: e.to_string(),
            }
        })?;
        match finder.find() {
            Value::Array(values) => Ok(values),
            other => Ok(vec![other]),
        }
    }
}

/// Rewrites jq-style paths: `.a` to `$.a`, `[]` to `[*]`, `."k"` to `['k']`.
fn to_json_path(query: &str) -> Result<String, String> {
    if query.starts_with('$') {
        return Ok(query.to_string());
    }
    if !query.starts_with('.') {
        return Err("queries start with '.'".to_string());
    }
    if query == "." {
        return Ok("$".to_string());
    }

    let mut path = String::from("$");
    let mut chars = query.chars().peekable();
    while let Some(ch) = chars.next() {
        match (ch, chars.peek()) {
            ('.', Some('"')) => {
                chars.next();
                let mut key = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '"' {
                        closed = true;
                        break;
                    }
                    key.push(c);
                }
                if !closed {
                    return Err("unterminated quoted key".to_string());
                }
                path.push_str(&format!("['{}']", key));
            }
            ('.', Some('[')) => {}
            ('[', Some(']')) => {
                chars.next();
                path.push_str("[*]");
            }
            _ => path.push(ch),
        }
    }
    Ok(path)
}
