//! The generic request seam every resource family talks through.

use crate::error::ApiError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde_json::Value;

const SNIPPET_CHARS: usize = 200;

/// One HTTP call against an API rooted at the client's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query.into_pairs();
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn call(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

/// Query-string builder that drops unset and empty values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard paging parameters.
    pub fn page(page: u32, page_size: u32) -> Self {
        Self::new().uint("page", page).uint("page_size", page_size)
    }

    pub fn string(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.pairs.push((key.to_string(), v.to_string()));
        }
        self
    }

    /// Zero counts as unset.
    pub fn uint(mut self, key: &str, value: u32) -> Self {
        if value > 0 {
            self.pairs.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn flag(mut self, key: &str, value: Option<bool>) -> Self {
        if let Some(v) = value {
            self.pairs.push((key.to_string(), v.to_string()));
        }
        self
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}

/// Message for a failed response: the body's `message` or `error` field,
/// otherwise the status reason plus a short snippet of a non-HTML body.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        let found = ["message", "error", "error_description"]
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Object(inner) => inner
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            });
        if let Some(message) = found {
            return message;
        }
        if let Some(errors) = map.get("errors") {
            return errors.to_string();
        }
    }

    let reason = status.canonical_reason().unwrap_or("Unknown error");
    let body = body.trim();
    if body.is_empty() || body.contains("<html") || body.contains("<HTML") {
        return reason.to_string();
    }

    let mut snippet: String = body.chars().take(SNIPPET_CHARS).collect();
    if body.chars().count() > SNIPPET_CHARS {
        snippet.push_str("...");
    }
    format!("{}: {}", reason, snippet)
}

/// `Retry-After` as seconds: delta-seconds or an HTTP date, 1 second otherwise.
pub fn parse_retry_after(header: Option<&str>, now: DateTime<Utc>) -> u64 {
    let Some(raw) = header.map(str::trim).filter(|h| !h.is_empty()) else {
        return 1;
    };
    if let Ok(secs) = raw.parse::<u64>() {
        return secs;
    }
    match DateTime::parse_from_rfc2822(raw) {
        Ok(at) => (at.with_timezone(&Utc) - now).num_seconds().max(0) as u64,
        Err(_) => 1,
    }
}

/// Maps a non-success status and its body to the matching [`ApiError`].
pub fn status_error(
    status: StatusCode,
    endpoint: &str,
    retry_after: Option<&str>,
    body: &str,
) -> ApiError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ApiError::RateLimited {
            endpoint: endpoint.to_string(),
            retry_after_secs: parse_retry_after(retry_after, Utc::now()),
        };
    }
    ApiError::Http {
        status: status.as_u16(),
        endpoint: endpoint.to_string(),
        message: error_message(status, body),
    }
}

/// Decodes a success body; empty bodies (204 and friends) become `null`.
pub fn decode_body(endpoint: &str, body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

/// Maps a reqwest failure, keeping timeouts distinct.
pub fn transport_error(err: reqwest::Error, endpoint: &str, timeout_secs: u64) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout {
            timeout_secs,
            endpoint: endpoint.to_string(),
        }
    } else {
        ApiError::Transport {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }
}
