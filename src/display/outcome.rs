use serde_json::Value;

/// One table column: header text and the dotted path of the value in each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub path: &'static str,
}

pub const fn col(header: &'static str, path: &'static str) -> Column {
    Column { header, path }
}

/// What a command produced, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A page of records shown as a table.
    List {
        noun: &'static str,
        columns: &'static [Column],
        payload: Value,
    },
    /// One record shown as `Label: value` lines. Empty `fields` shows every top-level key.
    Record {
        fields: &'static [Column],
        payload: Value,
    },
    /// Human-readable status line, optionally backed by the API response.
    Message { text: String, payload: Option<Value> },
    Raw(Value),
}

impl Outcome {
    pub fn list(noun: &'static str, columns: &'static [Column], payload: Value) -> Self {
        Outcome::List {
            noun,
            columns,
            payload,
        }
    }

    pub fn record(fields: &'static [Column], payload: Value) -> Self {
        Outcome::Record { fields, payload }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Outcome::Message {
            text: text.into(),
            payload: None,
        }
    }

    pub fn message_with(text: impl Into<String>, payload: Value) -> Self {
        Outcome::Message {
            text: text.into(),
            payload: Some(payload),
        }
    }

    /// The JSON document `--output json` and `--query` operate on.
    pub fn json_payload(&self) -> Value {
        match self {
            Outcome::List { payload, .. } | Outcome::Record { payload, .. } => payload.clone(),
            Outcome::Message {
                payload: Some(payload),
                ..
            } => payload.clone(),
            Outcome::Message { text, payload: None } => serde_json::json!({ "message": text }),
            Outcome::Raw(value) => value.clone(),
        }
    }
}

/// Items of a list response plus the server's total when it sent one.
///
/// Accepts a bare array or an object with `items` (or `data`) and an optional
/// `total_count` (top level or under `pagination`).
pub fn list_items(payload: &Value) -> (Vec<&Value>, Option<u64>) {
    match payload {
        Value::Array(items) => (items.iter().collect(), None),
        Value::Object(map) => {
            let items = ["items", "data"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
                .map(|items| items.iter().collect())
                .unwrap_or_default();
            let total = map
                .get("total_count")
                .or_else(|| map.get("pagination").and_then(|p| p.get("total_count")))
                .and_then(Value::as_u64);
            (items, total)
        }
        _ => (Vec::new(), None),
    }
}

/// Follows a dotted path such as `customer.name` or `items.0.id`.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}
