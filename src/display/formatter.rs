use super::outcome::Outcome;
use super::query::PathQuery;
use super::table::TableDisplay;
use super::OutputFormat;
use crate::error::DisplayError;
use serde_json::Value;

/// Turns an [`Outcome`] into the text written to stdout.
pub struct Formatter {
    format: OutputFormat,
    query: Option<PathQuery>,
    items_only: bool,
    table: TableDisplay,
}

impl Formatter {
    pub fn new(format: OutputFormat, use_colors: bool) -> Self {
        Self {
            format,
            query: None,
            items_only: false,
            table: TableDisplay::new().with_colors(use_colors),
        }
    }

    pub fn with_query(mut self, query: PathQuery) -> Self {
        self.query = Some(query);
        self
    }

    /// JSON output shows only the `items`/`data` array of a list response.
    pub fn with_items_only(mut self, items_only: bool) -> Self {
        self.items_only = items_only;
        self
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.table = self.table.with_max_width(width);
        self
    }

    pub fn render(&self, outcome: &Outcome) -> Result<String, DisplayError> {
        match self.format {
            OutputFormat::Json => self.render_json(outcome),
            OutputFormat::Text => Ok(self.render_text(outcome)),
        }
    }

    fn render_json(&self, outcome: &Outcome) -> Result<String, DisplayError> {
        let mut document = outcome.json_payload();
        if self.items_only {
            document = unwrap_items(document);
        }
        match &self.query {
            None => pretty(&document),
            Some(query) => {
                let selected = query.evaluate(&document)?;
                let rendered = selected
                    .iter()
                    .map(pretty)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rendered.join("\n"))
            }
        }
    }

    fn render_text(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::List {
                noun,
                columns,
                payload,
            } => self.table.render_list(noun, columns, payload),
            Outcome::Record { fields, payload } => self.table.render_record(fields, payload),
            Outcome::Message { text, .. } => text.clone(),
            Outcome::Raw(Value::Null) => String::new(),
            Outcome::Raw(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

fn unwrap_items(document: Value) -> Value {
    match document {
        Value::Object(mut map) => match ["items", "data", "results"]
            .iter()
            .find(|key| map.get(**key).is_some_and(Value::is_array))
        {
            Some(key) => map.remove(*key).unwrap_or(Value::Null),
            None => Value::Object(map),
        },
        other => other,
    }
}

fn pretty(value: &Value) -> Result<String, DisplayError> {
    serde_json::to_string_pretty(value).map_err(|e| DisplayError::Serialize(e.to_string()))
}
