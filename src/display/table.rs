use super::outcome::{Column, list_items, lookup};
use crate::utils::text::{single_line, truncate_to_width};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use crossterm::terminal;
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

const EMPTY_CELL: &str = "-";
const MIN_CELL_WIDTH: usize = 8;

/// Table and key/value rendering for text output.
pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: false,
        }
    }

    /// Terminal width clamped to 40..=200, or 80 when not a terminal.
    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _rows)) => Some((cols as usize).clamp(40, 200)),
            Err(_) => Some(80),
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Renders a list payload, or `No <noun> found.` when it has no items.
    pub fn render_list(&self, noun: &str, columns: &[Column], payload: &Value) -> String {
        let (items, total) = list_items(payload);
        if items.is_empty() {
            return format!("No {} found.", noun);
        }

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        self.configure_table_width(&mut table);

        table.set_header(
            columns
                .iter()
                .map(|c| self.header_cell(c.header))
                .collect::<Vec<_>>(),
        );

        let cell_width = self.cell_width(columns.len());
        for item in &items {
            table.add_row(
                columns
                    .iter()
                    .map(|c| {
                        let text = cell_text(lookup(item, c.path));
                        Cell::new(truncate_to_width(&text, cell_width))
                    })
                    .collect::<Vec<_>>(),
            );
        }

        let mut out = table.to_string();
        match total {
            Some(total) => out.push_str(&format!(
                "\n\nShowing {} of {} {}",
                items.len(),
                total,
                noun
            )),
            None => out.push_str(&format!("\n\nShowing {} {}", items.len(), noun)),
        }
        out
    }

    /// Aligned `Label: value` lines. Empty `fields` lists every top-level key.
    pub fn render_record(&self, fields: &[Column], payload: &Value) -> String {
        let rows: Vec<(String, String)> = if fields.is_empty() {
            match payload {
                Value::Object(map) => map
                    .iter()
                    .map(|(k, v)| (k.clone(), cell_text(Some(v))))
                    .collect(),
                other => return cell_text(Some(other)),
            }
        } else {
            fields
                .iter()
                .map(|f| (f.header.to_string(), cell_text(lookup(payload, f.path))))
                .collect()
        };

        let label_width = rows.iter().map(|(l, _)| l.width()).max().unwrap_or(0) + 1;
        let value_width = self
            .max_width
            .unwrap_or(80)
            .saturating_sub(label_width + 1)
            .max(MIN_CELL_WIDTH);

        rows.iter()
            .map(|(label, value)| {
                let label = format!("{}:", label);
                let pad = " ".repeat(label_width.saturating_sub(label.width()));
                let label = if self.use_colors {
                    format!("\x1b[1m{}\x1b[0m", label)
                } else {
                    label
                };
                format!("{}{} {}", label, pad, truncate_to_width(value, value_width))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn header_cell(&self, text: &str) -> Cell {
        if self.use_colors {
            Cell::new(text).add_attribute(Attribute::Bold).fg(Color::Cyan)
        } else {
            Cell::new(text)
        }
    }

    fn configure_table_width(&self, table: &mut Table) {
        let width = self.max_width.unwrap_or(80);
        table.set_width(width.saturating_sub(2).max(40) as u16);
    }

    /// Per-cell budget so one long value cannot squeeze the other columns.
    fn cell_width(&self, columns: usize) -> usize {
        let width = self.max_width.unwrap_or(80);
        (width / columns.max(1)).saturating_sub(3).max(MIN_CELL_WIDTH)
    }
}

/// Text for one value: strings bare, scalars via Display, nested values as compact JSON.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => EMPTY_CELL.to_string(),
        Some(Value::String(s)) if s.is_empty() => EMPTY_CELL.to_string(),
        Some(Value::String(s)) => single_line(s),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}
