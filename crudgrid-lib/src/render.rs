//! Presentation dispatch
//!
//! Maps each [`FieldType`] to a display renderer and an edit widget
//! descriptor. The mapping is toolkit-agnostic: renderers produce cell text
//! and [`EditorKind`] tells the host UI which input primitive to mount, so
//! any toolkit's table/form equivalents plug in.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

use crate::model::Column;
use crate::model::EnumOption;
use crate::model::FieldType;
use crate::model::Record;
use crate::model::Value;

// =============================================================================
// Widget dispatch
// =============================================================================

/// Renders one cell value to display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRenderer {
    /// Display text as-is.
    Text,
    /// Numeric display text.
    Number,
    /// Reparse an ISO-8601 string and format it as `YYYY-MM-DD HH:MM`.
    DateTime,
    /// Render booleans as a Yes/No tag.
    YesNo,
    /// Resolve the value through the column's enum options to its label.
    OptionLabel,
    /// Delegate to a caller-registered renderer (see [`GridView::custom`]).
    Custom,
}

/// The edit-form input widget for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorKind {
    /// Free-form text input.
    TextInput,
    /// Numeric input.
    NumberInput,
    /// Date picker.
    DatePicker,
    /// Boolean toggle.
    Toggle,
    /// Single-select over these options.
    Select(Vec<EnumOption>),
    /// Caller-rendered editor.
    Custom,
}

/// Looks up the (renderer, editor) pair for a column.
///
/// This is the single dispatch point between the declarative column model
/// and concrete widgets; there is no per-column special casing anywhere
/// else.
pub fn widgets_for(column: &Column) -> (CellRenderer, EditorKind) {
    match column.field_type {
        FieldType::String => (CellRenderer::Text, EditorKind::TextInput),
        FieldType::Number => (CellRenderer::Number, EditorKind::NumberInput),
        FieldType::Date => (CellRenderer::DateTime, EditorKind::DatePicker),
        FieldType::Boolean => (CellRenderer::YesNo, EditorKind::Toggle),
        FieldType::Enum => (
            CellRenderer::OptionLabel,
            EditorKind::Select(column.enum_options.clone()),
        ),
        FieldType::Custom => (CellRenderer::Custom, EditorKind::Custom),
    }
}

impl CellRenderer {
    /// Renders the column's value from a record to display text.
    pub fn render(&self, column: &Column, record: &Record) -> String {
        let value = record.get(&column.field_name).unwrap_or(&Value::Null);
        match self {
            CellRenderer::Text | CellRenderer::Number | CellRenderer::Custom => {
                value.display_text()
            }
            CellRenderer::DateTime => format_date(value),
            CellRenderer::YesNo => match value {
                Value::Bool(true) => "Yes".to_string(),
                Value::Bool(false) | Value::Null => "No".to_string(),
                other => other.display_text(),
            },
            CellRenderer::OptionLabel => column
                .option_label(value)
                .map(str::to_string)
                .unwrap_or_else(|| value.display_text()),
        }
    }
}

fn format_date(value: &Value) -> String {
    let text = value.display_text();
    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
        return format!("{} 00:00", date.format("%Y-%m-%d"));
    }
    text
}

// =============================================================================
// Toolbar
// =============================================================================

/// A toolbar action offered above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Open the create form.
    New,
    /// Refresh the current page.
    Refresh,
    /// Export the visible rows.
    Export,
}

impl ToolbarAction {
    /// Returns the button label.
    pub fn label(&self) -> &'static str {
        match self {
            ToolbarAction::New => "New",
            ToolbarAction::Refresh => "Refresh",
            ToolbarAction::Export => "Export",
        }
    }
}

/// The standard toolbar: New, Refresh, Export.
pub fn default_toolbar() -> Vec<ToolbarAction> {
    vec![
        ToolbarAction::New,
        ToolbarAction::Refresh,
        ToolbarAction::Export,
    ]
}

// =============================================================================
// Grid view
// =============================================================================

/// Caller-registered renderer for [`FieldType::Custom`] columns.
pub type CustomRenderer = Arc<dyn Fn(&Value, &Record) -> String + Send + Sync>;

/// Renders records through a column list into header and row text.
///
/// # Example
///
/// ```
/// use crudgrid_lib::model::{Column, Record};
/// use crudgrid_lib::render::GridView;
///
/// let grid = GridView::new(vec![Column::new("name", "Name")]);
/// let rows = grid.rows(&[Record::new().set("name", "Jane Smith")]);
/// assert_eq!(rows, vec![vec!["Jane Smith".to_string()]]);
/// ```
pub struct GridView {
    columns: Vec<Column>,
    custom: HashMap<String, CustomRenderer>,
}

impl GridView {
    /// Creates a grid over the given columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            custom: HashMap::new(),
        }
    }

    /// Registers a custom renderer for one field.
    pub fn custom<F>(mut self, field: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &Record) -> String + Send + Sync + 'static,
    {
        self.custom.insert(field.into(), Arc::new(f));
        self
    }

    /// Returns the header labels.
    pub fn header(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.display_label.clone())
            .collect()
    }

    /// Renders one record to a row of cell text.
    pub fn row(&self, record: &Record) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| {
                if let Some(f) = self.custom.get(&column.field_name) {
                    let value = record.get(&column.field_name).unwrap_or(&Value::Null);
                    return f(value, record);
                }
                let (renderer, _) = widgets_for(column);
                renderer.render(column, record)
            })
            .collect()
    }

    /// Renders all records to rows of cell text.
    pub fn rows(&self, records: &[Record]) -> Vec<Vec<String>> {
        records.iter().map(|r| self.row(r)).collect()
    }

    /// Renders a plain-text table with padded columns.
    pub fn to_text(&self, records: &[Record]) -> String {
        let header = self.header();
        let rows = self.rows(records);

        let mut widths: Vec<usize> = header.iter().map(String::len).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        let render_line = |cells: &[String]| {
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![render_line(&header)];
        lines.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
        for row in &rows {
            lines.push(render_line(row));
        }
        lines.join("\n")
    }

    /// Renders the grid as CSV, header first.
    pub fn to_csv(&self, records: &[Record]) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.header())
            .expect("in-memory csv write");
        for record in records {
            writer
                .write_record(self.row(record))
                .expect("in-memory csv write");
        }
        let bytes = writer.into_inner().expect("in-memory csv write");
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name"),
            Column::new("age", "Age").field_type(FieldType::Number),
            Column::new("created_at", "Created").field_type(FieldType::Date),
            Column::new("is_admin", "Admin").field_type(FieldType::Boolean),
            Column::new("status", "Status").options(vec![
                EnumOption::new("active", "Active"),
                EnumOption::new("inactive", "Inactive"),
            ]),
        ]
    }

    fn record() -> Record {
        Record::new()
            .set("name", "Jane Smith")
            .set("age", 30)
            .set("created_at", "2023-01-01")
            .set("is_admin", true)
            .set("status", "active")
    }

    #[test]
    fn test_widget_dispatch() {
        let columns = columns();
        assert_eq!(
            widgets_for(&columns[0]),
            (CellRenderer::Text, EditorKind::TextInput)
        );
        assert_eq!(
            widgets_for(&columns[3]),
            (CellRenderer::YesNo, EditorKind::Toggle)
        );
        match widgets_for(&columns[4]) {
            (CellRenderer::OptionLabel, EditorKind::Select(options)) => {
                assert_eq!(options.len(), 2);
            }
            other => panic!("unexpected dispatch: {:?}", other),
        }
    }

    #[test]
    fn test_row_rendering() {
        let grid = GridView::new(columns());
        let row = grid.row(&record());
        assert_eq!(
            row,
            vec!["Jane Smith", "30", "2023-01-01 00:00", "Yes", "Active"]
        );
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(
            format_date(&Value::from("2023-01-01T12:30:00Z")),
            "2023-01-01 12:30"
        );
        assert_eq!(
            format_date(&Value::from("2023-01-01T12:30:00")),
            "2023-01-01 12:30"
        );
        assert_eq!(format_date(&Value::from("2023-01-01")), "2023-01-01 00:00");
        assert_eq!(format_date(&Value::from("not a date")), "not a date");
    }

    #[test]
    fn test_custom_renderer() {
        let grid = GridView::new(vec![
            Column::new("age", "Age").field_type(FieldType::Custom)
        ])
        .custom("age", |value, _record| format!("{} years", value.display_text()));

        assert_eq!(grid.row(&record()), vec!["30 years"]);
    }

    #[test]
    fn test_csv_export() {
        let grid = GridView::new(vec![
            Column::new("name", "Name"),
            Column::new("age", "Age").field_type(FieldType::Number),
        ]);
        let csv = grid.to_csv(&[record()]);
        assert_eq!(csv, "Name,Age\nJane Smith,30\n");
    }

    #[test]
    fn test_toolbar_labels() {
        let labels: Vec<&str> = default_toolbar().iter().map(ToolbarAction::label).collect();
        assert_eq!(labels, vec!["New", "Refresh", "Export"]);
    }
}
