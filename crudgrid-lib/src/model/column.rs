//! Column descriptor types

use serde::Deserialize;
use serde::Serialize;

use super::Value;

/// The rendering/input category of a column.
///
/// This closed enum is what the presentation dispatch keys on: each variant
/// maps to one cell renderer and one edit widget (see
/// [`widgets_for`](crate::render::widgets_for)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free-form text.
    String,
    /// Integer or floating point number.
    Number,
    /// ISO-8601 date or date-time, stored as a string value.
    Date,
    /// Boolean flag.
    Boolean,
    /// One of a fixed set of options.
    Enum,
    /// Caller-rendered value.
    Custom,
}

/// One selectable option of an enum column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumOption {
    /// The stored field value.
    pub value: Value,
    /// The label shown for that value.
    pub label: String,
}

impl EnumOption {
    /// Creates a new enum option.
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Declarative description of one table column.
///
/// Columns are owned by the caller and read-only to the component: the grid,
/// the form, and the widget dispatch all consume the same descriptor list.
///
/// # Example
///
/// ```
/// use crudgrid_lib::model::{Column, EnumOption, FieldType};
///
/// let columns = vec![
///     Column::new("name", "Name").required().searchable(),
///     Column::new("age", "Age").field_type(FieldType::Number),
///     Column::new("status", "Status").options(vec![
///         EnumOption::new("active", "Active"),
///         EnumOption::new("inactive", "Inactive"),
///     ]),
/// ];
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// The record field this column reads and writes.
    pub field_name: String,
    /// The header/form label.
    pub display_label: String,
    /// Rendering/input category.
    pub field_type: FieldType,
    /// Options for [`FieldType::Enum`] columns.
    #[serde(default)]
    pub enum_options: Vec<EnumOption>,
    /// Whether the edit form requires a non-empty value.
    #[serde(default)]
    pub required: bool,
    /// Whether the edit form offers this column at all.
    #[serde(default = "default_editable")]
    pub editable: bool,
    /// Whether the search toolbar offers a filter for this column.
    #[serde(default)]
    pub searchable: bool,
}

fn default_editable() -> bool {
    true
}

impl Column {
    /// Creates a new string column with the given field name and label.
    pub fn new(field_name: impl Into<String>, display_label: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            display_label: display_label.into(),
            field_type: FieldType::String,
            enum_options: Vec::new(),
            required: false,
            editable: true,
            searchable: false,
        }
    }

    /// Sets the field type.
    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Sets the enum options and switches the column to [`FieldType::Enum`].
    pub fn options(mut self, options: Vec<EnumOption>) -> Self {
        self.field_type = FieldType::Enum;
        self.enum_options = options;
        self
    }

    /// Marks the column as required in the edit form.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Excludes the column from the edit form.
    pub fn readonly(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Marks the column as filterable from the search toolbar.
    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Resolves a stored value to its option label, if this is an enum
    /// column and the value is one of its options.
    pub fn option_label(&self, value: &Value) -> Option<&str> {
        self.enum_options
            .iter()
            .find(|opt| opt.value == *value)
            .map(|opt| opt.label.as_str())
    }
}

/// Returns the columns offered by the search toolbar.
pub fn searchable_columns(columns: &[Column]) -> Vec<&Column> {
    columns.iter().filter(|c| c.searchable).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_label() {
        let column = Column::new("status", "Status").options(vec![
            EnumOption::new("active", "Active"),
            EnumOption::new("inactive", "Inactive"),
        ]);

        assert_eq!(column.field_type, FieldType::Enum);
        assert_eq!(
            column.option_label(&Value::from("active")),
            Some("Active")
        );
        assert_eq!(column.option_label(&Value::from("archived")), None);
    }

    #[test]
    fn test_searchable_columns() {
        let columns = vec![
            Column::new("name", "Name").searchable(),
            Column::new("age", "Age"),
        ];
        let searchable = searchable_columns(&columns);
        assert_eq!(searchable.len(), 1);
        assert_eq!(searchable[0].field_name, "name");
    }
}
