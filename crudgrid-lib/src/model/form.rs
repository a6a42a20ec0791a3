//! Modal edit form model

use super::Column;
use super::Record;
use super::Value;
use crate::controller::CrudController;
use crate::error::ValidationError;

/// What submitting the form should do.
#[derive(Debug, Clone, PartialEq)]
pub enum FormIntent {
    /// Create a new record.
    Create,
    /// Update the record with this identity key.
    Update(Value),
}

#[derive(Debug, Clone)]
struct FormField {
    column: Column,
    value: Value,
}

/// The state of a modal create/edit form.
///
/// A form is built from the editable subset of a column list, collects
/// values as the user types, validates them, and on submit hands the
/// resulting partial record to the controller's `create` or `update`
/// operation. Validation failures stay in the presentation layer and never
/// reach the controller.
///
/// # Example
///
/// ```
/// use crudgrid_lib::model::{Column, FormModel, Value};
///
/// let columns = vec![Column::new("name", "Name").required()];
/// let mut form = FormModel::create(&columns);
///
/// assert!(form.validate().is_err());
/// form.set("name", "Jane Smith");
/// assert!(form.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct FormModel {
    intent: FormIntent,
    fields: Vec<FormField>,
}

impl FormModel {
    /// Creates an empty form for a new record.
    pub fn create(columns: &[Column]) -> Self {
        Self {
            intent: FormIntent::Create,
            fields: editable_fields(columns, None),
        }
    }

    /// Creates a form pre-filled from an existing record.
    pub fn edit(columns: &[Column], key: Value, record: &Record) -> Self {
        Self {
            intent: FormIntent::Update(key),
            fields: editable_fields(columns, Some(record)),
        }
    }

    /// Returns the submit intent of this form.
    pub fn intent(&self) -> &FormIntent {
        &self.intent
    }

    /// Returns the columns backing the form fields, in form order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.fields.iter().map(|f| &f.column)
    }

    /// Sets a field value. Returns `false` if the form has no such field.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> bool {
        match self.fields.iter_mut().find(|f| f.column.field_name == field) {
            Some(entry) => {
                entry.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Returns the current value of a field, if the form has it.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| f.column.field_name == field)
            .map(|f| &f.value)
    }

    /// Checks every required field for a non-empty value.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = self
            .fields
            .iter()
            .filter(|f| f.column.required && is_empty_input(&f.value))
            .map(|f| ValidationError::required(&f.column.field_name, &f.column.display_label))
            .collect();

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Produces the partial record for submission, skipping empty fields.
    pub fn to_record(&self) -> Record {
        self.fields
            .iter()
            .filter(|f| !f.value.is_null())
            .map(|f| (f.column.field_name.clone(), f.value.clone()))
            .collect()
    }

    /// Validates and submits the form through the controller.
    ///
    /// Returns `Err` with field errors when validation fails (the controller
    /// is never contacted), `Ok(None)` when the underlying operation fails,
    /// and `Ok(Some(record))` on success.
    pub async fn submit(
        &self,
        controller: &CrudController,
    ) -> Result<Option<Record>, Vec<ValidationError>> {
        self.validate()?;

        let record = self.to_record();
        let result = match &self.intent {
            FormIntent::Create => controller.create(record).await,
            FormIntent::Update(key) => controller.update(key, record).await,
        };
        Ok(result)
    }
}

fn editable_fields(columns: &[Column], record: Option<&Record>) -> Vec<FormField> {
    columns
        .iter()
        .filter(|c| c.editable)
        .map(|c| FormField {
            value: record
                .and_then(|r| r.get(&c.field_name))
                .cloned()
                .unwrap_or(Value::Null),
            column: c.clone(),
        })
        .collect()
}

fn is_empty_input(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID").readonly(),
            Column::new("name", "Name").required(),
            Column::new("age", "Age").field_type(FieldType::Number),
        ]
    }

    #[test]
    fn test_readonly_columns_excluded() {
        let form = FormModel::create(&columns());
        assert!(form.value("id").is_none());
        assert!(form.value("name").is_some());
    }

    #[test]
    fn test_required_validation() {
        let mut form = FormModel::create(&columns());

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[0].message, "Name is required");

        form.set("name", "   ");
        assert!(form.validate().is_err());

        form.set("name", "Jane Smith");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_to_record_skips_empty() {
        let mut form = FormModel::create(&columns());
        form.set("name", "Jane Smith");

        let record = form.to_record();
        assert_eq!(record.get_string("name").unwrap(), Some("Jane Smith"));
        assert!(!record.contains("age"));
    }

    #[test]
    fn test_edit_prefills() {
        let record = Record::new().set("id", 7).set("name", "Jane").set("age", 30);
        let form = FormModel::edit(&columns(), Value::Int(7), &record);

        assert_eq!(form.value("name"), Some(&Value::from("Jane")));
        assert_eq!(form.value("age"), Some(&Value::from(30)));
        assert_eq!(form.intent(), &FormIntent::Update(Value::Int(7)));
    }
}
