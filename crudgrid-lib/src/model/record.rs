//! Dynamic record type

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::Value;
use crate::error::FieldError;

/// A dynamic record: an open mapping from field name to value.
///
/// Records serialize to and from flat JSON objects. One field, designated by
/// the caller when constructing a controller or source, acts as the identity
/// key: unique within a collection and immutable after creation. The record
/// itself does not know which field that is.
///
/// # Example
///
/// ```
/// use crudgrid_lib::model::Record;
///
/// let record = Record::new()
///     .set("name", "Jane Smith")
///     .set("age", 30);
///
/// assert_eq!(record.get_string("name").unwrap(), Some("Jane Smith"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns the number of fields in the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Merges another record into this one.
    ///
    /// Fields from `other` overwrite fields with the same name, matching the
    /// partial-update semantics of every operation set.
    pub fn merge(&mut self, other: Record) {
        self.fields.extend(other.fields);
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if field is missing or wrong type.
    // Return Ok(None) only if the field exists and is Value::Null.
    // =========================================================================

    /// Gets a string field value.
    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "string",
                other.type_name(),
            )),
        }
    }

    /// Gets a boolean field value.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(FieldError::type_mismatch(field, "bool", other.type_name())),
        }
    }

    /// Gets an i64 field value.
    pub fn get_long(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(other) => Err(FieldError::type_mismatch(field, "int", other.type_name())),
        }
    }

    /// Gets an f64 field value.
    pub fn get_float(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Float(n)) => Ok(Some(*n)),
            Some(Value::Int(n)) => Ok(Some(*n as f64)), // Allow widening
            Some(other) => Err(FieldError::type_mismatch(field, "float", other.type_name())),
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let record = Record::new()
            .set("name", "Jane")
            .set("age", 30)
            .set("note", Value::Null);

        assert_eq!(record.get_string("name").unwrap(), Some("Jane"));
        assert_eq!(record.get_long("age").unwrap(), Some(30));
        assert_eq!(record.get_string("note").unwrap(), None);
        assert!(record.get_string("missing").is_err());
        assert!(record.get_long("name").is_err());
    }

    #[test]
    fn test_merge_overwrites() {
        let mut record = Record::new().set("name", "Jane").set("age", 30);
        record.merge(Record::new().set("age", 31));

        assert_eq!(record.get_long("age").unwrap(), Some(31));
        assert_eq!(record.get_string("name").unwrap(), Some("Jane"));
    }

    #[test]
    fn test_serde_flat_object() {
        let record = Record::new().set("id", 1).set("name", "Jane");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Jane");

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
