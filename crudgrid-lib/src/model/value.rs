//! Value enum for dynamic field values

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

/// A dynamic value that can hold any record field type.
///
/// Values map one-to-one onto flat JSON: `null`, booleans, numbers, and
/// strings become native variants, anything nested falls back to `Json`.
/// Dates travel as ISO-8601 strings; the presentation layer reparses them
/// when a column is declared as a date field.
///
/// # Example
///
/// ```
/// use crudgrid_lib::model::Value;
///
/// let name = Value::from("Jane Smith");
/// let age = Value::from(30);
/// let admin = Value::from(true);
/// let empty = Value::Null;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// Fallback for nested JSON values (arrays, objects).
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Json(_) => "json",
        }
    }

    /// Returns the plain display text for this value.
    ///
    /// Null renders as an empty string; nested JSON renders compact. This is
    /// the text that cell renderers, filters, and URL encoding start from.
    pub fn display_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Json(v) => v.to_string(),
        }
    }

    /// Case-insensitive substring match against this value's display text.
    ///
    /// This is the matching rule the in-memory operation set applies for
    /// every filter key.
    pub fn matches_ci(&self, needle: &str) -> bool {
        self.display_text()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }

    /// Total ordering used by the in-memory sort.
    ///
    /// Same-type values compare natively (numbers cross-compare between
    /// `Int` and `Float`), `Null` sorts first, and mixed types fall back to
    /// comparing display text.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Value::Int(a), Value::Float(b)) => {
                (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (Value::Float(a), Value::Int(b)) => {
                a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => self.display_text().cmp(&other.display_text()),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            other => Value::Json(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text() {
        assert_eq!(Value::Null.display_text(), "");
        assert_eq!(Value::from(true).display_text(), "true");
        assert_eq!(Value::from(42).display_text(), "42");
        assert_eq!(Value::from("Jane").display_text(), "Jane");
    }

    #[test]
    fn test_matches_ci() {
        let name = Value::from("Jane Smith 3");
        assert!(name.matches_ci("smith 3"));
        assert!(name.matches_ci("JANE"));
        assert!(!name.matches_ci("smith 4"));
    }

    #[test]
    fn test_sort_cmp_numbers_cross_type() {
        assert_eq!(
            Value::Int(2).sort_cmp(&Value::Float(2.5)),
            Ordering::Less
        );
        assert_eq!(
            Value::Float(3.0).sort_cmp(&Value::Int(2)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_null_sorts_first() {
        assert_eq!(Value::Null.sort_cmp(&Value::from("a")), Ordering::Less);
        assert_eq!(Value::from(0).sort_cmp(&Value::Null), Ordering::Greater);
    }

    #[test]
    fn test_json_roundtrip() {
        let v: Value = serde_json::from_str("30").unwrap();
        assert_eq!(v, Value::Int(30));
        let v: Value = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(v, Value::String("active".to_string()));
        let v: Value = serde_json::from_str("null").unwrap();
        assert_eq!(v, Value::Null);
    }
}
