//! Field values and dotted field-path resolution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A polymorphic leaf value resolved from a record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float if it is numeric
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// String rendering used when two values of different kinds are compared
    ///
    /// Whole floats render without a fractional part so `2.0` and `2` collate
    /// identically.
    pub fn render(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", *f as i64)
            }
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Uuid(u) => u.to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339(),
            FieldValue::Null => "null".to_string(),
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => FieldValue::String(value.to_string()),
        }
    }
}

/// A record whose fields can be looked up by dotted path
///
/// `field_value("client.name")` walks one segment at a time and yields `None`
/// as soon as a segment is missing, so absent intermediates never fail.
/// Implementations should return `None` (or [`FieldValue::Null`]) for absent
/// data; both are treated as "no value" by the comparator.
pub trait FieldSource {
    fn field_value(&self, path: &str) -> Option<FieldValue>;
}

/// Walk a dotted path through a JSON value
///
/// Numeric segments index into arrays. Empty segments never match.
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |current, segment| {
        if segment.is_empty() {
            return None;
        }
        match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}

fn leaf(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Null => None,
        leaf => Some(FieldValue::from(leaf)),
    }
}

impl FieldSource for Value {
    fn field_value(&self, path: &str) -> Option<FieldValue> {
        leaf(resolve_path(self, path)?)
    }
}

impl FieldSource for Map<String, Value> {
    fn field_value(&self, path: &str) -> Option<FieldValue> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        if head.is_empty() {
            return None;
        }
        let value = self.get(head)?;
        match rest {
            Some(rest) => leaf(resolve_path(value, rest)?),
            None => leaf(value),
        }
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn field_value(&self, path: &str) -> Option<FieldValue> {
        (**self).field_value(path)
    }
}
