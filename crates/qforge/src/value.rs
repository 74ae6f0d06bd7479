//! Bindable values and per-field value access.
//!
//! [`Value`] is what ends up in an argument list. [`FieldValue`] is what a record
//! exposes for one of its fields, before the field's clause generator decides how
//! (and whether) to bind it.

use crate::record::AnyRecord;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// A single positional SQL argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    NaiveDateTime(NaiveDateTime),
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the variant, used when logging parameters.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Uuid(_) => "uuid",
            Value::DateTime(_) => "datetime",
            Value::NaiveDateTime(_) => "naive_datetime",
            Value::Json(_) => "json",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Uuid(v) => write!(f, "{v}"),
            Value::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Value::NaiveDateTime(v) => write!(f, "{v}"),
            Value::Json(v) => write!(f, "{v}"),
        }
    }
}

/// Conversion of a Rust scalar into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

macro_rules! impl_to_value_int {
    ($($ty:ty),*) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }
            }
        )*
    };
}

impl_to_value_int!(i8, i16, i32, i64, u8, u16, u32);

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for Uuid {
    fn to_value(&self) -> Value {
        Value::Uuid(*self)
    }
}

impl ToValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }
}

impl ToValue for NaiveDateTime {
    fn to_value(&self) -> Value {
        Value::NaiveDateTime(*self)
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, |v| v.to_value())
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    value.to_value()
                }
            }
        )*
    };
}

impl_from_for_value!(
    bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, String, Uuid, DateTime<Utc>, NaiveDateTime,
    serde_json::Value
);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

/// The value a record exposes for one field.
#[derive(Clone)]
pub enum FieldValue<'a> {
    /// Unset; the field contributes nothing.
    Null,
    Scalar(Value),
    List(Vec<Value>),
    /// Lower and upper bound of a `BETWEEN`.
    Range(Value, Value),
    /// A `bool` field; `false` turns the predicate off.
    Flag(bool),
    /// A nested filter record rendered recursively.
    Filter(&'a dyn AnyRecord),
}

impl<'a> FieldValue<'a> {
    /// Scalar field that is always present.
    pub fn scalar<T: ToValue + ?Sized>(value: &T) -> Self {
        FieldValue::Scalar(value.to_value())
    }

    /// `Option<T>` field.
    pub fn opt<T: ToValue>(value: &Option<T>) -> Self {
        match value {
            Some(v) => FieldValue::Scalar(v.to_value()),
            None => FieldValue::Null,
        }
    }

    /// `Vec<T>` field.
    pub fn list<T: ToValue>(values: &[T]) -> Self {
        FieldValue::List(values.iter().map(ToValue::to_value).collect())
    }

    /// `Option<Vec<T>>` field.
    pub fn opt_list<T: ToValue>(values: &Option<Vec<T>>) -> Self {
        match values {
            Some(v) => Self::list(v),
            None => FieldValue::Null,
        }
    }

    /// `Option<(T, T)>` field.
    pub fn opt_range<T: ToValue>(value: &Option<(T, T)>) -> Self {
        match value {
            Some((lo, hi)) => FieldValue::Range(lo.to_value(), hi.to_value()),
            None => FieldValue::Null,
        }
    }

    /// `Option<Q>` field holding a nested filter record.
    pub fn opt_filter<Q: AnyRecord>(value: &'a Option<Q>) -> Self {
        match value {
            Some(q) => FieldValue::Filter(q),
            None => FieldValue::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Value bound when the field is written as a column.
    ///
    /// Returns `None` for shapes that cannot be stored in a single column.
    pub fn to_column_value(&self) -> Option<Value> {
        match self {
            FieldValue::Null => Some(Value::Null),
            FieldValue::Scalar(v) => Some(v.clone()),
            FieldValue::Flag(b) => Some(Value::Bool(*b)),
            FieldValue::List(_) | FieldValue::Range(..) | FieldValue::Filter(_) => None,
        }
    }

    /// Textual form used by table name templates.
    pub(crate) fn to_token(&self) -> Option<String> {
        match self {
            FieldValue::Scalar(Value::Null) | FieldValue::Null => None,
            FieldValue::Scalar(v) => Some(v.to_string()),
            FieldValue::Flag(b) => Some(b.to_string()),
            FieldValue::List(_) | FieldValue::Range(..) | FieldValue::Filter(_) => None,
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("Null"),
            FieldValue::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
            FieldValue::List(v) => f.debug_tuple("List").field(v).finish(),
            FieldValue::Range(a, b) => f.debug_tuple("Range").field(a).field(b).finish(),
            FieldValue::Flag(b) => f.debug_tuple("Flag").field(b).finish(),
            FieldValue::Filter(_) => f.debug_tuple("Filter").field(&"<dyn AnyRecord>").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_conversion() {
        assert_eq!(Value::from(Some(3)), Value::Int(3));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }

    #[test]
    fn field_value_helpers() {
        assert!(FieldValue::opt(&None::<String>).is_null());
        let v = FieldValue::opt_list(&Some(vec![1, 2]));
        assert!(matches!(v, FieldValue::List(ref l) if l.len() == 2));
        assert_eq!(FieldValue::Flag(true).to_column_value(), Some(Value::Bool(true)));
        assert_eq!(FieldValue::list(&[1]).to_column_value(), None);
    }

    #[test]
    fn token_form() {
        assert_eq!(FieldValue::scalar("f0rb").to_token().as_deref(), Some("f0rb"));
        assert_eq!(FieldValue::scalar(&42).to_token().as_deref(), Some("42"));
        assert_eq!(FieldValue::Null.to_token(), None);
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![Value::Int(1), Value::Null, Value::from("a")]).unwrap();
        assert_eq!(json, r#"[1,null,"a"]"#);
    }
}
