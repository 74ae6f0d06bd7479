//! Positional argument list shared by clause generators.

use crate::value::{ToValue, Value};

/// Placeholder marker emitted into SQL text.
pub const PLACEHOLDER: char = '?';

/// Count placeholder markers in a SQL fragment.
pub fn count_placeholders(sql: &str) -> usize {
    sql.matches(PLACEHOLDER).count()
}

/// An ordered list of arguments, appended in the same order as the `?` markers
/// written into the statement.
///
/// Generators only ever push; nothing is reordered or removed once appended.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArgList {
    values: Vec<Value>,
}

impl ArgList {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Add an argument and return its 1-based position.
    pub fn push<T: ToValue + ?Sized>(&mut self, value: &T) -> usize {
        self.values.push(value.to_value());
        self.values.len()
    }

    /// Add an already converted value and return its 1-based position.
    pub fn push_value(&mut self, value: Value) -> usize {
        self.values.push(value);
        self.values.len()
    }

    /// Add the same value `times` times.
    pub fn push_repeated(&mut self, value: &Value, times: usize) {
        self.values
            .extend(std::iter::repeat_n(value, times).cloned());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Extend this list with another list's arguments.
    pub fn extend(&mut self, other: ArgList) {
        self.values.extend(other.values);
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for ArgList {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}

impl IntoIterator for ArgList {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_position() {
        let mut args = ArgList::new();
        assert_eq!(args.push(&1), 1);
        assert_eq!(args.push("a"), 2);
        assert_eq!(args.push_value(Value::Null), 3);
        assert_eq!(args.as_slice(), &[Value::Int(1), Value::from("a"), Value::Null]);
    }

    #[test]
    fn repeated_values() {
        let mut args = ArgList::new();
        args.push_repeated(&Value::from("x"), 3);
        assert_eq!(args.len(), 3);
        args.push_repeated(&Value::Null, 0);
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn counts_markers() {
        assert_eq!(count_placeholders("a = ? OR b = ?"), 2);
        assert_eq!(count_placeholders("valid = 1"), 0);
    }
}
