//! Finished statements.

use crate::args::{ArgList, count_placeholders};
use crate::value::Value;
use serde::Serialize;

/// SQL text paired with its positional arguments.
///
/// Every envelope is logged at `debug` on the `qforge.sql` target when it is
/// created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlEnvelope {
    sql: String,
    args: Vec<Value>,
}

impl SqlEnvelope {
    pub fn new(sql: impl Into<String>, args: ArgList) -> Self {
        let envelope = Self {
            sql: sql.into(),
            args: args.into_vec(),
        };
        envelope.trace();
        envelope
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Number of `?` markers in the statement text.
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.sql)
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }

    fn trace(&self) {
        if !tracing::enabled!(target: "qforge.sql", tracing::Level::DEBUG) {
            return;
        }
        let params = serde_json::to_string(&self.args).unwrap_or_else(|e| format!("<{e}>"));
        tracing::debug!(
            target: "qforge.sql",
            param_count = self.args.len(),
            sql = %self.sql,
            params = %params,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_sql_and_args() {
        let mut args = ArgList::new();
        args.push(&100);
        args.push_value(Value::Null);
        let envelope = SqlEnvelope::new("UPDATE t SET a = ? WHERE id = ?", args);
        assert_eq!(envelope.sql(), "UPDATE t SET a = ? WHERE id = ?");
        assert_eq!(envelope.args(), &[Value::Int(100), Value::Null]);
        assert_eq!(envelope.placeholder_count(), envelope.args().len());

        let (sql, args) = envelope.into_parts();
        assert!(sql.starts_with("UPDATE"));
        assert_eq!(args.len(), 2);
    }
}
