//! Suffix operators: the field-name convention that picks a comparison.
//!
//! `score_lt` (or `scoreLt`) compares the column `score` with `<`; a name
//! without a known suffix compares with `=`.

use crate::args::ArgList;
use crate::error::{OrmError, OrmResult};
use crate::value::{FieldValue, Value};

/// Comparison selected by a field-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuffixOp {
    /// column = ?
    Eq,
    /// column <> ?
    Not,
    /// column NOT LIKE '%v%'
    NotLike,
    /// column LIKE '%v%'
    Like,
    /// column LIKE '%v%'
    Contain,
    /// column LIKE 'v%'
    Start,
    /// column LIKE '%v'
    End,
    /// column < ?
    Lt,
    /// column > ?
    Gt,
    /// column <= ?
    Le,
    /// column >= ?
    Ge,
    /// column IN (?, ...)
    In,
    /// column NOT IN (?, ...)
    NotIn,
    /// column IS NULL
    IsNull,
    /// column IS NOT NULL
    IsNotNull,
    /// column BETWEEN ? AND ?
    Between,
}

/// Checked in order, so longer suffixes sharing a tail come first.
const SUFFIXES: &[(SuffixOp, &str, &str)] = &[
    (SuffixOp::NotIn, "NotIn", "_not_in"),
    (SuffixOp::In, "In", "_in"),
    (SuffixOp::NotLike, "NotLike", "_not_like"),
    (SuffixOp::Like, "Like", "_like"),
    (SuffixOp::Contain, "Contain", "_contain"),
    (SuffixOp::Start, "Start", "_start"),
    (SuffixOp::End, "End", "_end"),
    (SuffixOp::IsNotNull, "IsNotNull", "_is_not_null"),
    (SuffixOp::IsNull, "IsNull", "_is_null"),
    (SuffixOp::Not, "Not", "_not"),
    (SuffixOp::Lt, "Lt", "_lt"),
    (SuffixOp::Gt, "Gt", "_gt"),
    (SuffixOp::Le, "Le", "_le"),
    (SuffixOp::Ge, "Ge", "_ge"),
    (SuffixOp::Between, "Between", "_between"),
];

impl SuffixOp {
    /// Split a field name into its column part and operator.
    ///
    /// Both `snake_case` (`score_lt`) and `camelCase` (`scoreLt`) names are
    /// recognized. A name that is nothing but a suffix is a plain column.
    pub fn parse(name: &str) -> (&str, SuffixOp) {
        for &(op, camel, snake) in SUFFIXES {
            if let Some(column) = name.strip_suffix(snake) {
                if !column.is_empty() {
                    return (column, op);
                }
            }
            if let Some(column) = name.strip_suffix(camel) {
                if column.chars().last().is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
                    return (column, op);
                }
            }
        }
        (name, SuffixOp::Eq)
    }

    /// Whether the operator tests a flag instead of binding a value.
    pub fn is_null_check(self) -> bool {
        matches!(self, SuffixOp::IsNull | SuffixOp::IsNotNull)
    }

    pub fn is_list(self) -> bool {
        matches!(self, SuffixOp::In | SuffixOp::NotIn)
    }

    pub fn is_like(self) -> bool {
        matches!(
            self,
            SuffixOp::Like | SuffixOp::NotLike | SuffixOp::Contain | SuffixOp::Start | SuffixOp::End
        )
    }

    fn sql_operator(self) -> &'static str {
        match self {
            SuffixOp::Eq => "=",
            SuffixOp::Not => "<>",
            SuffixOp::NotLike => "NOT LIKE",
            SuffixOp::Like | SuffixOp::Contain | SuffixOp::Start | SuffixOp::End => "LIKE",
            SuffixOp::Lt => "<",
            SuffixOp::Gt => ">",
            SuffixOp::Le => "<=",
            SuffixOp::Ge => ">=",
            SuffixOp::In => "IN",
            SuffixOp::NotIn => "NOT IN",
            SuffixOp::IsNull => "IS NULL",
            SuffixOp::IsNotNull => "IS NOT NULL",
            SuffixOp::Between => "BETWEEN",
        }
    }

    /// Render `column <op> ...` and append the arguments it binds.
    ///
    /// Returns `None` when the value turns the condition off: null, an empty
    /// list, or a `false` null-check flag.
    pub fn render(
        self,
        column: &str,
        value: &FieldValue<'_>,
        args: &mut ArgList,
    ) -> OrmResult<Option<String>> {
        let operator = self.sql_operator();
        match self {
            SuffixOp::IsNull | SuffixOp::IsNotNull => match value {
                FieldValue::Flag(true) | FieldValue::Scalar(Value::Bool(true)) => {
                    Ok(Some(format!("{column} {operator}")))
                }
                FieldValue::Flag(false) | FieldValue::Scalar(Value::Bool(false)) | FieldValue::Null => {
                    Ok(None)
                }
                other => Err(shape_error(column, self, other)),
            },
            SuffixOp::In | SuffixOp::NotIn => {
                let values: Vec<Value> = match value {
                    FieldValue::Null => return Ok(None),
                    FieldValue::List(values) => values.clone(),
                    FieldValue::Scalar(v) => vec![v.clone()],
                    other => return Err(shape_error(column, self, other)),
                };
                if values.is_empty() {
                    return Ok(None);
                }
                let placeholders = vec!["?"; values.len()].join(", ");
                for v in values {
                    args.push_value(v);
                }
                Ok(Some(format!("{column} {operator} ({placeholders})")))
            }
            SuffixOp::Between => match value {
                FieldValue::Null => Ok(None),
                FieldValue::Range(lo, hi) => {
                    args.push_value(lo.clone());
                    args.push_value(hi.clone());
                    Ok(Some(format!("{column} {operator} ? AND ?")))
                }
                other => Err(shape_error(column, self, other)),
            },
            _ => {
                let bound = match value {
                    FieldValue::Null => return Ok(None),
                    FieldValue::Scalar(v) => v.clone(),
                    FieldValue::Flag(b) => Value::Bool(*b),
                    other => return Err(shape_error(column, self, other)),
                };
                let bound = if self.is_like() { self.wrap_pattern(&bound) } else { bound };
                args.push_value(bound);
                Ok(Some(format!("{column} {operator} ?")))
            }
        }
    }

    fn wrap_pattern(self, value: &Value) -> Value {
        let raw = value.to_string();
        let escaped = escape_like(&raw);
        let pattern = match self {
            SuffixOp::Start => format!("{escaped}%"),
            SuffixOp::End => format!("%{escaped}"),
            _ => format!("%{escaped}%"),
        };
        Value::Text(pattern)
    }
}

/// Escape LIKE wildcards so user input matches literally.
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn shape_error(column: &str, op: SuffixOp, value: &FieldValue<'_>) -> OrmError {
    OrmError::validation(format!(
        "{op:?} condition on '{column}' cannot bind {value:?}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_snake_and_camel_suffixes() {
        assert_eq!(SuffixOp::parse("score_lt"), ("score", SuffixOp::Lt));
        assert_eq!(SuffixOp::parse("scoreLt"), ("score", SuffixOp::Lt));
        assert_eq!(SuffixOp::parse("id_not_in"), ("id", SuffixOp::NotIn));
        assert_eq!(SuffixOp::parse("idNotIn"), ("id", SuffixOp::NotIn));
        assert_eq!(SuffixOp::parse("id_in"), ("id", SuffixOp::In));
        assert_eq!(SuffixOp::parse("username_not_like"), ("username", SuffixOp::NotLike));
        assert_eq!(SuffixOp::parse("memo_is_null"), ("memo", SuffixOp::IsNull));
        assert_eq!(SuffixOp::parse("memo_is_not_null"), ("memo", SuffixOp::IsNotNull));
        assert_eq!(SuffixOp::parse("memoIsNotNull"), ("memo", SuffixOp::IsNotNull));
        assert_eq!(SuffixOp::parse("status_not"), ("status", SuffixOp::Not));
        assert_eq!(SuffixOp::parse("age_between"), ("age", SuffixOp::Between));
    }

    #[test]
    fn plain_names_are_equality() {
        assert_eq!(SuffixOp::parse("username"), ("username", SuffixOp::Eq));
        assert_eq!(SuffixOp::parse("domain"), ("domain", SuffixOp::Eq));
        assert_eq!(SuffixOp::parse("In"), ("In", SuffixOp::Eq));
        assert_eq!(SuffixOp::parse("_in"), ("_in", SuffixOp::Eq));
    }

    #[test]
    fn renders_comparison() {
        let mut args = ArgList::new();
        let sql = SuffixOp::Lt
            .render("score", &FieldValue::Scalar(Value::Int(100)), &mut args)
            .unwrap();
        assert_eq!(sql.as_deref(), Some("score < ?"));
        assert_eq!(args.as_slice(), &[Value::Int(100)]);
    }

    #[test]
    fn renders_like_with_wildcards() {
        let mut args = ArgList::new();
        let value = FieldValue::Scalar(Value::from("50%_off"));
        assert_eq!(
            SuffixOp::Start.render("name", &value, &mut args).unwrap().as_deref(),
            Some("name LIKE ?")
        );
        assert_eq!(args.as_slice(), &[Value::from("50\\%\\_off%")]);

        let mut args = ArgList::new();
        SuffixOp::End.render("name", &FieldValue::Scalar(Value::from("x")), &mut args).unwrap();
        SuffixOp::Like.render("name", &FieldValue::Scalar(Value::from("y")), &mut args).unwrap();
        assert_eq!(args.as_slice(), &[Value::from("%x"), Value::from("%y%")]);
    }

    #[test]
    fn renders_in_list_sized_to_values() {
        let mut args = ArgList::new();
        let value = FieldValue::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let sql = SuffixOp::In.render("id", &value, &mut args).unwrap();
        assert_eq!(sql.as_deref(), Some("id IN (?, ?, ?)"));
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn empty_in_list_is_skipped() {
        let mut args = ArgList::new();
        let sql = SuffixOp::NotIn
            .render("id", &FieldValue::List(Vec::new()), &mut args)
            .unwrap();
        assert_eq!(sql, None);
        assert!(args.is_empty());
    }

    #[test]
    fn null_checks_follow_the_flag() {
        let mut args = ArgList::new();
        assert_eq!(
            SuffixOp::IsNull.render("memo", &FieldValue::Flag(true), &mut args).unwrap().as_deref(),
            Some("memo IS NULL")
        );
        assert_eq!(SuffixOp::IsNotNull.render("memo", &FieldValue::Flag(false), &mut args).unwrap(), None);
        assert!(args.is_empty());
    }

    #[test]
    fn between_binds_two() {
        let mut args = ArgList::new();
        let value = FieldValue::Range(Value::Int(1), Value::Int(9));
        let sql = SuffixOp::Between.render("age", &value, &mut args).unwrap();
        assert_eq!(sql.as_deref(), Some("age BETWEEN ? AND ?"));
        assert_eq!(args.as_slice(), &[Value::Int(1), Value::Int(9)]);
    }

    #[test]
    fn null_is_skipped() {
        let mut args = ArgList::new();
        assert_eq!(SuffixOp::Eq.render("a", &FieldValue::Null, &mut args).unwrap(), None);
        assert!(args.is_empty());
    }

    #[test]
    fn list_on_scalar_operator_is_rejected() {
        let mut args = ArgList::new();
        let err = SuffixOp::Eq
            .render("a", &FieldValue::List(vec![Value::Int(1)]), &mut args)
            .unwrap_err();
        assert!(err.is_validation());
    }
}
