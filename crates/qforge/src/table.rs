//! Dynamic table names.
//!
//! A table template mixes literal text with `${field}` placeholders, e.g.
//! `t_dynamic_${user}_${project}`. Rendering substitutes each placeholder with
//! the named field's value when it is a safe token (`[A-Za-z0-9_]+`). Anything
//! else leaves the placeholder text in place, which no database accepts as a
//! table name, so a bad value can never reach the statement.

use crate::descriptor::RecordDescriptor;
use crate::ident::is_safe_token;
use crate::record::AnyRecord;

/// Field names referenced by `${...}` placeholders, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        names.push(&after[..end]);
        rest = &after[end + 1..];
    }
    names
}

/// Render `template` with values read from `record`.
pub fn render(template: &str, descriptor: &RecordDescriptor, record: &dyn AnyRecord) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unclosed: keep the remainder as written.
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match substitution(name, descriptor, record) {
            Some(token) => out.push_str(&token),
            None => {
                tracing::warn!(
                    target: "qforge.table",
                    template,
                    field = name,
                    "table placeholder left unresolved"
                );
                out.push_str(&rest[start..start + 2 + end + 1]);
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

fn substitution(name: &str, descriptor: &RecordDescriptor, record: &dyn AnyRecord) -> Option<String> {
    let index = descriptor.index_of(name)?;
    let token = record.field_value(index).to_token()?;
    is_safe_token(&token).then_some(token)
}
