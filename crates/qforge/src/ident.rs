//! SQL identifier checks.
//!
//! Identifiers can't be bound as parameters, so every name that ends up in SQL
//! text (tables, columns, aliases, upsert targets, sort keys) passes through here.
//!
//! - Identifier parts must match `[A-Za-z_][A-Za-z0-9_]*`
//! - Dotted notation (`alias.column`, `schema.table`) is accepted by [`validate_ident`]
//! - Table-name substitutions use the stricter [`is_safe_token`]

use crate::error::{OrmError, OrmResult};

/// Whether `s` is a single identifier part: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_ident_part(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `s` may be spliced verbatim into a table name.
///
/// Letters, digits and underscore only; unlike identifier parts a leading digit
/// is fine since the token is glued onto a literal prefix.
pub fn is_safe_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate a possibly dotted identifier such as `users`, `u.name` or `db.users`.
pub fn validate_ident(s: &str) -> OrmResult<()> {
    if s.is_empty() {
        return Err(OrmError::validation("Identifier cannot be empty"));
    }
    for part in s.split('.') {
        if part.is_empty() {
            return Err(OrmError::validation(format!(
                "Empty identifier segment in '{s}'"
            )));
        }
        if !is_valid_ident_part(part) {
            return Err(OrmError::validation(format!(
                "Invalid identifier '{s}' (expected [A-Za-z_][A-Za-z0-9_]*)"
            )));
        }
    }
    Ok(())
}

/// Validate a table template: literal text must be identifier characters and
/// `${name}` placeholders must name identifiers.
pub fn validate_table_template(template: &str) -> OrmResult<()> {
    if template.is_empty() {
        return Err(OrmError::validation("Table name cannot be empty"));
    }
    let mut rest = template;
    let mut literal = String::new();
    while let Some(start) = rest.find("${") {
        literal.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(OrmError::validation(format!(
                "Unclosed placeholder in table template '{template}'"
            )));
        };
        let name = &after[..end];
        if !is_valid_ident_part(name) {
            return Err(OrmError::validation(format!(
                "Invalid placeholder '${{{name}}}' in table template '{template}'"
            )));
        }
        literal.push('x');
        rest = &after[end + 1..];
    }
    literal.push_str(rest);
    validate_ident(&literal).map_err(|_| {
        OrmError::validation(format!("Invalid table template '{template}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        assert!(validate_ident("users").is_ok());
        assert!(validate_ident("_tmp1").is_ok());
    }

    #[test]
    fn ident_dotted() {
        assert!(validate_ident("u.username").is_ok());
        assert!(validate_ident("db.t_user.id").is_ok());
    }

    #[test]
    fn ident_rejects_empty() {
        assert!(validate_ident("").is_err());
    }

    #[test]
    fn ident_rejects_start_digit() {
        assert!(validate_ident("1table").is_err());
    }

    #[test]
    fn ident_rejects_space_and_punctuation() {
        assert!(validate_ident("my table").is_err());
        assert!(validate_ident("users;drop").is_err());
    }

    #[test]
    fn ident_rejects_double_and_trailing_dot() {
        assert!(validate_ident("schema..table").is_err());
        assert!(validate_ident("schema.").is_err());
    }

    #[test]
    fn safe_token_rules() {
        assert!(is_safe_token("i18n_0001"));
        assert!(is_safe_token("0001"));
        assert!(!is_safe_token(""));
        assert!(!is_safe_token("; DROP TABLE x;"));
        assert!(!is_safe_token("a-b"));
    }

    #[test]
    fn table_templates() {
        assert!(validate_table_template("user").is_ok());
        assert!(validate_table_template("t_dynamic_${user}_${project}").is_ok());
        assert!(validate_table_template("${platform}_menu").is_ok());
        assert!(validate_table_template("t_${user").is_err());
        assert!(validate_table_template("t_${a-b}").is_err());
        assert!(validate_table_template("t user").is_err());
    }
}
