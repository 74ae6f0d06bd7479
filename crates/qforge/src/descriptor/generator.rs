//! Clause generators: one compiled variant per field.

use super::suffix::SuffixOp;
use super::{NestedChain, Subquery, ValueShape};
use super::registry::Registry;
use crate::args::{ArgList, count_placeholders};
use crate::config::GlobalConfiguration;
use crate::error::{OrmError, OrmResult};
use crate::ident::validate_ident;
use crate::record::AnyRecord;
use crate::value::{FieldValue, Value};

/// Operators accepted between a column and a subquery.
const SUBQUERY_OPS: &[&str] = &["IN", "NOT IN", "=", "<>", "!=", "<", "<=", ">", ">="];

/// Everything a generator needs besides the field value.
#[derive(Clone, Copy)]
pub(crate) struct RenderContext<'a> {
    pub registry: &'a Registry,
    pub config: &'a GlobalConfiguration,
}

/// The filter placed inside a subquery or at the bottom of a nested chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InnerFilter {
    /// No filter; the field value only switches the clause on.
    Flag,
    /// ` WHERE <column> <suffix-op>` from the field name.
    Where { column: String, op: SuffixOp },
    /// ` WHERE <conditions of the nested filter record>`.
    Filter,
}

/// How a field turns into SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseGenerator {
    /// Empty fragment, no argument.
    Flag,
    /// The value is a nested filter record rendered as a parenthesized group.
    Filter,
    /// `<column> <suffix-op>`.
    Column { column: String, op: SuffixOp },
    /// `<alias>.<column> <suffix-op>`.
    Aliased { alias: String, column: String, op: SuffixOp },
    /// Fixed text; the value is bound once per `?`.
    Literal { template: String, placeholders: usize },
    /// `<column> <op> (SELECT <select> FROM <from>[ <extra>]<inner>)`.
    Subquery { spec: Subquery, inner: InnerFilter },
    /// A chain of correlated subqueries, one closing parenthesis per level.
    Nested { chain: NestedChain, inner: InnerFilter },
}

/// Field metadata as declared, before compilation.
pub(crate) struct FieldMeta<'a> {
    pub name: &'a str,
    pub shape: ValueShape,
    pub alias: Option<&'a str>,
    pub literal: Option<&'a str>,
    pub subquery: Option<&'a Subquery>,
    pub nested: Option<&'a NestedChain>,
}

impl ClauseGenerator {
    /// Pick and validate the variant for a field.
    ///
    /// Errors are plain messages; the descriptor builder attaches the record name.
    pub(crate) fn compile(meta: &FieldMeta<'_>) -> Result<Self, String> {
        let declared = [
            meta.alias.is_some(),
            meta.literal.is_some(),
            meta.subquery.is_some(),
            meta.nested.is_some(),
        ];
        if declared.iter().filter(|d| **d).count() > 1 {
            return Err(format!(
                "field '{}' declares more than one of alias, literal, subquery and nested",
                meta.name
            ));
        }

        let (column, op) = SuffixOp::parse(meta.name);
        check_shape(meta, op)?;

        let inner = match meta.shape {
            ValueShape::Flag if !op.is_null_check() => InnerFilter::Flag,
            ValueShape::Filter => InnerFilter::Filter,
            _ => InnerFilter::Where {
                column: column.to_string(),
                op,
            },
        };

        if let Some(alias) = meta.alias {
            validate_ident(alias).map_err(|e| format!("field '{}': {e}", meta.name))?;
            return Ok(ClauseGenerator::Aliased {
                alias: alias.to_string(),
                column: column.to_string(),
                op,
            });
        }

        if let Some(template) = meta.literal {
            return Ok(ClauseGenerator::Literal {
                template: template.to_string(),
                placeholders: count_placeholders(template),
            });
        }

        if let Some(spec) = meta.subquery {
            check_subquery(meta.name, spec)?;
            return Ok(ClauseGenerator::Subquery {
                spec: spec.clone(),
                inner,
            });
        }

        if let Some(chain) = meta.nested {
            check_nested(meta.name, chain)?;
            return Ok(ClauseGenerator::Nested {
                chain: chain.clone(),
                inner,
            });
        }

        Ok(match meta.shape {
            ValueShape::Flag if !op.is_null_check() => ClauseGenerator::Flag,
            ValueShape::Filter => ClauseGenerator::Filter,
            _ => ClauseGenerator::Column {
                column: column.to_string(),
                op,
            },
        })
    }

    /// Render the fragment for `value`, appending its arguments to `args`.
    ///
    /// `None` means the field is skipped: a null value (bare or wrapped as a
    /// scalar), a `false` flag, or an empty list.
    pub(crate) fn generate(
        &self,
        ctx: RenderContext<'_>,
        args: &mut ArgList,
        value: &FieldValue<'_>,
    ) -> OrmResult<Option<String>> {
        match value {
            FieldValue::Null | FieldValue::Scalar(Value::Null) | FieldValue::Flag(false) => {
                return Ok(None);
            }
            FieldValue::List(values) if values.is_empty() => return Ok(None),
            _ => {}
        }

        match self {
            ClauseGenerator::Flag => Ok(Some(String::new())),
            ClauseGenerator::Filter => {
                let FieldValue::Filter(filter) = value else {
                    return Err(OrmError::validation(format!(
                        "filter field expects a nested record, got {value:?}"
                    )));
                };
                let conditions = where_conditions(ctx, *filter, &[], args)?;
                if conditions.is_empty() {
                    return Ok(None);
                }
                Ok(Some(format!("({})", conditions.join(" AND "))))
            }
            ClauseGenerator::Column { column, op } => {
                op.render(&ctx.config.column_name(column), value, args)
            }
            ClauseGenerator::Aliased { alias, column, op } => {
                let qualified = format!("{alias}.{}", ctx.config.column_name(column));
                op.render(&qualified, value, args)
            }
            ClauseGenerator::Literal {
                template,
                placeholders,
            } => {
                bind_repeated(value, *placeholders, args)?;
                Ok(Some(template.clone()))
            }
            ClauseGenerator::Subquery { spec, inner } => {
                let mut sql = format!(
                    "{} {} (SELECT {} FROM {}",
                    spec.column, spec.op, spec.select, spec.from
                );
                if let Some(extra) = &spec.extra {
                    sql.push(' ');
                    sql.push_str(extra);
                    bind_repeated(value, count_placeholders(extra), args)?;
                }
                sql.push_str(&inner.render(ctx, value, args)?);
                sql.push(')');
                Ok(Some(sql))
            }
            ClauseGenerator::Nested { chain, inner } => {
                let mut sql = format!("{} {} (", chain.column, chain.op);
                let mut levels = chain.levels.iter();
                let mut link_op = chain.op.as_str();
                if let Some(first) = levels.next() {
                    push_level_select(&mut sql, first);
                    link_op = first.op.as_str();
                }
                for level in levels {
                    sql.push_str(" WHERE ");
                    sql.push_str(&level.left);
                    sql.push(' ');
                    sql.push_str(link_op);
                    sql.push_str(" (");
                    push_level_select(&mut sql, level);
                    link_op = level.op.as_str();
                }
                bind_repeated(value, count_placeholders(&sql), args)?;
                if chain.append_where {
                    sql.push_str(&inner.render(ctx, value, args)?);
                }
                sql.push_str(&")".repeat(chain.levels.len()));
                Ok(Some(sql))
            }
        }
    }
}

impl InnerFilter {
    fn render(
        &self,
        ctx: RenderContext<'_>,
        value: &FieldValue<'_>,
        args: &mut ArgList,
    ) -> OrmResult<String> {
        match self {
            InnerFilter::Flag => Ok(String::new()),
            InnerFilter::Where { column, op } => {
                Ok(op
                    .render(&ctx.config.column_name(column), value, args)?
                    .map(|clause| format!(" WHERE {clause}"))
                    .unwrap_or_default())
            }
            InnerFilter::Filter => {
                let FieldValue::Filter(filter) = value else {
                    return Err(OrmError::validation(format!(
                        "filter field expects a nested record, got {value:?}"
                    )));
                };
                let conditions = where_conditions(ctx, *filter, &[], args)?;
                if conditions.is_empty() {
                    Ok(String::new())
                } else {
                    Ok(format!(" WHERE {}", conditions.join(" AND ")))
                }
            }
        }
    }
}

/// Render every active condition of `record`, in declaration order.
///
/// Transient fields and the names in `skip` (table template placeholders)
/// never become conditions.
pub(crate) fn where_conditions(
    ctx: RenderContext<'_>,
    record: &dyn AnyRecord,
    skip: &[String],
    args: &mut ArgList,
) -> OrmResult<Vec<String>> {
    let descriptor = record.resolve_descriptor(ctx.registry)?;
    let mut conditions = Vec::new();
    for (index, field) in descriptor.fields().iter().enumerate() {
        if field.is_transient() || skip.iter().any(|s| s == field.name()) {
            continue;
        }
        let value = record.field_value(index);
        if let Some(fragment) = field.generator().generate(ctx, args, &value)? {
            if !fragment.is_empty() {
                conditions.push(fragment);
            }
        }
    }
    Ok(conditions)
}

fn push_level_select(sql: &mut String, level: &super::NestedLevel) {
    sql.push_str("SELECT ");
    sql.push_str(&level.left);
    sql.push_str(" FROM ");
    sql.push_str(&level.from);
    if let Some(extra) = &level.extra {
        sql.push(' ');
        sql.push_str(extra);
    }
}

/// Bind the field value once per placeholder found in fixed text.
fn bind_repeated(value: &FieldValue<'_>, times: usize, args: &mut ArgList) -> OrmResult<()> {
    if times == 0 {
        return Ok(());
    }
    let bound = match value {
        FieldValue::Scalar(v) => v.clone(),
        FieldValue::Flag(b) => Value::Bool(*b),
        other => {
            return Err(OrmError::validation(format!(
                "cannot bind {other:?} to a fixed-text placeholder"
            )));
        }
    };
    args.push_repeated(&bound, times);
    Ok(())
}

fn check_shape(meta: &FieldMeta<'_>, op: SuffixOp) -> Result<(), String> {
    let name = meta.name;
    match meta.shape {
        ValueShape::List if !op.is_list() => {
            Err(format!("list field '{name}' needs an In or NotIn suffix"))
        }
        ValueShape::List | ValueShape::Range if meta.literal.is_some() => {
            Err(format!("field '{name}' cannot bind a collection into a literal template"))
        }
        ValueShape::Range if op != SuffixOp::Between => {
            Err(format!("range field '{name}' needs a Between suffix"))
        }
        ValueShape::Scalar | ValueShape::Flag if op == SuffixOp::Between => {
            Err(format!("field '{name}' uses Between but is not a range"))
        }
        ValueShape::Filter if meta.alias.is_some() || meta.literal.is_some() => {
            Err(format!("filter field '{name}' cannot use an alias or literal template"))
        }
        shape if op.is_null_check() && shape != ValueShape::Flag => {
            Err(format!("field '{name}' tests for null and must be a bool flag"))
        }
        _ => Ok(()),
    }
}

fn check_op(name: &str, op: &str) -> Result<(), String> {
    if SUBQUERY_OPS.contains(&op) {
        Ok(())
    } else {
        Err(format!("field '{name}' uses unsupported subquery operator '{op}'"))
    }
}

fn check_subquery(name: &str, spec: &Subquery) -> Result<(), String> {
    for ident in [&spec.column, &spec.select, &spec.from] {
        validate_ident(ident).map_err(|e| format!("field '{name}': {e}"))?;
    }
    check_op(name, &spec.op)
}

fn check_nested(name: &str, chain: &NestedChain) -> Result<(), String> {
    if chain.levels.is_empty() {
        return Err(format!("field '{name}' declares an empty nested chain"));
    }
    validate_ident(&chain.column).map_err(|e| format!("field '{name}': {e}"))?;
    check_op(name, &chain.op)?;
    for level in &chain.levels {
        validate_ident(&level.left).map_err(|e| format!("field '{name}': {e}"))?;
        validate_ident(&level.from).map_err(|e| format!("field '{name}': {e}"))?;
        check_op(name, &level.op)?;
    }
    Ok(())
}
