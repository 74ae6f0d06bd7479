//! Attribute parsing for the Record derive macro.
//!
//! Handles struct-level `#[orm(table = "...")]` and the field-level markers and
//! query metadata.

use crate::sql_ident::{parse_dotted_ident, parse_sql_ident};
use syn::punctuated::Punctuated;
use syn::{Attribute, Error, LitStr, Meta, Result, Token};

/// `#[orm(subquery(...))]`
pub(super) struct SubqueryAttr {
    pub column: String,
    pub op: Option<String>,
    pub select: String,
    pub from: String,
    pub extra: Option<String>,
}

/// One `level(...)` inside `#[orm(nested(...))]`
pub(super) struct LevelAttr {
    pub left: String,
    pub from: String,
    pub op: Option<String>,
    pub extra: Option<String>,
}

/// `#[orm(nested(...))]`
pub(super) struct NestedAttr {
    pub column: String,
    pub op: Option<String>,
    pub append_where: bool,
    pub levels: Vec<LevelAttr>,
}

/// Everything declared on one field.
#[derive(Default)]
pub(super) struct FieldAttr {
    pub id: bool,
    pub transient: bool,
    pub page: bool,
    pub filter: bool,
    pub column: Option<String>,
    pub alias: Option<String>,
    pub literal: Option<String>,
    pub subquery: Option<SubqueryAttr>,
    pub nested: Option<NestedAttr>,
}

/// Table template from `#[orm(table = "...")]`, if any.
pub(super) fn table_template(attrs: &[Attribute]) -> Result<Option<LitStr>> {
    let mut table = None;
    for meta in orm_metas(attrs)? {
        match meta {
            Meta::NameValue(nv) if nv.path.is_ident("table") => {
                table = Some(lit_str(&nv.value, "orm(table = \"...\")")?);
            }
            other => {
                return Err(Error::new_spanned(other, "unknown struct attribute; expected `table`"));
            }
        }
    }
    Ok(table)
}

pub(super) fn field_attr(attrs: &[Attribute]) -> Result<FieldAttr> {
    let mut out = FieldAttr::default();
    for meta in orm_metas(attrs)? {
        match &meta {
            Meta::Path(path) if path.is_ident("id") => out.id = true,
            Meta::Path(path) if path.is_ident("transient") => out.transient = true,
            Meta::Path(path) if path.is_ident("page") => out.page = true,
            Meta::Path(path) if path.is_ident("filter") => out.filter = true,
            Meta::NameValue(nv) if nv.path.is_ident("column") => {
                let lit = lit_str(&nv.value, "orm(column = \"...\")")?;
                out.column = Some(parse_sql_ident(&lit, "orm(column)")?);
            }
            Meta::NameValue(nv) if nv.path.is_ident("alias") => {
                let lit = lit_str(&nv.value, "orm(alias = \"...\")")?;
                out.alias = Some(parse_sql_ident(&lit, "orm(alias)")?);
            }
            Meta::NameValue(nv) if nv.path.is_ident("and") => {
                out.literal = Some(lit_str(&nv.value, "orm(and = \"...\")")?.value());
            }
            Meta::List(list) if list.path.is_ident("subquery") => {
                out.subquery = Some(subquery(list)?);
            }
            Meta::List(list) if list.path.is_ident("nested") => {
                out.nested = Some(nested(list)?);
            }
            other => {
                return Err(Error::new_spanned(
                    other,
                    "unknown field attribute; expected one of id, transient, page, filter, \
                     column, alias, and, subquery, nested",
                ));
            }
        }
    }

    if out.id && out.transient {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "a field cannot be both `id` and `transient`",
        ));
    }
    Ok(out)
}

fn orm_metas(attrs: &[Attribute]) -> Result<Vec<Meta>> {
    let mut metas = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let items = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        metas.extend(items);
    }
    Ok(metas)
}

fn lit_str(expr: &syn::Expr, what: &str) -> Result<LitStr> {
    if let syn::Expr::Lit(syn::ExprLit {
        lit: syn::Lit::Str(lit),
        ..
    }) = expr
    {
        return Ok(lit.clone());
    }
    Err(Error::new_spanned(expr, format!("{what} expects a string literal")))
}

fn lit_bool(expr: &syn::Expr, what: &str) -> Result<bool> {
    if let syn::Expr::Lit(syn::ExprLit {
        lit: syn::Lit::Bool(lit),
        ..
    }) = expr
    {
        return Ok(lit.value);
    }
    Err(Error::new_spanned(expr, format!("{what} expects true or false")))
}

fn subquery(list: &syn::MetaList) -> Result<SubqueryAttr> {
    let mut column = None;
    let mut op = None;
    let mut select = None;
    let mut from = None;
    let mut extra = None;

    for meta in list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)? {
        let Meta::NameValue(nv) = &meta else {
            return Err(Error::new_spanned(meta, "subquery(...) expects key = \"value\" pairs"));
        };
        let lit = lit_str(&nv.value, "subquery(...)")?;
        if nv.path.is_ident("column") {
            column = Some(parse_dotted_ident(&lit, "subquery column")?);
        } else if nv.path.is_ident("op") {
            op = Some(lit.value());
        } else if nv.path.is_ident("select") {
            select = Some(parse_dotted_ident(&lit, "subquery select")?);
        } else if nv.path.is_ident("from") {
            from = Some(parse_dotted_ident(&lit, "subquery from")?);
        } else if nv.path.is_ident("extra") {
            extra = Some(lit.value());
        } else {
            return Err(Error::new_spanned(
                &nv.path,
                "unknown subquery key; expected column, op, select, from, extra",
            ));
        }
    }

    let Some(select) = select else {
        return Err(Error::new_spanned(list, "subquery(...) requires `select`"));
    };
    let Some(from) = from else {
        return Err(Error::new_spanned(list, "subquery(...) requires `from`"));
    };
    Ok(SubqueryAttr {
        column: column.unwrap_or_else(|| "id".to_string()),
        op,
        select,
        from,
        extra,
    })
}

fn nested(list: &syn::MetaList) -> Result<NestedAttr> {
    let mut column = None;
    let mut op = None;
    let mut append_where = false;
    let mut levels = Vec::new();

    for meta in list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)? {
        match &meta {
            Meta::Path(path) if path.is_ident("append_where") => append_where = true,
            Meta::NameValue(nv) if nv.path.is_ident("append_where") => {
                append_where = lit_bool(&nv.value, "nested(append_where = ...)")?;
            }
            Meta::NameValue(nv) if nv.path.is_ident("column") => {
                let lit = lit_str(&nv.value, "nested(column = \"...\")")?;
                column = Some(parse_dotted_ident(&lit, "nested column")?);
            }
            Meta::NameValue(nv) if nv.path.is_ident("op") => {
                op = Some(lit_str(&nv.value, "nested(op = \"...\")")?.value());
            }
            Meta::List(level_list) if level_list.path.is_ident("level") => {
                levels.push(level(level_list)?);
            }
            other => {
                return Err(Error::new_spanned(
                    other,
                    "unknown nested key; expected column, op, append_where, level(...)",
                ));
            }
        }
    }

    if levels.is_empty() {
        return Err(Error::new_spanned(list, "nested(...) requires at least one level(...)"));
    }
    Ok(NestedAttr {
        column: column.unwrap_or_else(|| "id".to_string()),
        op,
        append_where,
        levels,
    })
}

fn level(list: &syn::MetaList) -> Result<LevelAttr> {
    let mut left = None;
    let mut from = None;
    let mut op = None;
    let mut extra = None;

    for meta in list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)? {
        let Meta::NameValue(nv) = &meta else {
            return Err(Error::new_spanned(meta, "level(...) expects key = \"value\" pairs"));
        };
        let lit = lit_str(&nv.value, "level(...)")?;
        if nv.path.is_ident("left") {
            left = Some(parse_dotted_ident(&lit, "level left")?);
        } else if nv.path.is_ident("from") {
            from = Some(parse_dotted_ident(&lit, "level from")?);
        } else if nv.path.is_ident("op") {
            op = Some(lit.value());
        } else if nv.path.is_ident("extra") {
            extra = Some(lit.value());
        } else {
            return Err(Error::new_spanned(
                &nv.path,
                "unknown level key; expected left, from, op, extra",
            ));
        }
    }

    let (Some(left), Some(from)) = (left, from) else {
        return Err(Error::new_spanned(list, "level(...) requires `left` and `from`"));
    };
    Ok(LevelAttr {
        left,
        from,
        op,
        extra,
    })
}
