//! Derive macros for qforge
//!
//! Provides `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod common;
mod record;
mod sql_ident;

/// Derive the `Record` trait for a struct.
///
/// The same derive serves entities (rows written by `INSERT`/`UPDATE`) and
/// filter records (conditions, paging and ordering for reads).
///
/// # Example
///
/// ```ignore
/// use qforge::{PageQuery, Record};
///
/// #[derive(Record)]
/// #[orm(table = "t_dynamic_${user}_${project}")]
/// struct Dynamic {
///     #[orm(id)]
///     id: Option<i64>,
///     #[orm(transient)]
///     user: Option<String>,
///     #[orm(transient)]
///     project: Option<String>,
///     #[orm(column = "user_score")]
///     score: Option<i32>,
/// }
///
/// #[derive(Record)]
/// struct UserQuery {
///     username_like: Option<String>,
///     id_in: Option<Vec<i64>>,
///     #[orm(subquery(select = "user_id", from = "t_user_and_role"))]
///     role_id: Option<i64>,
///     #[orm(page)]
///     page: PageQuery,
/// }
/// ```
///
/// # Struct attributes
///
/// - `#[orm(table = "name")]` - Table name, `${field}` placeholders are read from the record
///
/// # Field attributes
///
/// - `#[orm(id)]` - Identifier column used by `*_by_id` and `UPDATE ... WHERE`
/// - `#[orm(transient)]` - Not a column and never a condition
/// - `#[orm(column = "name")]` - Column written by `INSERT`/`UPDATE`; conditions keep the field name
/// - `#[orm(page)]` - The `PageQuery` (or `Option<PageQuery>`) for paging and ordering
/// - `#[orm(filter)]` - An `Option<Q>` nested filter record
/// - `#[orm(alias = "u")]` - Qualify the column as `u.column`
/// - `#[orm(and = "...")]` - Fixed condition text, the value binds every `?`
/// - `#[orm(subquery(column, op, select, from, extra))]` - `column op (SELECT select FROM from ...)`
/// - `#[orm(nested(column, op, append_where, level(left, from, op, extra), ...))]` - Chained subqueries
#[proc_macro_derive(Record, attributes(orm))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
