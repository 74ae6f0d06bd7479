//! CRUD statement builder.
//!
//! [`CrudBuilder`] turns records into parameterized statements for one entity
//! type. The entity supplies the table template and the columns; filter records
//! supply the conditions, paging and ordering.
//!
//! ## Design
//!
//! - Every operation has a fragment form (`*_and_args`) that appends to a caller
//!   owned [`ArgList`], and an envelope form returning a [`SqlEnvelope`].
//! - Placeholders are `?`; arguments are appended in marker order.
//! - A fragment form that fails leaves the caller's [`ArgList`] untouched.
//! - An empty filter matches everything: no `WHERE` keyword is written.
//! - `DELETE` only takes `LIMIT` from the page size; `SELECT` adds `OFFSET`.
//!
//! ```ignore
//! use qforge::{CrudBuilder, PageQuery};
//!
//! let builder = CrudBuilder::<User>::new();
//! let query = UserQuery { username: Some("test".into()), ..Default::default() };
//! let select = builder.build_select(&query)?;
//! assert_eq!(select.sql(), "SELECT * FROM user WHERE username = ?");
//! ```

mod read;
mod write;


use crate::args::ArgList;
use crate::config::GlobalConfiguration;
use crate::descriptor::generator::{RenderContext, where_conditions};
use crate::descriptor::{RecordDescriptor, Registry};
use crate::envelope::SqlEnvelope;
use crate::error::{OrmError, OrmResult};
use crate::record::{AnyRecord, PageQuery, Record};
use crate::table;
use regex::Regex;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

/// Statement builder for the entity type `E`.
pub struct CrudBuilder<E> {
    registry: Arc<Registry>,
    config: Option<GlobalConfiguration>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Record> CrudBuilder<E> {
    /// Builder backed by the process-wide registry and configuration.
    pub fn new() -> Self {
        Self {
            registry: Registry::global(),
            config: None,
            _entity: PhantomData,
        }
    }

    /// Use a private registry instead of the process-wide one.
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    /// Pin a configuration instead of reading the global one on every call.
    pub fn with_config(mut self, config: GlobalConfiguration) -> Self {
        self.config = Some(config);
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    fn config(&self) -> GlobalConfiguration {
        match &self.config {
            Some(config) => config.clone(),
            None => GlobalConfiguration::global(),
        }
    }

    fn descriptor(&self) -> OrmResult<Arc<RecordDescriptor>> {
        self.registry.resolve::<E>()
    }

    /// Render the entity's table template with values read from `record`.
    fn table_name(&self, entity: &RecordDescriptor, record: &dyn AnyRecord) -> OrmResult<String> {
        let Some(template) = entity.table() else {
            return Err(OrmError::metadata(entity.name(), "no table declared"));
        };
        let source = record.resolve_descriptor(&self.registry)?;
        Ok(table::render(template, &source, record))
    }

    /// ` WHERE a AND b`, or nothing for an empty filter.
    fn where_clause(
        &self,
        entity: &RecordDescriptor,
        config: &GlobalConfiguration,
        filter: &dyn AnyRecord,
        args: &mut ArgList,
    ) -> OrmResult<String> {
        let ctx = RenderContext {
            registry: &self.registry,
            config,
        };
        let conditions = where_conditions(ctx, filter, entity.table_placeholders(), args)?;
        if conditions.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!(" WHERE {}", conditions.join(" AND ")))
        }
    }

    fn envelope(
        &self,
        build: impl FnOnce(&mut ArgList) -> OrmResult<String>,
    ) -> OrmResult<SqlEnvelope> {
        let mut args = ArgList::new();
        let sql = build(&mut args)?;
        Ok(SqlEnvelope::new(sql, args))
    }
}

impl<E: Record> Default for CrudBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for CrudBuilder<E> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            config: self.config.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> fmt::Debug for CrudBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudBuilder")
            .field("entity", &std::any::type_name::<E>())
            .field("config", &self.config)
            .finish()
    }
}

/// Run `build` on a scratch list; `args` only grows when it succeeds.
fn staged(
    args: &mut ArgList,
    build: impl FnOnce(&mut ArgList) -> OrmResult<String>,
) -> OrmResult<String> {
    let mut local = ArgList::new();
    let sql = build(&mut local)?;
    args.extend(local);
    Ok(sql)
}

fn sort_item_regex() -> &'static Regex {
    static SORT_ITEM: OnceLock<Regex> = OnceLock::new();
    SORT_ITEM.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)?)(?:,\s*((?i:asc|desc)))?$")
            .expect("invalid built-in sort regex")
    })
}

/// ` ORDER BY ...` from a `col[,asc|desc];...` sort string.
pub(crate) fn order_by(sort: &str, config: &GlobalConfiguration) -> OrmResult<String> {
    let mut items = Vec::new();
    for item in sort.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let Some(caps) = sort_item_regex().captures(item) else {
            return Err(OrmError::validation(format!("invalid sort item '{item}'")));
        };
        let column = config.column_name(&caps[1]);
        match caps.get(2) {
            Some(direction) => {
                items.push(format!("{column} {}", direction.as_str().to_ascii_uppercase()))
            }
            None => items.push(column.into_owned()),
        }
    }
    if items.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!(" ORDER BY {}", items.join(", ")))
    }
}

/// ` LIMIT n OFFSET m` when a page size is set.
pub(crate) fn limit_offset(page: &PageQuery) -> String {
    match page.page_size {
        Some(size) => format!(" LIMIT {size} OFFSET {}", page.offset()),
        None => String::new(),
    }
}
