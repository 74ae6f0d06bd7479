//! Record traits implemented by entity and query types.

use crate::descriptor::{RecordDescriptor, Registry};
use crate::error::OrmResult;
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A type the builders can read.
///
/// Usually implemented by `#[derive(Record)]`. Hand-written implementations
/// describe their fields once in [`Record::describe`] and return values by
/// declaration index.
///
/// # Example
/// ```ignore
/// use qforge::{FieldDescriptor, FieldValue, OrmResult, Record, RecordDescriptor, ValueShape};
///
/// struct UserQuery {
///     username_like: Option<String>,
/// }
///
/// impl Record for UserQuery {
///     fn describe() -> OrmResult<RecordDescriptor> {
///         RecordDescriptor::builder("UserQuery")
///             .field(FieldDescriptor::builder("username_like", ValueShape::Scalar))
///             .build()
///     }
///
///     fn value_at(&self, index: usize) -> FieldValue<'_> {
///         match index {
///             0 => FieldValue::opt(&self.username_like),
///             _ => FieldValue::Null,
///         }
///     }
/// }
/// ```
pub trait Record: Send + Sync + 'static {
    /// Build the descriptor. Called once per type by the [`Registry`].
    fn describe() -> OrmResult<RecordDescriptor>
    where
        Self: Sized;

    /// Current value of the field declared at `index`.
    fn value_at(&self, index: usize) -> FieldValue<'_>;

    /// Paging and ordering, for records used as filters.
    fn page(&self) -> Option<&PageQuery> {
        None
    }
}

/// Object-safe view of a [`Record`], used for nested filters.
pub trait AnyRecord: Send + Sync {
    fn resolve_descriptor(&self, registry: &Registry) -> OrmResult<Arc<RecordDescriptor>>;

    fn field_value(&self, index: usize) -> FieldValue<'_>;

    fn page_query(&self) -> Option<&PageQuery>;
}

impl<T: Record> AnyRecord for T {
    fn resolve_descriptor(&self, registry: &Registry) -> OrmResult<Arc<RecordDescriptor>> {
        registry.resolve::<T>()
    }

    fn field_value(&self, index: usize) -> FieldValue<'_> {
        self.value_at(index)
    }

    fn page_query(&self) -> Option<&PageQuery> {
        self.page()
    }
}

/// Paging and ordering requested by a filter.
///
/// `page_number` is 1-based. `sort` lists `column[,asc|desc]` entries separated
/// by `;`, e.g. `"id,desc;username"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page_number: Option<u64>,
    pub page_size: Option<u64>,
    pub sort: Option<String>,
}

impl PageQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_number(mut self, page_number: u64) -> Self {
        self.page_number = Some(page_number);
        self
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Row offset of the requested page (0 when no page size is set).
    pub fn offset(&self) -> u64 {
        match self.page_size {
            Some(size) => self.page_number.unwrap_or(1).max(1).saturating_sub(1).saturating_mul(size),
            None => 0,
        }
    }
}
