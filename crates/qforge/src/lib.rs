//! # qforge
//!
//! Metadata-driven SQL generation for CRUD statements.
//!
//! ## Features
//!
//! - **Declarative filters**: field names pick the comparison (`score_lt`, `id_in`,
//!   `memo_is_null`), attributes add subqueries, nested subquery chains and
//!   literal conditions
//! - **Positional arguments**: every statement comes with its `?`-ordered argument list
//! - **Dynamic tables**: `t_dynamic_${user}_${project}` rendered from record values,
//!   failing closed on unsafe input
//! - **No execution**: statements are built, logged and handed back; running them is
//!   the caller's business
//! - **Write-behind cache**: cache-aside reads with asynchronous, bounded population
//!
//! ## Example
//!
//! ```ignore
//! use qforge::prelude::*;
//!
//! #[derive(Record, Default)]
//! #[orm(table = "user")]
//! struct User {
//!     #[orm(id)]
//!     id: Option<i64>,
//!     username: Option<String>,
//!     email: Option<String>,
//! }
//!
//! #[derive(Record, Default)]
//! struct UserQuery {
//!     username_like: Option<String>,
//!     id_in: Option<Vec<i64>>,
//!     #[orm(page)]
//!     page: PageQuery,
//! }
//!
//! let builder = CrudBuilder::<User>::new();
//! let query = UserQuery { username_like: Some("f0rb".into()), ..Default::default() };
//! let select = builder.build_select(&query)?;
//! assert_eq!(select.sql(), "SELECT * FROM user WHERE username LIKE ?");
//! ```

pub mod args;
pub mod builder;
pub mod cache;
pub mod config;
pub mod descriptor;
pub mod envelope;
pub mod error;
pub mod ident;
pub mod prelude;
pub mod record;
pub mod table;
pub mod value;

pub use args::ArgList;
pub use builder::CrudBuilder;
pub use cache::{Cache, CacheWrapper, FailSafeCache, MapCache, NoOpCache, WritePool, compute_with_cache};
pub use config::GlobalConfiguration;
pub use descriptor::{
    ClauseGenerator, FieldBuilder, FieldDescriptor, FieldRole, InnerFilter, NestedChain,
    NestedLevel, RecordDescriptor, RecordDescriptorBuilder, Registry, Subquery, SuffixOp,
    ValueShape,
};
pub use envelope::SqlEnvelope;
pub use error::{CacheError, OrmError, OrmResult};
pub use record::{AnyRecord, PageQuery, Record};
pub use value::{FieldValue, ToValue, Value};

#[cfg(feature = "derive")]
pub use qforge_derive::Record;
