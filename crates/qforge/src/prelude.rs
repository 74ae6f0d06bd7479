//! Convenient imports for typical `qforge` usage.
//!
//! ```ignore
//! use qforge::prelude::*;
//! ```

pub use crate::{
    ArgList, CrudBuilder, FieldValue, GlobalConfiguration, OrmError, OrmResult, PageQuery, Record,
    SqlEnvelope, Value,
};

pub use crate::{CacheWrapper, compute_with_cache};
