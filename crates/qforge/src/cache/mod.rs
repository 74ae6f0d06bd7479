//! Write-behind cache wrapper.
//!
//! Reads are cache-aside: a hit returns the stored value, a miss runs the
//! supplier on the caller's thread and hands the `put` to a small background
//! pool. The pool never blocks the caller; when it is saturated the oldest
//! pending write is dropped.
//!
//! ```ignore
//! use qforge::cache::{CacheWrapper, MapCache};
//! use std::sync::Arc;
//!
//! let mut wrapper = CacheWrapper::new();
//! wrapper.set_cache(Arc::new(MapCache::new("users")));
//! let user = wrapper.execute(Some("user:1"), || load_user(1));
//! ```

mod backend;
mod pool;
mod wrapper;


pub use backend::{FailSafeCache, MapCache, NoOpCache};
pub use pool::WritePool;
pub use wrapper::CacheWrapper;

use crate::error::CacheError;
use std::sync::Arc;

/// A key-value cache backend.
///
/// Backends own lifecycle and eviction; the wrapper only reads, writes and
/// invalidates single keys.
pub trait Cache<V>: Send + Sync {
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> Result<Option<V>, CacheError>;

    fn put(&self, key: &str, value: V) -> Result<(), CacheError>;

    fn evict(&self, key: &str) -> Result<(), CacheError>;

    fn clear(&self) -> Result<(), CacheError>;

    /// Disabled backends are skipped entirely.
    fn is_noop(&self) -> bool {
        false
    }
}

/// Cache-aside read through `cache`.
///
/// A disabled cache or a `None` key calls `supplier` with no cache access. A
/// failing `get` is logged and treated as a miss. After a miss the value is
/// stored asynchronously on [`WritePool::global`].
pub fn compute_with_cache<V, F>(cache: &Arc<dyn Cache<V>>, key: Option<&str>, supplier: F) -> V
where
    V: Clone + Send + 'static,
    F: FnOnce() -> V,
{
    compute_on(WritePool::global(), cache, key, supplier)
}

pub(crate) fn compute_on<V, F>(
    pool: &WritePool,
    cache: &Arc<dyn Cache<V>>,
    key: Option<&str>,
    supplier: F,
) -> V
where
    V: Clone + Send + 'static,
    F: FnOnce() -> V,
{
    let Some(key) = key else {
        return supplier();
    };
    if cache.is_noop() {
        return supplier();
    }

    match cache.get(key) {
        Ok(Some(value)) => return value,
        Ok(None) => {}
        Err(e) => {
            tracing::error!(
                target: "qforge.cache",
                cache = cache.name(),
                key,
                error = %e,
                "cache get failed"
            );
        }
    }

    let value = supplier();
    let cache = Arc::clone(cache);
    let key = key.to_string();
    let stored = value.clone();
    pool.submit(move || {
        if let Err(e) = cache.put(&key, stored) {
            tracing::error!(
                target: "qforge.cache",
                cache = cache.name(),
                key = %key,
                error = %e,
                "cache put failed"
            );
        }
    });
    value
}
