use super::Cache;
use crate::error::CacheError;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// The disabled cache. Never stores anything.
#[derive(Debug, Clone)]
pub struct NoOpCache {
    name: String,
}

impl NoOpCache {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for NoOpCache {
    fn default() -> Self {
        Self::new("noop")
    }
}

impl<V> Cache<V> for NoOpCache {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, _key: &str) -> Result<Option<V>, CacheError> {
        Ok(None)
    }

    fn put(&self, _key: &str, _value: V) -> Result<(), CacheError> {
        Ok(())
    }

    fn evict(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }

    fn is_noop(&self) -> bool {
        true
    }
}

/// In-process cache backed by a `HashMap`. No expiry.
#[derive(Debug)]
pub struct MapCache<V> {
    name: String,
    entries: RwLock<HashMap<String, V>>,
}

impl<V> MapCache<V> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone + Send + Sync> Cache<V> for MapCache<V> {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Result<Option<V>, CacheError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: V) -> Result<(), CacheError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }

    fn evict(&self, key: &str) -> Result<(), CacheError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

/// Decorator that logs backend failures and reports success instead.
///
/// A failed `get` reads as a miss.
pub struct FailSafeCache<V> {
    inner: Arc<dyn Cache<V>>,
}

impl<V> FailSafeCache<V> {
    pub fn new(inner: Arc<dyn Cache<V>>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Arc<dyn Cache<V>> {
        &self.inner
    }

    fn report(&self, op: &str, key: Option<&str>, err: &CacheError) {
        tracing::warn!(
            target: "qforge.cache",
            cache = self.inner.name(),
            op,
            key = key.unwrap_or("-"),
            error = %err,
            "cache failure ignored"
        );
    }
}

impl<V> Cache<V> for FailSafeCache<V> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn get(&self, key: &str) -> Result<Option<V>, CacheError> {
        match self.inner.get(key) {
            Ok(found) => Ok(found),
            Err(e) => {
                self.report("get", Some(key), &e);
                Ok(None)
            }
        }
    }

    fn put(&self, key: &str, value: V) -> Result<(), CacheError> {
        if let Err(e) = self.inner.put(key, value) {
            self.report("put", Some(key), &e);
        }
        Ok(())
    }

    fn evict(&self, key: &str) -> Result<(), CacheError> {
        if let Err(e) = self.inner.evict(key) {
            self.report("evict", Some(key), &e);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        if let Err(e) = self.inner.clear() {
            self.report("clear", None, &e);
        }
        Ok(())
    }

    fn is_noop(&self) -> bool {
        self.inner.is_noop()
    }
}
