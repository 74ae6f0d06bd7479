use super::{Cache, FailSafeCache, NoOpCache, compute_with_cache};
use crate::config::GlobalConfiguration;
use std::sync::Arc;

/// Holds the cache used by one service and runs reads through it.
///
/// Starts with [`NoOpCache`], so every read goes straight to the supplier
/// until a backend is set.
pub struct CacheWrapper<V> {
    cache: Arc<dyn Cache<V>>,
}

impl<V: Clone + Send + 'static> CacheWrapper<V> {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(NoOpCache::default()),
        }
    }

    /// Install `cache`, reading `ignore_cache_exception` from the global
    /// configuration.
    pub fn set_cache(&mut self, cache: Arc<dyn Cache<V>>) {
        self.set_cache_with(cache, &GlobalConfiguration::global());
    }

    /// Install `cache`, wrapping it in [`FailSafeCache`] when `config` asks
    /// for cache failures to be ignored.
    pub fn set_cache_with(&mut self, cache: Arc<dyn Cache<V>>, config: &GlobalConfiguration) {
        self.cache = if config.ignore_cache_exception && !cache.is_noop() {
            Arc::new(FailSafeCache::new(cache)) as Arc<dyn Cache<V>>
        } else {
            cache
        };
    }

    pub fn cache(&self) -> &Arc<dyn Cache<V>> {
        &self.cache
    }

    /// See [`compute_with_cache`].
    pub fn execute<F>(&self, key: Option<&str>, supplier: F) -> V
    where
        F: FnOnce() -> V,
    {
        compute_with_cache(&self.cache, key, supplier)
    }

    /// Drop one key. Failures are logged.
    pub fn evict(&self, key: &str) {
        if self.cache.is_noop() {
            return;
        }
        if let Err(e) = self.cache.evict(key) {
            tracing::error!(
                target: "qforge.cache",
                cache = self.cache.name(),
                key,
                error = %e,
                "cache evict failed"
            );
        }
    }

    /// Drop every entry. Failures are logged.
    pub fn clear(&self) {
        if self.cache.is_noop() {
            return;
        }
        if let Err(e) = self.cache.clear() {
            tracing::error!(
                target: "qforge.cache",
                cache = self.cache.name(),
                error = %e,
                "cache clear failed"
            );
        }
    }
}

impl<V: Clone + Send + 'static> Default for CacheWrapper<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for CacheWrapper<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheWrapper")
            .field("cache", &self.cache.name())
            .finish()
    }
}
