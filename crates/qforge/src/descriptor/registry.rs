//! Per-type descriptor cache.

use super::RecordDescriptor;
use crate::error::OrmResult;
use crate::record::Record;
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Memoizes one [`RecordDescriptor`] per record type.
///
/// Descriptors are built outside the lock; when two threads race on the same
/// type the first insert wins and both get the same `Arc`. Build errors are
/// returned to the caller and not remembered.
#[derive(Debug, Default)]
pub struct Registry {
    descriptors: RwLock<HashMap<TypeId, Arc<RecordDescriptor>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by builders created with `new()`.
    pub fn global() -> Arc<Registry> {
        static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(Registry::new())).clone()
    }

    /// Descriptor for `T`, built on first use.
    pub fn resolve<T: Record>(&self) -> OrmResult<Arc<RecordDescriptor>> {
        let key = TypeId::of::<T>();
        if let Some(found) = self
            .descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(found.clone());
        }

        let built = Arc::new(T::describe()?);
        tracing::debug!(
            target: "qforge.registry",
            record = type_name::<T>(),
            fields = built.fields().len(),
            "descriptor built"
        );

        let mut map = self
            .descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(map.entry(key).or_insert(built).clone())
    }

    pub fn contains<T: Record>(&self) -> bool {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
