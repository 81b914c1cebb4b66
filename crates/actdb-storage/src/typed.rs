//! Typed access to the blob store with a bounded cache.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use actdb_core::{CanonicalBytes, ObjectKey};
use lru::LruCache;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;
use crate::object_store::ObjectStore;

pub(crate) fn capacity(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN)
}

/// A blob store for one value type, with an LRU cache in front.
///
/// The cache is owned by the store instance, not shared process-wide;
/// callers decide lifetimes by deciding who owns the `TypedStore`.
#[derive(Debug)]
pub struct TypedStore<T> {
    store: ObjectStore,
    cache: Mutex<LruCache<ObjectKey, Arc<T>>>,
}

impl<T> TypedStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// A typed store under `root/prefix/` caching up to `cache_capacity`
    /// loaded values.
    pub fn new(root: &Path, prefix: &str, cache_capacity: NonZeroUsize) -> Self {
        Self {
            store: ObjectStore::new(root, prefix),
            cache: Mutex::new(LruCache::new(cache_capacity)),
        }
    }

    /// Save a value, returning its content key.
    pub fn save(&self, value: &T) -> Result<ObjectKey, StorageError> {
        let bytes = CanonicalBytes::new(value)?;
        let key = self.store.save(&bytes)?;
        self.cache.lock().put(key.clone(), Arc::new(value.clone()));
        Ok(key)
    }

    /// Load the value stored under `key`, from cache when possible.
    pub fn load(&self, key: &ObjectKey) -> Result<Arc<T>, StorageError> {
        if let Some(cached) = self.cache.lock().get(key) {
            return Ok(Arc::clone(cached));
        }
        let bytes = self.store.load(key)?;
        let value: T = serde_json::from_slice(&bytes)?;
        let value = Arc::new(value);
        self.cache.lock().put(key.clone(), Arc::clone(&value));
        Ok(value)
    }
}
