//! Thread-safe handle to a sorted map
//!
//! Lookups share a read lock, mutations take the write lock. Each call is
//! one critical section, so a `set` never interleaves with another writer's
//! search.

use std::sync::Arc;

use ordo_core::Value;
use parking_lot::RwLock;

use crate::{EntryStore, MapResult, SortedMap, VecStore};

/// Cloneable, lock-protected [`SortedMap`]
#[derive(Debug)]
pub struct SharedSortedMap<S> {
    inner: Arc<RwLock<SortedMap<S>>>,
}

impl<S> Clone for SharedSortedMap<S> {
    fn clone(&self) -> Self {
        SharedSortedMap {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> SharedSortedMap<VecStore<V>> {
    pub fn new() -> Self {
        SharedSortedMap::from_map(SortedMap::new())
    }
}

impl<V> Default for SharedSortedMap<VecStore<V>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EntryStore> SharedSortedMap<S> {
    pub fn from_map(map: SortedMap<S>) -> Self {
        SharedSortedMap {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Run `f` under the read lock
    pub fn read<R>(&self, f: impl FnOnce(&SortedMap<S>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` under the write lock
    pub fn write<R>(&self, f: impl FnOnce(&mut SortedMap<S>) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn contains_key(&self, key: &Value) -> MapResult<bool> {
        self.inner.read().contains_key(key)
    }

    pub fn set(&self, key: Value, value: S::Item) -> MapResult<Option<S::Item>> {
        self.inner.write().set(key, value)
    }

    pub fn delete(&self, key: &Value) -> MapResult<S::Item> {
        self.inner.write().delete(key)
    }
}

impl<S> SharedSortedMap<S>
where
    S: EntryStore,
    S::Item: Clone,
{
    /// Copy of the value under `key`
    pub fn get(&self, key: &Value) -> MapResult<S::Item> {
        self.inner.read().get(key).cloned()
    }

    pub fn get_or_default(&self, key: &Value, default: S::Item) -> MapResult<S::Item> {
        let map = self.inner.read();
        let value = map.get_or_default(key, &default)?.clone();
        Ok(value)
    }

    /// Copy of the value under `key` after inserting `default` if absent
    pub fn set_default(&self, key: Value, default: S::Item) -> MapResult<S::Item> {
        self.inner.write().set_default(key, default).map(|v| v.clone())
    }

    /// Snapshot of all entries in key order
    pub fn entries(&self) -> Vec<(Value, S::Item)> {
        self.inner
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
