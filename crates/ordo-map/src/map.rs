//! Sorted map - binary search over an ordered entry store

use ordo_core::{Comparator, Value};
use tracing::{debug, trace, warn};

use crate::{EntryStore, MapError, MapResult, VecStore};

/// Map keyed by [`Value`] in ascending comparator order
///
/// Stateless logic over the store: every operation is a run of store reads
/// followed by at most one store mutation. Keys in the store are kept
/// strictly ascending, so no two keys are equal.
#[derive(Clone, Debug)]
pub struct SortedMap<S> {
    store: S,
    comparator: Comparator,
}

impl<V> SortedMap<VecStore<V>> {
    /// Empty map over an in-memory store
    pub fn new() -> Self {
        SortedMap {
            store: VecStore::new(),
            comparator: Comparator::new(),
        }
    }

    /// Build from unordered entries; for repeated keys the last value wins
    pub fn from_entries<I>(entries: I) -> MapResult<Self>
    where
        I: IntoIterator<Item = (Value, V)>,
    {
        let mut map = SortedMap::new();
        for (key, value) in entries {
            map.set(key, value)?;
        }
        Ok(map)
    }
}

impl<V> Default for SortedMap<VecStore<V>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EntryStore> SortedMap<S> {
    /// Wrap an existing store, which must already be strictly ascending
    pub fn from_store(store: S) -> MapResult<Self> {
        SortedMap::with_comparator(store, Comparator::new())
    }

    /// Wrap an existing store ordered by `comparator`
    pub fn with_comparator(store: S, comparator: Comparator) -> MapResult<Self> {
        if !comparator.config().is_exact() {
            warn!(
                tolerance = comparator.config().tolerance,
                "approximate comparator used to order map keys"
            );
        }

        for index in 1..store.len() {
            let (prev, _) = store.entry_at(index - 1);
            let (next, _) = store.entry_at(index);
            if !comparator.less_than(prev, next)? {
                return Err(MapError::UnsortedStore { index });
            }
        }

        Ok(SortedMap { store, comparator })
    }

    #[inline]
    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Find `key`, returning its index or the index it would be inserted at
    ///
    /// Narrows the open interval between the last index known to hold a
    /// smaller key and the first index known to hold a key not smaller.
    /// At most `O(log n)` comparator calls.
    pub fn search(&self, key: &Value) -> MapResult<(usize, bool)> {
        // lo is one past the last smaller key, hi the first key not smaller
        let (mut lo, mut hi) = (0, self.store.len());
        while lo < hi {
            let mid = (lo + hi - 1) / 2;
            let (probe, _) = self.store.entry_at(mid);
            if self.comparator.less_than(probe, key)? {
                lo = mid + 1;
            } else if self.comparator.less_than(key, probe)? {
                hi = mid;
            } else {
                return Ok((mid, true));
            }
        }
        Ok((hi, false))
    }

    pub fn contains_key(&self, key: &Value) -> MapResult<bool> {
        Ok(self.search(key)?.1)
    }

    /// Value stored under `key`
    pub fn get(&self, key: &Value) -> MapResult<&S::Item> {
        match self.search(key)? {
            (index, true) => Ok(self.store.entry_at(index).1),
            (index, false) => {
                debug!(index, "lookup missed");
                Err(MapError::key_not_found(key))
            }
        }
    }

    pub fn get_mut(&mut self, key: &Value) -> MapResult<&mut S::Item> {
        match self.search(key)? {
            (index, true) => Ok(self.store.value_at_mut(index)),
            (_, false) => Err(MapError::key_not_found(key)),
        }
    }

    /// Value stored under `key`, or `default` when absent
    pub fn get_or_default<'a>(
        &'a self,
        key: &Value,
        default: &'a S::Item,
    ) -> MapResult<&'a S::Item> {
        match self.search(key)? {
            (index, true) => Ok(self.store.entry_at(index).1),
            (_, false) => Ok(default),
        }
    }

    /// Insert or update, returning the replaced value
    pub fn set(&mut self, key: Value, value: S::Item) -> MapResult<Option<S::Item>> {
        match self.search(&key)? {
            (index, true) => {
                trace!(index, "updating entry");
                Ok(Some(self.store.set_value_at(index, value)))
            }
            (index, false) => {
                trace!(index, len = self.store.len(), "inserting entry");
                self.store.insert_at(index, key, value);
                Ok(None)
            }
        }
    }

    /// Value under `key`, inserting `default` first when absent
    pub fn set_default(&mut self, key: Value, default: S::Item) -> MapResult<&mut S::Item> {
        let index = match self.search(&key)? {
            (index, true) => index,
            (index, false) => {
                trace!(index, len = self.store.len(), "inserting default entry");
                self.store.insert_at(index, key, default);
                index
            }
        };
        Ok(self.store.value_at_mut(index))
    }

    /// Remove `key`, returning its value
    pub fn delete(&mut self, key: &Value) -> MapResult<S::Item> {
        match self.search(key)? {
            (index, true) => {
                trace!(index, "deleting entry");
                Ok(self.store.delete_at(index).1)
            }
            (_, false) => Err(MapError::key_not_found(key)),
        }
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &S::Item)> + '_ {
        (0..self.store.len()).map(move |i| self.store.entry_at(i))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &S::Item> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Entry with the least key
    pub fn first(&self) -> Option<(&Value, &S::Item)> {
        (!self.is_empty()).then(|| self.store.entry_at(0))
    }

    /// Entry with the greatest key
    pub fn last(&self) -> Option<(&Value, &S::Item)> {
        let len = self.store.len();
        (len > 0).then(|| self.store.entry_at(len - 1))
    }
}
