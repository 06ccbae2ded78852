//! Backing store contract
//!
//! A sorted map keeps its entries in an external store: an ordered,
//! randomly indexable sequence of key/value entries. The map decides where
//! entries go; the store only has to keep them where it is told. Positional
//! insert and delete may cost more than O(1) and that cost is the store's.

use ordo_core::Value;

/// Ordered, randomly indexable key/value storage
pub trait EntryStore {
    type Item;

    /// Number of entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry at `index`; `index < len()`
    fn entry_at(&self, index: usize) -> (&Value, &Self::Item);

    fn value_at_mut(&mut self, index: usize) -> &mut Self::Item;

    /// Replace the value at `index`, returning the previous one
    fn set_value_at(&mut self, index: usize, value: Self::Item) -> Self::Item {
        std::mem::replace(self.value_at_mut(index), value)
    }

    /// Insert an entry so that it lands at `index`; `index <= len()`
    fn insert_at(&mut self, index: usize, key: Value, value: Self::Item);

    /// Remove and return the entry at `index`
    fn delete_at(&mut self, index: usize) -> (Value, Self::Item);
}

/// In-memory store backed by a `Vec`
#[derive(Clone, Debug)]
pub struct VecStore<V> {
    entries: Vec<(Value, V)>,
}

impl<V> VecStore<V> {
    pub fn new() -> Self {
        VecStore {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        VecStore {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Entries in store order
    pub fn as_slice(&self) -> &[(Value, V)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(Value, V)> {
        self.entries
    }
}

impl<V> Default for VecStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> EntryStore for VecStore<V> {
    type Item = V;

    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn entry_at(&self, index: usize) -> (&Value, &V) {
        let (key, value) = &self.entries[index];
        (key, value)
    }

    #[inline]
    fn value_at_mut(&mut self, index: usize) -> &mut V {
        &mut self.entries[index].1
    }

    fn insert_at(&mut self, index: usize, key: Value, value: V) {
        self.entries.insert(index, (key, value));
    }

    fn delete_at(&mut self, index: usize) -> (Value, V) {
        self.entries.remove(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_store_positional_ops() {
        let mut store = VecStore::new();
        assert!(store.is_empty());

        store.insert_at(0, Value::Int(2), "two");
        store.insert_at(0, Value::Int(1), "one");
        store.insert_at(2, Value::Int(3), "three");
        assert_eq!(store.len(), 3);
        assert_eq!(*store.entry_at(1).1, "two");

        let old = store.set_value_at(1, "TWO");
        assert_eq!(old, "two");
        assert_eq!(*store.entry_at(1).1, "TWO");

        let (key, value) = store.delete_at(0);
        assert!(matches!(key, Value::Int(1)));
        assert_eq!(value, "one");
        assert_eq!(store.len(), 2);
    }
}
