use crate::key::{KeyIndexMap, StoreKey};
use crate::Item;

/// Accumulated items in display order, a key index over them, and the render cursor.
///
/// Every key in `items` appears exactly once in `index` (mapped to its position) and
/// vice versa. `0 <= cursor <= items.len()`.
#[derive(Clone, Debug)]
pub struct ItemStore<K, R, E> {
    items: Vec<Item<K, R, E>>,
    index: KeyIndexMap<K>,
    cursor: usize,
}

impl<K: StoreKey, R, E> Default for ItemStore<K, R, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StoreKey, R, E> ItemStore<K, R, E> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: KeyIndexMap::new(),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of leading items already appended to the container.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Items loaded but not yet rendered.
    pub fn backlog(&self) -> usize {
        self.items.len() - self.cursor
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&Item<K, R, E>> {
        self.index.get(key).map(|&i| &self.items[i])
    }

    pub fn position(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn items(&self) -> &[Item<K, R, E>] {
        &self.items
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Item<K, R, E>> {
        self.items.iter()
    }

    /// Empties the store and resets the cursor, handing back the previous items.
    pub(crate) fn take_all(&mut self) -> Vec<Item<K, R, E>> {
        self.index.clear();
        self.cursor = 0;
        core::mem::take(&mut self.items)
    }

    /// Appends an item whose key is not yet present.
    pub(crate) fn push(&mut self, item: Item<K, R, E>) {
        debug_assert!(
            !self.index.contains_key(&item.key),
            "ItemStore: duplicate key pushed"
        );
        self.index.insert(item.key.clone(), self.items.len());
        self.items.push(item);
    }

    /// The not-yet-rendered tail, at most `max` items long.
    pub(crate) fn pending_mut(&mut self, max: usize) -> &mut [Item<K, R, E>] {
        let end = self.cursor.saturating_add(max).min(self.items.len());
        &mut self.items[self.cursor..end]
    }

    pub(crate) fn advance_cursor(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_add(n).min(self.items.len());
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.items.len(), self.index.len());
        for (i, item) in self.items.iter().enumerate() {
            assert_eq!(self.index.get(&item.key), Some(&i));
        }
        assert!(self.cursor <= self.items.len());
    }
}

impl<'a, K, R, E> IntoIterator for &'a ItemStore<K, R, E> {
    type Item = &'a Item<K, R, E>;
    type IntoIter = core::slice::Iter<'a, Item<K, R, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
