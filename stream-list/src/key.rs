use std::collections::HashMap;

/// Identity of an item in the store.
///
/// Keys come from [`crate::Adapter::item_key`] and must be equal for logically identical
/// results, across pages and across loads.
pub trait StoreKey: core::hash::Hash + Eq + Clone {}
impl<K: core::hash::Hash + Eq + Clone> StoreKey for K {}

pub(crate) type KeyIndexMap<K> = HashMap<K, usize>;
