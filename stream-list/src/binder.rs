use std::collections::{HashMap, HashSet};

use crate::key::StoreKey;
use crate::store::ItemStore;
use crate::Item;

/// Counts produced by one [`bind`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BindOutcome {
    pub added: usize,
    /// Duplicates within the page plus (when appending) keys already in the store.
    pub discarded: usize,
}

impl BindOutcome {
    pub fn added_any(&self) -> bool {
        self.added > 0
    }
}

/// Merges one page of results into `store`.
///
/// With `replace`, the store is emptied (cursor back to 0) before the page's items are
/// inserted; a recurring key keeps its previous item only when `reuse_results` is set.
/// Without `replace`, keys already in the store are discarded and never overwritten.
pub(crate) fn bind<K, R, E>(
    store: &mut ItemStore<K, R, E>,
    results: &[R],
    replace: bool,
    reuse_results: bool,
    mut key_of: impl FnMut(&R) -> K,
) -> BindOutcome
where
    K: StoreKey,
    R: Clone,
{
    let mut seen = HashSet::with_capacity(results.len());
    let mut accepted = Vec::with_capacity(results.len());
    let mut outcome = BindOutcome::default();

    let mut previous: HashMap<K, Item<K, R, E>> = if replace {
        store
            .take_all()
            .into_iter()
            .map(|item| (item.key.clone(), item))
            .collect()
    } else {
        HashMap::new()
    };

    for result in results {
        let key = key_of(result);
        if !seen.insert(key.clone()) {
            outcome.discarded += 1;
            continue;
        }

        if replace {
            match previous.remove(&key) {
                Some(item) if reuse_results => accepted.push(item),
                _ => accepted.push(Item::new(key, result.clone())),
            }
        } else if store.contains_key(&key) {
            outcome.discarded += 1;
        } else {
            accepted.push(Item::new(key, result.clone()));
        }
    }

    outcome.added = accepted.len();
    for item in accepted {
        store.push(item);
    }
    outcome
}
