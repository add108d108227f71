//! The viewer's "saved" list.
//!
//! The original application read and wrote browser-local storage from
//! every card component; here the list is an injected store with one
//! in-memory implementation, consumed as a read-only overlay when
//! rendering listing output.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

pub trait SavedItemsStore: Send + Sync + 'static {
    fn is_saved(&self, id: i32) -> bool;
    /// Flips the saved state, returning the new state.
    fn toggle(&self, id: i32) -> bool;
    fn saved_ids(&self) -> Vec<i32>;
}

#[derive(Clone, Default)]
pub struct InMemorySavedItems {
    ids: Arc<Mutex<BTreeSet<i32>>>,
}

impl InMemorySavedItems {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SavedItemsStore for InMemorySavedItems {
    fn is_saved(&self, id: i32) -> bool {
        self.ids.lock().unwrap().contains(&id)
    }

    fn toggle(&self, id: i32) -> bool {
        let mut ids = self.ids.lock().unwrap();
        if ids.remove(&id) {
            false
        } else {
            ids.insert(id);
            true
        }
    }

    fn saved_ids(&self) -> Vec<i32> {
        self.ids.lock().unwrap().iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_saved_state() {
        let store = InMemorySavedItems::new();

        assert!(!store.is_saved(7));
        assert!(store.toggle(7));
        assert!(store.is_saved(7));
        assert!(!store.toggle(7));
        assert!(!store.is_saved(7));
    }

    #[test]
    fn saved_ids_lists_current_entries_in_order() {
        let store = InMemorySavedItems::new();
        store.toggle(5);
        store.toggle(1);
        store.toggle(3);
        store.toggle(5);

        assert_eq!(store.saved_ids(), vec![1, 3]);
    }

    #[test]
    fn clones_share_the_same_list() {
        let store = InMemorySavedItems::new();
        let other = store.clone();

        store.toggle(2);
        assert!(other.is_saved(2));
    }
}
