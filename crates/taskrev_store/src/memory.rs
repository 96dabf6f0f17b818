//! In-memory store implementation.

use crate::error::StoreResult;
use crate::store::LocalStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use taskrev_model::{ItemId, TodoItem};

#[derive(Debug, Default, Clone)]
pub(crate) struct StoreState {
    pub(crate) items: BTreeMap<ItemId, TodoItem>,
    pub(crate) revision: Option<u64>,
    pub(crate) dirty: bool,
}

/// An in-memory item store.
///
/// Suitable for unit tests, integration tests and ephemeral collections
/// that don't need persistence.
///
/// # Thread Safety
///
/// The store is thread-safe: reads run concurrently, writes are
/// serialized by an internal lock.
///
/// # Example
///
/// ```rust
/// use taskrev_model::{Priority, TodoItem};
/// use taskrev_store::{LocalStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.upsert(TodoItem::new("buy milk", Priority::Standard, 0)).unwrap();
/// assert_eq!(store.get_all().unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    /// Creates a new empty store with an absent revision marker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with items and a revision,
    /// marked clean. Useful for tests.
    #[must_use]
    pub fn with_contents(items: Vec<TodoItem>, revision: u64) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.write();
            state.items = items.into_iter().map(|item| (item.id, item)).collect();
            state.revision = Some(revision);
        }
        store
    }
}

impl LocalStore for MemoryStore {
    fn get_all(&self) -> StoreResult<Vec<TodoItem>> {
        Ok(self.state.read().items.values().cloned().collect())
    }

    fn get(&self, id: ItemId) -> StoreResult<Option<TodoItem>> {
        Ok(self.state.read().items.get(&id).cloned())
    }

    fn upsert(&self, item: TodoItem) -> StoreResult<()> {
        let mut state = self.state.write();
        state.items.insert(item.id, item);
        state.dirty = true;
        Ok(())
    }

    fn delete(&self, id: ItemId) -> StoreResult<bool> {
        let mut state = self.state.write();
        let removed = state.items.remove(&id).is_some();
        if removed {
            state.dirty = true;
        }
        Ok(removed)
    }

    fn clear(&self) -> StoreResult<()> {
        let mut state = self.state.write();
        state.items.clear();
        state.dirty = true;
        Ok(())
    }

    fn revision(&self) -> StoreResult<Option<u64>> {
        Ok(self.state.read().revision)
    }

    fn set_revision(&self, revision: u64) -> StoreResult<()> {
        self.state.write().revision = Some(revision);
        Ok(())
    }

    fn replace_all(&self, items: &[TodoItem], revision: u64) -> StoreResult<()> {
        let mut state = self.state.write();
        state.items = items.iter().cloned().map(|item| (item.id, item)).collect();
        state.revision = Some(revision);
        state.dirty = false;
        Ok(())
    }

    fn has_pending_changes(&self) -> StoreResult<bool> {
        Ok(self.state.read().dirty)
    }

    fn mark_synced(&self, revision: u64) -> StoreResult<()> {
        let mut state = self.state.write();
        state.revision = Some(revision);
        state.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskrev_model::Priority;

    fn item(text: &str) -> TodoItem {
        TodoItem::new(text, Priority::Standard, 1_000)
    }

    #[test]
    fn new_store_is_empty_and_clean() {
        let store = MemoryStore::new();
        assert!(store.get_all().unwrap().is_empty());
        assert_eq!(store.revision().unwrap(), None);
        assert!(!store.has_pending_changes().unwrap());
    }

    #[test]
    fn upsert_inserts_then_replaces() {
        let store = MemoryStore::new();
        let mut a = item("draft email");
        store.upsert(a.clone()).unwrap();

        a.set_done(true, 2_000);
        store.upsert(a.clone()).unwrap();

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], a);
    }

    #[test]
    fn delete_absent_is_not_an_error() {
        let store = MemoryStore::new();
        assert!(!store.delete(taskrev_model::ItemId::new()).unwrap());
        assert!(!store.has_pending_changes().unwrap());
    }

    #[test]
    fn mutations_set_dirty_and_sync_clears_it() {
        let store = MemoryStore::new();
        store.upsert(item("a")).unwrap();
        assert!(store.has_pending_changes().unwrap());

        store.mark_synced(4).unwrap();
        assert!(!store.has_pending_changes().unwrap());
        assert_eq!(store.revision().unwrap(), Some(4));
    }

    #[test]
    fn replace_all_swaps_contents_revision_and_dirty() {
        let store = MemoryStore::new();
        store.upsert(item("local only")).unwrap();

        let remote = vec![item("b"), item("c")];
        store.replace_all(&remote, 7).unwrap();

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|i| i.text != "local only"));
        assert_eq!(store.revision().unwrap(), Some(7));
        assert!(!store.has_pending_changes().unwrap());
    }

    #[test]
    fn stream_is_restartable() {
        let store = MemoryStore::new();
        store.upsert(item("a")).unwrap();

        let first: Vec<_> = store.stream_all().unwrap().collect();
        store.upsert(item("b")).unwrap();
        let second: Vec<_> = store.stream_all().unwrap().collect();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn net_effect_of_mixed_sequence() {
        let store = MemoryStore::new();
        let a = item("a");
        let b = item("b");
        let c = item("c");

        store.upsert(a.clone()).unwrap();
        store.upsert(b.clone()).unwrap();
        store.delete(a.id).unwrap();
        store.upsert(c.clone()).unwrap();
        store.upsert(b.clone()).unwrap();

        let mut all = store.get_all().unwrap();
        all.sort_by(|x, y| x.text.cmp(&y.text));
        assert_eq!(all, {
            let mut expected = vec![b, c];
            expected.sort_by(|x, y| x.text.cmp(&y.text));
            expected
        });
    }
}
