//! Local store trait definition.

use crate::error::StoreResult;
use taskrev_model::{ItemId, TodoItem};

/// The local, authoritative copy of the item collection plus a single
/// revision marker.
///
/// The host application and the synchronizer share one store: UI-driven
/// edits call [`upsert`](LocalStore::upsert)/[`delete`](LocalStore::delete),
/// while the synchronizer alone reads and writes the revision marker and
/// uses [`replace_all`](LocalStore::replace_all) to adopt a remote
/// collection.
///
/// # Invariants
///
/// - `upsert` replaces every field of an existing item with the same ID
/// - `replace_all` is atomic: on failure the previous contents survive
/// - The dirty flag is set by user mutations and cleared only by
///   `replace_all` and `mark_synced`
/// - Implementations must be `Send + Sync`; reads may run concurrently,
///   writes are serialized
///
/// # Implementors
///
/// - [`crate::MemoryStore`] - for tests and ephemeral use
/// - [`crate::FileStore`] - for persistent storage
pub trait LocalStore: Send + Sync {
    /// Returns a snapshot of the current committed collection.
    ///
    /// Each call produces a fresh sequence reflecting every write that
    /// committed before it.
    ///
    /// # Errors
    ///
    /// Returns an error on underlying medium failure; safe to retry.
    fn get_all(&self) -> StoreResult<Vec<TodoItem>>;

    /// Returns a lazily-consumed, restartable stream over a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error on underlying medium failure; safe to retry.
    fn stream_all(&self) -> StoreResult<ItemStream> {
        Ok(ItemStream::new(self.get_all()?))
    }

    /// Looks up a single item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error on underlying medium failure; safe to retry.
    fn get(&self, id: ItemId) -> StoreResult<Option<TodoItem>>;

    /// Inserts the item, or replaces all fields if the ID is known.
    ///
    /// Marks the store dirty.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable.
    fn upsert(&self, item: TodoItem) -> StoreResult<()>;

    /// Removes an item by ID.
    ///
    /// Returns `Ok(false)` (not an error) when the ID is absent. Marks
    /// the store dirty when something was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable.
    fn delete(&self, id: ItemId) -> StoreResult<bool>;

    /// Removes all items. Marks the store dirty.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable.
    fn clear(&self) -> StoreResult<()>;

    /// Reads the revision marker. Absent on first run.
    ///
    /// # Errors
    ///
    /// Returns an error on underlying medium failure; safe to retry.
    fn revision(&self) -> StoreResult<Option<u64>>;

    /// Writes the revision marker.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable.
    fn set_revision(&self, revision: u64) -> StoreResult<()>;

    /// Atomically replaces the whole collection and the revision marker,
    /// clearing the dirty flag.
    ///
    /// Used when a sync cycle adopts the remote collection. A failure
    /// leaves the previous contents, revision and dirty flag intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the replacement cannot be committed.
    fn replace_all(&self, items: &[TodoItem], revision: u64) -> StoreResult<()>;

    /// Returns true if a user mutation committed since the last
    /// `replace_all` or `mark_synced`.
    ///
    /// # Errors
    ///
    /// Returns an error on underlying medium failure; safe to retry.
    fn has_pending_changes(&self) -> StoreResult<bool>;

    /// Records a successful push: sets the revision marker and clears
    /// the dirty flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable.
    fn mark_synced(&self, revision: u64) -> StoreResult<()>;
}

/// Owning iterator over a snapshot of store contents.
///
/// The stream is restartable: call
/// [`stream_all`](LocalStore::stream_all) again to observe writes that
/// committed after this snapshot was taken.
#[derive(Debug)]
pub struct ItemStream {
    inner: std::vec::IntoIter<TodoItem>,
}

impl ItemStream {
    pub(crate) fn new(items: Vec<TodoItem>) -> Self {
        Self {
            inner: items.into_iter(),
        }
    }
}

impl Iterator for ItemStream {
    type Item = TodoItem;

    fn next(&mut self) -> Option<TodoItem> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ItemStream {}
