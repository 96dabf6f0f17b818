//! File-backed store implementation.

use crate::error::{StoreError, StoreResult};
use crate::memory::StoreState;
use crate::store::LocalStore;
use fs2::FileExt;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use taskrev_model::{ItemId, TodoItem};
use tempfile::NamedTempFile;

/// On-disk snapshot layout: the whole collection, the revision marker
/// and the dirty flag in one JSON document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    revision: Option<u64>,
    #[serde(default)]
    dirty: bool,
    #[serde(default)]
    items: Vec<TodoItem>,
}

/// A file-backed item store.
///
/// The collection is persisted as a single JSON snapshot. Every write
/// goes to a temporary file in the same directory followed by an atomic
/// rename, so a crash never leaves a partially-replaced collection. An
/// exclusive lock file prevents two processes from opening the same
/// store.
///
/// # Durability
///
/// The temporary file is synced before the rename; after a mutation
/// returns, the new snapshot is on disk.
///
/// # Thread Safety
///
/// The store is thread-safe: reads are served from an in-memory cache
/// and may run concurrently; writes are serialized and write-through.
///
/// # Example
///
/// ```no_run
/// use taskrev_store::{FileStore, LocalStore};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("todos.json")).unwrap();
/// for item in store.stream_all().unwrap() {
///     println!("{}", item.text);
/// }
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Held for the lifetime of the store; the lock releases on drop.
    _lock: File,
    state: RwLock<StoreState>,
}

impl FileStore {
    /// Opens or creates a store at the given path, creating parent
    /// directories if needed.
    ///
    /// A missing snapshot file is an empty store with an absent
    /// revision marker.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Locked`] if another process holds the
    /// store, [`StoreError::Corrupted`] if the snapshot is unreadable,
    /// or an I/O error.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let lock_path = path.with_extension("lock");
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?;
        lock.try_lock_exclusive().map_err(|_| StoreError::Locked)?;

        let snapshot = match fs::read(path) {
            Ok(bytes) => serde_json::from_slice::<Snapshot>(&bytes)
                .map_err(|e| StoreError::Corrupted(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Snapshot::default(),
            Err(e) => return Err(e.into()),
        };

        let state = StoreState {
            items: snapshot
                .items
                .into_iter()
                .map(|item| (item.id, item))
                .collect(),
            revision: snapshot.revision,
            dirty: snapshot.dirty,
        };

        Ok(Self {
            path: path.to_path_buf(),
            _lock: lock,
            state: RwLock::new(state),
        })
    }

    /// Returns the path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies a mutation and commits it to disk. The in-memory cache
    /// is updated only after the snapshot is durable, so a failed write
    /// leaves the previous contents intact.
    fn commit<F>(&self, mutate: F) -> StoreResult<()>
    where
        F: FnOnce(&mut StoreState),
    {
        let mut state = self.state.write();
        let mut next = state.clone();
        mutate(&mut next);
        self.persist(&next)?;
        *state = next;
        Ok(())
    }

    fn persist(&self, state: &StoreState) -> StoreResult<()> {
        let snapshot = Snapshot {
            revision: state.revision,
            dirty: state.dirty,
            items: state.items.values().cloned().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            items = snapshot.items.len(),
            revision = ?snapshot.revision,
            "persisted snapshot"
        );
        Ok(())
    }
}

impl LocalStore for FileStore {
    fn get_all(&self) -> StoreResult<Vec<TodoItem>> {
        Ok(self.state.read().items.values().cloned().collect())
    }

    fn get(&self, id: ItemId) -> StoreResult<Option<TodoItem>> {
        Ok(self.state.read().items.get(&id).cloned())
    }

    fn upsert(&self, item: TodoItem) -> StoreResult<()> {
        self.commit(|state| {
            state.items.insert(item.id, item);
            state.dirty = true;
        })
    }

    fn delete(&self, id: ItemId) -> StoreResult<bool> {
        if !self.state.read().items.contains_key(&id) {
            return Ok(false);
        }
        self.commit(|state| {
            state.items.remove(&id);
            state.dirty = true;
        })?;
        Ok(true)
    }

    fn clear(&self) -> StoreResult<()> {
        self.commit(|state| {
            state.items.clear();
            state.dirty = true;
        })
    }

    fn revision(&self) -> StoreResult<Option<u64>> {
        Ok(self.state.read().revision)
    }

    fn set_revision(&self, revision: u64) -> StoreResult<()> {
        self.commit(|state| {
            state.revision = Some(revision);
        })
    }

    fn replace_all(&self, items: &[TodoItem], revision: u64) -> StoreResult<()> {
        self.commit(|state| {
            state.items = items.iter().cloned().map(|item| (item.id, item)).collect();
            state.revision = Some(revision);
            state.dirty = false;
        })
    }

    fn has_pending_changes(&self) -> StoreResult<bool> {
        Ok(self.state.read().dirty)
    }

    fn mark_synced(&self, revision: u64) -> StoreResult<()> {
        self.commit(|state| {
            state.revision = Some(revision);
            state.dirty = false;
        })
    }
}
