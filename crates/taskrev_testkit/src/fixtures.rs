//! Item and store fixtures.

use std::path::Path;
use taskrev_model::{now_millis, Priority, TodoItem};
use taskrev_store::{FileStore, MemoryStore};
use tempfile::TempDir;

/// Creates a standard-priority item with the given text, stamped now.
#[must_use]
pub fn sample_item(text: &str) -> TodoItem {
    TodoItem::new(text, Priority::Standard, now_millis())
}

/// Creates `n` numbered items.
#[must_use]
pub fn sample_items(n: usize) -> Vec<TodoItem> {
    (0..n).map(|i| sample_item(&format!("task {i}"))).collect()
}

/// Creates an empty in-memory store.
#[must_use]
pub fn memory_store() -> MemoryStore {
    MemoryStore::new()
}

/// Runs a test with a file store in a temporary directory.
///
/// The directory outlives the closure, so reopening the path inside
/// the closure is fine.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(FileStore, &Path) -> R,
{
    let dir = TempDir::new().expect("failed to create temp directory");
    let path = dir.path().join("todos.json");
    let store = FileStore::open(&path).expect("failed to open file store");
    f(store, &path)
}
