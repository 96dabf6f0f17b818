//! In-process backend simulator.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use taskrev_gateway::{GatewayError, GatewayResult, RemoteGateway};
use taskrev_model::{ItemPayload, ListPayload, TodoItem};

#[derive(Debug, Default)]
struct SimState {
    items: Vec<TodoItem>,
    revision: u64,
    fail_fetch: VecDeque<GatewayError>,
    fail_push: VecDeque<GatewayError>,
}

/// An in-process stand-in for the remote backend, with real revision
/// semantics.
///
/// A fetch returns the current collection and revision. A push whose
/// expected revision is stale fails with [`GatewayError::Conflict`]; a
/// successful push applies the write and bumps the revision, exactly
/// like the backend's optimistic-concurrency contract.
///
/// Fault injection queues one-shot failures per operation, and
/// [`edit_remote`](Self::edit_remote) advances the revision behind the
/// client's back to provoke conflicts.
#[derive(Debug, Default)]
pub struct RemoteSim {
    state: Mutex<SimState>,
    fetch_calls: AtomicU64,
    push_calls: AtomicU64,
    push_item_calls: AtomicU64,
}

impl RemoteSim {
    /// Creates an empty backend at revision 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the backend state outright.
    pub fn seed(&self, items: Vec<TodoItem>, revision: u64) {
        let mut state = self.state.lock();
        state.items = items;
        state.revision = revision;
    }

    /// Applies a server-side edit, bumping the revision: the change a
    /// client only discovers by fetching.
    pub fn edit_remote<F>(&self, edit: F)
    where
        F: FnOnce(&mut Vec<TodoItem>),
    {
        let mut state = self.state.lock();
        edit(&mut state.items);
        state.revision += 1;
    }

    /// The backend's current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.state.lock().revision
    }

    /// A copy of the backend's current collection.
    #[must_use]
    pub fn items(&self) -> Vec<TodoItem> {
        self.state.lock().items.clone()
    }

    /// Queues a one-shot failure for the next `fetch_list`.
    pub fn fail_next_fetch(&self, error: GatewayError) {
        self.state.lock().fail_fetch.push_back(error);
    }

    /// Queues a one-shot failure for the next push.
    pub fn fail_next_push(&self, error: GatewayError) {
        self.state.lock().fail_push.push_back(error);
    }

    /// Number of `fetch_list` calls so far.
    #[must_use]
    pub fn fetch_calls(&self) -> u64 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of `push_list` calls so far.
    #[must_use]
    pub fn push_calls(&self) -> u64 {
        self.push_calls.load(Ordering::SeqCst)
    }

    /// Number of `push_item` calls so far.
    #[must_use]
    pub fn push_item_calls(&self) -> u64 {
        self.push_item_calls.load(Ordering::SeqCst)
    }
}

impl RemoteGateway for RemoteSim {
    fn fetch_list(&self) -> GatewayResult<ListPayload> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        if let Some(error) = state.fail_fetch.pop_front() {
            return Err(error);
        }
        Ok(ListPayload::ok(state.items.clone(), state.revision))
    }

    fn push_list(&self, items: &[TodoItem], expected_revision: u64) -> GatewayResult<ListPayload> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        if let Some(error) = state.fail_push.pop_front() {
            return Err(error);
        }
        if expected_revision != state.revision {
            return Err(GatewayError::Conflict {
                expected: expected_revision,
            });
        }
        state.items = items.to_vec();
        state.revision += 1;
        Ok(ListPayload::ok(state.items.clone(), state.revision))
    }

    fn push_item(&self, item: &TodoItem, expected_revision: u64) -> GatewayResult<ItemPayload> {
        self.push_item_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        if let Some(error) = state.fail_push.pop_front() {
            return Err(error);
        }
        if expected_revision != state.revision {
            return Err(GatewayError::Conflict {
                expected: expected_revision,
            });
        }
        match state.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => state.items.push(item.clone()),
        }
        state.revision += 1;
        Ok(ItemPayload::ok(item.clone(), state.revision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_item;

    #[test]
    fn fetch_reflects_seeded_state() {
        let sim = RemoteSim::new();
        sim.seed(vec![sample_item("a")], 5);

        let payload = sim.fetch_list().unwrap();
        assert_eq!(payload.revision, Some(5));
        assert_eq!(payload.list.len(), 1);
        assert_eq!(sim.fetch_calls(), 1);
    }

    #[test]
    fn stale_push_conflicts() {
        let sim = RemoteSim::new();
        sim.seed(vec![], 5);

        let result = sim.push_list(&[sample_item("a")], 4);
        assert_eq!(result.unwrap_err(), GatewayError::Conflict { expected: 4 });
        assert_eq!(sim.revision(), 5);
        assert!(sim.items().is_empty());
    }

    #[test]
    fn successful_push_applies_and_bumps_revision() {
        let sim = RemoteSim::new();
        sim.seed(vec![], 5);

        let pushed = vec![sample_item("a")];
        let payload = sim.push_list(&pushed, 5).unwrap();
        assert_eq!(payload.revision, Some(6));
        assert_eq!(sim.items(), pushed);
    }

    #[test]
    fn server_side_edit_bumps_revision() {
        let sim = RemoteSim::new();
        sim.seed(vec![], 5);
        sim.edit_remote(|items| items.push(sample_item("from another device")));

        assert_eq!(sim.revision(), 6);
        assert_eq!(sim.items().len(), 1);
    }

    #[test]
    fn injected_failures_fire_once() {
        let sim = RemoteSim::new();
        sim.fail_next_fetch(GatewayError::network("down"));

        assert!(sim.fetch_list().is_err());
        assert!(sim.fetch_list().is_ok());
    }

    #[test]
    fn push_item_upserts() {
        let sim = RemoteSim::new();
        let mut item = sample_item("a");
        sim.push_item(&item, 0).unwrap();

        item.set_done(true, 2_000);
        let payload = sim.push_item(&item, 1).unwrap();
        assert_eq!(payload.revision, Some(2));
        assert_eq!(sim.items().len(), 1);
        assert!(sim.items()[0].done);
    }
}
