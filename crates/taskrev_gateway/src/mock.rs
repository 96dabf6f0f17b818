//! A scripted gateway for tests.

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::RemoteGateway;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use taskrev_model::{ItemPayload, ListPayload, TodoItem};

/// A mock gateway answering from scripted response queues.
///
/// Each operation pops the next queued result; an exhausted queue is a
/// `Protocol` error so a test that under-scripts fails loudly. Call
/// counters and recorded push arguments let tests assert on traffic.
#[derive(Default)]
pub struct MockGateway {
    fetch_responses: Mutex<VecDeque<GatewayResult<ListPayload>>>,
    push_responses: Mutex<VecDeque<GatewayResult<ListPayload>>>,
    push_item_responses: Mutex<VecDeque<GatewayResult<ItemPayload>>>,
    fetch_calls: AtomicU64,
    push_calls: AtomicU64,
    push_item_calls: AtomicU64,
    pushed: Mutex<Vec<(Vec<TodoItem>, u64)>>,
}

impl MockGateway {
    /// Creates a mock with empty queues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a `fetch_list` result.
    pub fn enqueue_fetch(&self, result: GatewayResult<ListPayload>) {
        self.fetch_responses.lock().push_back(result);
    }

    /// Queues a `push_list` result.
    pub fn enqueue_push(&self, result: GatewayResult<ListPayload>) {
        self.push_responses.lock().push_back(result);
    }

    /// Queues a `push_item` result.
    pub fn enqueue_push_item(&self, result: GatewayResult<ItemPayload>) {
        self.push_item_responses.lock().push_back(result);
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

    /// The arguments of every `push_list` call, in order.
    #[must_use]
    pub fn pushed(&self) -> Vec<(Vec<TodoItem>, u64)> {
        self.pushed.lock().clone()
    }
}

impl RemoteGateway for MockGateway {
    fn fetch_list(&self) -> GatewayResult<ListPayload> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch_responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Protocol("no mock fetch response queued".into())))
    }

    fn push_list(&self, items: &[TodoItem], expected_revision: u64) -> GatewayResult<ListPayload> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        self.pushed
            .lock()
            .push((items.to_vec(), expected_revision));
        self.push_responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Protocol("no mock push response queued".into())))
    }

    fn push_item(&self, _item: &TodoItem, _expected_revision: u64) -> GatewayResult<ItemPayload> {
        self.push_item_calls.fetch_add(1, Ordering::SeqCst);
        self.push_item_responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| {
                Err(GatewayError::Protocol(
                    "no mock push_item response queued".into(),
                ))
            })
    }
}
