//! Integration tests: full sync cycles against the in-process backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use taskrev_engine::{
    sync_in_background, CycleAction, RetryConfig, SyncConfig, SyncEngine, SyncError,
};
use taskrev_gateway::{
    GatewayError, GatewayResult, HttpGateway, RemoteGateway,
};
use taskrev_model::{ItemPayload, ListPayload, TodoItem};
use taskrev_store::{LocalStore, MemoryStore};
use taskrev_testkit::fixtures::{sample_item, sample_items, with_file_store};
use taskrev_testkit::loopback::LoopbackBackend;
use taskrev_testkit::remote_sim::RemoteSim;

fn quick_config() -> SyncConfig {
    SyncConfig::new().with_retry(
        RetryConfig::new(3)
            .with_initial_delay(Duration::from_millis(1))
            .without_jitter(),
    )
}

fn sorted(mut items: Vec<TodoItem>) -> Vec<TodoItem> {
    items.sort_by(|a, b| a.id.cmp(&b.id));
    items
}

#[test]
fn full_lifecycle_against_the_simulator() {
    let sim = Arc::new(RemoteSim::new());
    sim.seed(sample_items(2), 5);

    let store = Arc::new(MemoryStore::new());
    let engine = SyncEngine::new(quick_config(), Arc::clone(&sim), Arc::clone(&store));

    // First run: no local marker, adopt the remote collection.
    let result = engine.sync().unwrap();
    assert_eq!(result.action, CycleAction::AdoptedRemote { items: 2 });
    assert_eq!(store.revision().unwrap(), Some(5));

    // A local edit pushes cleanly while revisions match.
    store.upsert(sample_item("added locally")).unwrap();
    let result = engine.sync().unwrap();
    assert_eq!(result.action, CycleAction::PushedLocal { items: 3 });
    assert_eq!(store.revision().unwrap(), Some(6));
    assert_eq!(sorted(sim.items()), sorted(store.get_all().unwrap()));

    // Another device edits the backend; the next cycle adopts it.
    sim.edit_remote(|items| items.retain(|item| item.text != "added locally"));
    let result = engine.sync().unwrap();
    assert_eq!(result.action, CycleAction::AdoptedRemote { items: 2 });
    assert_eq!(store.revision().unwrap(), Some(7));
    assert_eq!(sorted(store.get_all().unwrap()), sorted(sim.items()));

    // Settled: a further cycle moves nothing.
    let result = engine.sync().unwrap();
    assert_eq!(result.action, CycleAction::NoChange);
    assert_eq!(sim.push_calls(), 1);
}

#[test]
fn racing_push_conflict_is_absorbed_by_refetch() {
    let sim = Arc::new(RemoteSim::new());
    sim.seed(sample_items(1), 5);

    let store = Arc::new(MemoryStore::with_contents(sim.items(), 5));
    store.upsert(sample_item("pending")).unwrap();

    // Simulate a push racing a server-side write: the first push is
    // rejected, the re-fetch still agrees, the second push lands.
    sim.fail_next_push(GatewayError::Conflict { expected: 5 });

    let engine = SyncEngine::new(quick_config(), Arc::clone(&sim), Arc::clone(&store));
    let result = engine.sync().unwrap();

    assert_eq!(result.action, CycleAction::PushedLocal { items: 2 });
    assert_eq!(sim.fetch_calls(), 2);
    assert_eq!(sim.push_calls(), 2);
    assert_eq!(engine.stats().conflicts, 1);
    assert_eq!(sorted(sim.items()), sorted(store.get_all().unwrap()));
}

#[test]
fn syncs_through_the_http_gateway_into_a_file_store() {
    with_file_store(|store, _path| {
        let sim = Arc::new(RemoteSim::new());
        sim.seed(sample_items(2), 9);

        let gateway = HttpGateway::new(
            "https://todo.example.com/api",
            LoopbackBackend::new(Arc::clone(&sim), "secret"),
        )
        .with_auth_token("secret");

        let store = Arc::new(store);
        let engine = SyncEngine::new(quick_config(), gateway, Arc::clone(&store));

        let result = engine.sync().unwrap();
        assert_eq!(result.action, CycleAction::AdoptedRemote { items: 2 });
        assert_eq!(store.revision().unwrap(), Some(9));

        store.upsert(sample_item("offline edit")).unwrap();
        let result = engine.sync().unwrap();
        assert_eq!(result.action, CycleAction::PushedLocal { items: 3 });
        assert_eq!(sorted(sim.items()), sorted(store.get_all().unwrap()));
    });
}

#[test]
fn background_sync_delivers_through_the_callback() {
    let sim = Arc::new(RemoteSim::new());
    sim.seed(sample_items(1), 2);

    let store = Arc::new(MemoryStore::new());
    let engine = Arc::new(SyncEngine::new(
        quick_config(),
        Arc::clone(&sim),
        Arc::clone(&store),
    ));

    let (tx, rx) = mpsc::channel();
    let handle = sync_in_background(engine, move |outcome| {
        tx.send(outcome).unwrap();
    });

    let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    handle.join().unwrap();

    assert_eq!(
        outcome.unwrap().action,
        CycleAction::AdoptedRemote { items: 1 }
    );
    assert_eq!(store.revision().unwrap(), Some(2));
}

/// Delegates to a [`RemoteSim`] but parks the first fetch until
/// released, so tests can hold a cycle in flight deterministically.
struct GatedGateway {
    inner: Arc<RemoteSim>,
    gate_armed: AtomicBool,
    started_tx: mpsc::Sender<()>,
    release_rx: parking_lot::Mutex<mpsc::Receiver<()>>,
}

impl GatedGateway {
    fn new(inner: Arc<RemoteSim>) -> (Self, mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        (
            Self {
                inner,
                gate_armed: AtomicBool::new(true),
                started_tx,
                release_rx: parking_lot::Mutex::new(release_rx),
            },
            started_rx,
            release_tx,
        )
    }
}

impl RemoteGateway for GatedGateway {
    fn fetch_list(&self) -> GatewayResult<ListPayload> {
        if self.gate_armed.swap(false, Ordering::SeqCst) {
            self.started_tx.send(()).ok();
            self.release_rx.lock().recv().ok();
        }
        self.inner.fetch_list()
    }

    fn push_list(&self, items: &[TodoItem], expected_revision: u64) -> GatewayResult<ListPayload> {
        self.inner.push_list(items, expected_revision)
    }

    fn push_item(&self, item: &TodoItem, expected_revision: u64) -> GatewayResult<ItemPayload> {
        self.inner.push_item(item, expected_revision)
    }
}

#[test]
fn concurrent_sync_requests_coalesce_into_one_cycle() {
    let sim = Arc::new(RemoteSim::new());
    sim.seed(sample_items(1), 3);

    let (gateway, started_rx, release_tx) = GatedGateway::new(Arc::clone(&sim));
    let store = Arc::new(MemoryStore::new());
    let engine = Arc::new(SyncEngine::new(quick_config(), gateway, store));

    let leader = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.sync())
    };

    started_rx.recv().unwrap();

    let follower = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.sync())
    };

    // Let the follower reach the single-flight gate, then release.
    thread::sleep(Duration::from_millis(50));
    release_tx.send(()).unwrap();

    let leader_result = leader.join().unwrap().unwrap();
    let follower_result = follower.join().unwrap().unwrap();

    assert_eq!(sim.fetch_calls(), 1);
    assert!(!leader_result.joined);
    assert!(follower_result.joined);
    assert_eq!(follower_result.action, leader_result.action);
}

#[test]
fn cancellation_mid_cycle_leaves_the_store_intact() {
    let sim = Arc::new(RemoteSim::new());
    sim.seed(sample_items(2), 8);

    let (gateway, started_rx, release_tx) = GatedGateway::new(Arc::clone(&sim));
    let store = Arc::new(MemoryStore::with_contents(vec![sample_item("old")], 3));
    let before = store.get_all().unwrap();
    let engine = Arc::new(SyncEngine::new(
        SyncConfig::new().with_retry(RetryConfig::no_retry()),
        gateway,
        Arc::clone(&store),
    ));

    let worker = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.sync())
    };

    started_rx.recv().unwrap();
    engine.cancel();
    release_tx.send(()).unwrap();

    let outcome = worker.join().unwrap();
    assert_eq!(outcome.unwrap_err(), SyncError::Cancelled);

    // The fetched remote collection was never applied.
    assert_eq!(store.get_all().unwrap(), before);
    assert_eq!(store.revision().unwrap(), Some(3));
}
