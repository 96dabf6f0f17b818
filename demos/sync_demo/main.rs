//! Taskrev Sync Demo
//!
//! Demonstrates a full client lifecycle against an in-process backend:
//! - First-run adoption of the remote collection
//! - Pushing local edits while revisions match
//! - Adopting a remote advance (last-remote-wins)
//! - A push conflict absorbed by re-fetching
//!
//! Run with: cargo run -p sync_demo

use std::sync::Arc;
use taskrev_engine::{SyncConfig, SyncEngine};
use taskrev_gateway::HttpGateway;
use taskrev_model::{format_epoch_millis, now_millis, Priority, TodoItem};
use taskrev_store::{LocalStore, MemoryStore};
use taskrev_testkit::loopback::LoopbackBackend;
use taskrev_testkit::remote_sim::RemoteSim;

fn print_store(store: &MemoryStore) {
    let revision = store
        .revision()
        .ok()
        .flatten()
        .map_or_else(|| "-".to_string(), |r| r.to_string());
    println!("  local collection (revision {revision}):");
    for item in store.stream_all().expect("store read") {
        let mark = if item.done { "x" } else { " " };
        let deadline = item
            .deadline
            .map_or_else(String::new, |d| format!(" (due {})", format_epoch_millis(d)));
        println!("    [{mark}] {:<8} {}{deadline}", item.priority.to_string(), item.text);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("Taskrev Sync Demo");
    println!("=================\n");

    // An in-process backend seeded with two tasks at revision 4.
    let sim = Arc::new(RemoteSim::new());
    let now = now_millis();
    sim.seed(
        vec![
            TodoItem::new("file expense report", Priority::High, now)
                .with_deadline(now + 86_400_000),
            TodoItem::new("book dentist appointment", Priority::Low, now),
        ],
        4,
    );

    let gateway = HttpGateway::new(
        "https://todo.example.com/api",
        LoopbackBackend::new(Arc::clone(&sim), "demo-token"),
    )
    .with_auth_token("demo-token");

    let store = Arc::new(MemoryStore::new());
    let engine = SyncEngine::new(SyncConfig::new(), gateway, Arc::clone(&store));

    // First sync: no local revision marker, adopt the backend.
    println!("[1] First sync (empty local store)");
    let result = engine.sync()?;
    println!("  -> {:?}", result.action);
    print_store(&store);

    // Local edits push while revisions match.
    println!("\n[2] Local edits, then sync");
    store.upsert(TodoItem::new("water the plants", Priority::Standard, now_millis()))?;
    if let Some(mut item) = store
        .get_all()?
        .into_iter()
        .find(|item| item.text == "book dentist appointment")
    {
        item.set_done(true, now_millis());
        store.upsert(item)?;
    }
    let result = engine.sync()?;
    println!("  -> {:?}", result.action);
    print_store(&store);

    // Another device edits the backend; last-remote-wins.
    println!("\n[3] Remote advance, then sync");
    sim.edit_remote(|items| {
        items.retain(|item| !item.done);
    });
    let result = engine.sync()?;
    println!("  -> {:?}", result.action);
    print_store(&store);

    // A push racing a server-side write: rejected once, then resolved.
    println!("\n[4] Push conflict absorbed by re-fetch");
    store.upsert(TodoItem::new("sharpen kitchen knives", Priority::Low, now_millis()))?;
    sim.fail_next_push(taskrev_gateway::GatewayError::Conflict { expected: sim.revision() });
    let result = engine.sync()?;
    println!("  -> {:?}", result.action);
    print_store(&store);

    let stats = engine.stats();
    println!("\n[#] Engine stats:");
    println!("  cycles:    {}", stats.cycles_completed);
    println!("  adopted:   {}", stats.items_adopted);
    println!("  pushed:    {}", stats.items_pushed);
    println!("  conflicts: {}", stats.conflicts);

    Ok(())
}
