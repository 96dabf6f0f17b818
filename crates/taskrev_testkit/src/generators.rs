//! Property-based test generators using proptest.
//!
//! Strategies produce values that maintain the model invariants, in
//! particular `changed_at >= created_at`.

use proptest::prelude::*;
use taskrev_model::{ItemId, Priority, TodoItem};

/// Strategy for generating item IDs.
pub fn item_id_strategy() -> impl Strategy<Value = ItemId> {
    prop::array::uniform16(any::<u8>()).prop_map(ItemId::from_bytes)
}

/// Strategy for generating every priority value.
pub fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::High),
        Just(Priority::Standard),
        Just(Priority::Low),
    ]
}

/// Strategy for generating item text (printable ASCII).
pub fn text_strategy() -> impl Strategy<Value = String> {
    "[ -~]{0,80}"
}

/// Strategy for generating valid items.
///
/// Timestamps stay in a realistic epoch-millisecond range and
/// `changed_at`, when present, never precedes `created_at`.
pub fn todo_item_strategy() -> impl Strategy<Value = TodoItem> {
    (
        item_id_strategy(),
        text_strategy(),
        priority_strategy(),
        prop::option::of(0i64..4_000_000_000_000),
        any::<bool>(),
        0i64..4_000_000_000_000,
        prop::option::of(0i64..86_400_000),
    )
        .prop_map(
            |(id, text, priority, deadline, done, created_at, change_delta)| TodoItem {
                id,
                text,
                priority,
                deadline,
                done,
                created_at,
                changed_at: change_delta.map(|delta| created_at + delta),
            },
        )
}

/// Strategy for generating a batch of items with distinct IDs.
pub fn item_batch_strategy(max_len: usize) -> impl Strategy<Value = Vec<TodoItem>> {
    prop::collection::vec(todo_item_strategy(), 0..=max_len).prop_map(|mut items| {
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items.dedup_by(|a, b| a.id == b.id);
        items
    })
}
