//! Property test: the JSON wire codec round-trips every valid item.

use proptest::prelude::*;
use taskrev_model::{ItemPayload, ListPayload, TodoItem};
use taskrev_testkit::generators::{item_batch_strategy, todo_item_strategy};

proptest! {
    #[test]
    fn item_roundtrip(item in todo_item_strategy()) {
        let bytes = serde_json::to_vec(&item).unwrap();
        let decoded: TodoItem = serde_json::from_slice(&bytes).unwrap();
        prop_assert_eq!(decoded, item);
    }

    #[test]
    fn list_payload_roundtrip(items in item_batch_strategy(16), revision in 0u64..1_000_000) {
        let payload = ListPayload::ok(items, revision);
        let decoded = ListPayload::decode(&payload.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, payload);
    }

    #[test]
    fn item_payload_roundtrip(item in todo_item_strategy(), revision in 0u64..1_000_000) {
        let payload = ItemPayload::ok(item, revision);
        let decoded = ItemPayload::decode(&payload.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, payload);
    }
}
