//! Wire payload types for collection and item exchanges.

use crate::item::TodoItem;
use serde::{Deserialize, Serialize};

/// Wire payload for a full-collection exchange.
///
/// `status` is an informational server code and is not used for control
/// flow. `revision` is the server's revision for the entire collection;
/// it acts as the optimistic-concurrency token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPayload {
    /// Informational server status, e.g. `"ok"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// The full ordered item collection.
    pub list: Vec<TodoItem>,
    /// The server's collection revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
}

impl ListPayload {
    /// Creates an `"ok"` payload with the given collection and revision.
    #[must_use]
    pub fn ok(list: Vec<TodoItem>, revision: u64) -> Self {
        Self {
            status: Some("ok".to_string()),
            list,
            revision: Some(revision),
        }
    }

    /// Encodes to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decodes from JSON bytes. Unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid payload.
    pub fn decode(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

/// Wire payload for a single-item exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    /// Informational server status, e.g. `"ok"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// The item.
    pub item: TodoItem,
    /// The server's collection revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
}

impl ItemPayload {
    /// Creates an `"ok"` payload with the given item and revision.
    #[must_use]
    pub fn ok(item: TodoItem, revision: u64) -> Self {
        Self {
            status: Some("ok".to_string()),
            item,
            revision: Some(revision),
        }
    }

    /// Encodes to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decodes from JSON bytes. Unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid payload.
    pub fn decode(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
