//! To-do item model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a to-do item.
///
/// Item IDs are 128-bit UUIDs that are:
/// - Unique within a store
/// - Stable across synchronization
/// - Never reused
///
/// On the wire an ID is a hyphenated UUID string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Creates a new random item ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an item ID from raw bytes.
    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Creates an item ID from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the raw bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Converts to a UUID.
    #[must_use]
    pub const fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for ItemId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ItemId> for Uuid {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

/// Importance of a to-do item.
///
/// A closed enumeration; the wire labels are `"high"`, `"standard"`
/// and `"low"`. Unknown labels are a decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Must be dealt with first.
    High,
    /// Everyday priority.
    #[default]
    Standard,
    /// Can wait.
    Low,
}

impl Priority {
    /// Returns the wire label for this priority.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Standard => "standard",
            Priority::Low => "low",
        }
    }

    /// Parses a wire label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "high" => Some(Priority::High),
            "standard" => Some(Priority::Standard),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    /// All priority values, in display order.
    #[must_use]
    pub const fn all() -> [Priority; 3] {
        [Priority::High, Priority::Standard, Priority::Low]
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation failure for a to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// `changed_at` precedes `created_at`.
    #[error("changed_at {changed_at} precedes created_at {created_at}")]
    ChangedBeforeCreated {
        /// Creation timestamp (epoch millis).
        created_at: i64,
        /// Modification timestamp (epoch millis).
        changed_at: i64,
    },
}

/// A single task.
///
/// Items are created by user action, mutated in place through the
/// `set_*` methods (which stamp `changed_at`), and destroyed either by
/// explicit deletion or by a sync cycle that adopts a remote collection
/// no longer listing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Opaque unique identifier, stable across sync.
    pub id: ItemId,
    /// Free-form description.
    pub text: String,
    /// Importance.
    pub priority: Priority,
    /// Optional due timestamp (epoch millis). Omitted on the wire when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<i64>,
    /// Completion flag.
    pub done: bool,
    /// Creation timestamp (epoch millis). Immutable after creation.
    pub created_at: i64,
    /// Timestamp of the last modification (epoch millis), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<i64>,
}

impl TodoItem {
    /// Creates a new item with a random ID and no modifications yet.
    #[must_use]
    pub fn new(text: impl Into<String>, priority: Priority, created_at: i64) -> Self {
        Self {
            id: ItemId::new(),
            text: text.into(),
            priority,
            deadline: None,
            done: false,
            created_at,
            changed_at: None,
        }
    }

    /// Sets the deadline at creation time, builder style.
    #[must_use]
    pub fn with_deadline(mut self, deadline: i64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Replaces the text and stamps the modification time.
    pub fn set_text(&mut self, text: impl Into<String>, now: i64) {
        self.text = text.into();
        self.changed_at = Some(now);
    }

    /// Replaces the priority and stamps the modification time.
    pub fn set_priority(&mut self, priority: Priority, now: i64) {
        self.priority = priority;
        self.changed_at = Some(now);
    }

    /// Replaces the deadline and stamps the modification time.
    pub fn set_deadline(&mut self, deadline: Option<i64>, now: i64) {
        self.deadline = deadline;
        self.changed_at = Some(now);
    }

    /// Sets the completion flag and stamps the modification time.
    pub fn set_done(&mut self, done: bool, now: i64) {
        self.done = done;
        self.changed_at = Some(now);
    }

    /// Checks the timestamp invariant.
    ///
    /// # Errors
    ///
    /// Returns an error if `changed_at` is present and earlier than
    /// `created_at`.
    pub fn validate(&self) -> Result<(), ItemError> {
        if let Some(changed_at) = self.changed_at {
            if changed_at < self.created_at {
                return Err(ItemError::ChangedBeforeCreated {
                    created_at: self.created_at,
                    changed_at,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_is_unique() {
        let a = ItemId::new();
        let b = ItemId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn item_id_string_roundtrip() {
        let id = ItemId::new();
        let parsed: ItemId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn item_id_from_bytes_roundtrip() {
        let bytes = [7u8; 16];
        let id = ItemId::from_bytes(bytes);
        assert_eq!(*id.as_bytes(), bytes);
    }

    #[test]
    fn priority_labels() {
        for priority in Priority::all() {
            assert_eq!(Priority::from_label(priority.label()), Some(priority));
        }
        assert_eq!(Priority::from_label("urgent"), None);
    }

    #[test]
    fn priority_json_labels() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::from_str::<Priority>("\"standard\"").unwrap(),
            Priority::Standard
        );
        assert!(serde_json::from_str::<Priority>("\"urgent\"").is_err());
    }

    #[test]
    fn mutations_stamp_changed_at() {
        let mut item = TodoItem::new("write report", Priority::Standard, 1_000);
        assert_eq!(item.changed_at, None);

        item.set_done(true, 2_000);
        assert_eq!(item.changed_at, Some(2_000));
        assert!(item.done);

        item.set_text("write the report", 3_000);
        assert_eq!(item.changed_at, Some(3_000));
        assert_eq!(item.created_at, 1_000);
    }

    #[test]
    fn validate_rejects_backwards_timestamps() {
        let mut item = TodoItem::new("x", Priority::Low, 1_000);
        assert!(item.validate().is_ok());

        item.changed_at = Some(500);
        assert_eq!(
            item.validate(),
            Err(ItemError::ChangedBeforeCreated {
                created_at: 1_000,
                changed_at: 500,
            })
        );
    }

    #[test]
    fn optional_fields_omitted_from_json() {
        let item = TodoItem::new("x", Priority::Standard, 1_000);
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("deadline"));
        assert!(!json.contains("changed_at"));
    }
}
