//! # Taskrev Model
//!
//! Item model and wire payload types for taskrev.
//!
//! This crate provides:
//! - [`TodoItem`] and its identifier and priority types
//! - Wire payload types ([`ListPayload`], [`ItemPayload`]) with JSON codecs
//! - Pure timestamp helpers (no process-wide formatter state)
//!
//! ## Wire Format
//!
//! Payloads are JSON objects. A collection exchange carries
//! `{ "status": ..., "list": [...], "revision": ... }`; a single-item
//! exchange carries `{ "status": ..., "item": {...}, "revision": ... }`.
//! Optional fields are omitted entirely when absent, and unknown fields
//! are ignored on decode.
//!
//! ## Key Invariants
//!
//! - An item's `id` is stable across synchronization
//! - `changed_at`, when present, is never earlier than `created_at`
//! - Encoding an item and decoding it back yields an equal item

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod item;
mod payload;
mod time;

pub use item::{ItemError, ItemId, Priority, TodoItem};
pub use payload::{ItemPayload, ListPayload};
pub use time::{format_epoch_millis, now_millis};
