//! # Taskrev Store
//!
//! Local item store for taskrev.
//!
//! This crate provides:
//! - The [`LocalStore`] trait: the narrow read/write/stream interface the
//!   synchronizer and the host application share
//! - [`MemoryStore`]: an in-memory implementation for tests and
//!   ephemeral use
//! - [`FileStore`]: a file-backed implementation with atomic
//!   replace-on-write and cross-process locking
//!
//! ## Key Invariants
//!
//! - Item IDs are unique within a store
//! - Exactly one revision marker exists per store; only the synchronizer
//!   writes it
//! - `replace_all` is all-or-nothing: a failure leaves the previous
//!   contents intact
//! - Reads may run concurrently; writes are serialized

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{ItemStream, LocalStore};
