//! # Taskrev Testkit
//!
//! Test utilities for taskrev.
//!
//! This crate provides:
//! - [`RemoteSim`]: an in-process backend with real revision semantics
//! - [`LoopbackBackend`]: an [`taskrev_gateway::HttpClient`] routing
//!   requests to a `RemoteSim` through the real wire format
//! - Property-based test generators using proptest
//! - Store and item fixtures
//!
//! ## Usage
//!
//! ```rust,ignore
//! use taskrev_testkit::prelude::*;
//!
//! let sim = Arc::new(RemoteSim::new());
//! sim.seed(sample_items(3), 5);
//! let engine = SyncEngine::new(SyncConfig::new(), Arc::clone(&sim), store);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod loopback;
pub mod remote_sim;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::loopback::*;
    pub use crate::remote_sim::*;
}

pub use fixtures::*;
pub use generators::*;
pub use loopback::*;
pub use remote_sim::*;
