//! # Taskrev Gateway
//!
//! Remote gateway for taskrev: the HTTP boundary between the local
//! collection and the backend.
//!
//! This crate provides:
//! - A minimal HTTP transport abstraction ([`HttpClient`]) that any
//!   real client library or platform HTTP stack can implement
//! - A composable request-interceptor pipeline, including the
//!   `Authorization: OAuth <token>` injection applied uniformly to
//!   every outbound request
//! - [`HttpGateway`], the [`RemoteGateway`] implementation speaking the
//!   JSON wire format with revision-based optimistic concurrency
//! - A scripted [`MockGateway`] for tests
//!
//! ## Failure taxonomy
//!
//! [`GatewayError`] distinguishes retryable transport failures
//! (`Network`, `Server`) from fatal ones (`Auth`, `Protocol`) and from
//! `Conflict`, which callers resolve by re-fetching and retrying.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod gateway;
mod http;
mod interceptor;
mod mock;

pub use error::{GatewayError, GatewayResult};
pub use gateway::{HttpGateway, RemoteGateway, REVISION_HEADER};
pub use http::{HttpClient, HttpRequest, HttpResponse, Method};
pub use interceptor::{AuthInterceptor, Interceptor, InterceptorChain};
pub use mock::MockGateway;
