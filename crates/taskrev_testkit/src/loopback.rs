//! Loopback HTTP backend.
//!
//! Routes gateway requests to a [`RemoteSim`] through the real wire
//! format, so `HttpGateway`, the interceptor pipeline and the JSON
//! codecs are exercised end-to-end without sockets.

use crate::remote_sim::RemoteSim;
use serde::Deserialize;
use std::sync::Arc;
use taskrev_gateway::{
    GatewayError, HttpClient, HttpRequest, HttpResponse, Method, RemoteGateway, REVISION_HEADER,
};
use taskrev_model::TodoItem;

#[derive(Deserialize)]
struct ListBody {
    list: Vec<TodoItem>,
}

#[derive(Deserialize)]
struct ItemBody {
    item: TodoItem,
}

/// An [`HttpClient`] that answers from an in-process [`RemoteSim`].
///
/// The backend checks the `Authorization: OAuth <token>` header (401
/// otherwise), parses the revision header on writes, and maps simulator
/// failures to the HTTP statuses the real backend would produce.
pub struct LoopbackBackend {
    sim: Arc<RemoteSim>,
    expected_auth: String,
}

impl LoopbackBackend {
    /// Creates a backend accepting the given token.
    #[must_use]
    pub fn new(sim: Arc<RemoteSim>, token: impl Into<String>) -> Self {
        Self {
            sim,
            expected_auth: format!("OAuth {}", token.into()),
        }
    }

    fn error_response(error: GatewayError) -> Result<HttpResponse, String> {
        match error {
            GatewayError::Conflict { .. } => Ok(HttpResponse::new(409, b"revision mismatch".to_vec())),
            GatewayError::Auth(message) => Ok(HttpResponse::new(401, message.into_bytes())),
            GatewayError::Server { status, message } => {
                Ok(HttpResponse::new(status, message.into_bytes()))
            }
            GatewayError::Protocol(message) => Ok(HttpResponse::new(400, message.into_bytes())),
            // A simulated network failure never produces a response.
            GatewayError::Network { message } => Err(message),
        }
    }

    fn json_response<T: serde::Serialize>(value: &T) -> Result<HttpResponse, String> {
        serde_json::to_vec(value)
            .map(|body| HttpResponse::new(200, body))
            .map_err(|e| e.to_string())
    }

    fn expected_revision(request: &HttpRequest) -> Result<u64, HttpResponse> {
        request
            .header(REVISION_HEADER)
            .and_then(|value| value.parse().ok())
            .ok_or_else(|| HttpResponse::new(400, b"missing or invalid revision header".to_vec()))
    }

    fn parse_body<T: serde::de::DeserializeOwned>(
        request: &HttpRequest,
    ) -> Result<T, HttpResponse> {
        request
            .body
            .as_deref()
            .and_then(|bytes| serde_json::from_slice(bytes).ok())
            .ok_or_else(|| HttpResponse::new(400, b"missing or invalid body".to_vec()))
    }
}

impl HttpClient for LoopbackBackend {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        if request.header("Authorization") != Some(self.expected_auth.as_str()) {
            return Ok(HttpResponse::new(401, b"missing or invalid credential".to_vec()));
        }

        let path = request
            .url
            .find("/list")
            .map(|i| &request.url[i..])
            .unwrap_or("");

        match (request.method, path) {
            (Method::Get, "/list") => match self.sim.fetch_list() {
                Ok(payload) => Self::json_response(&payload),
                Err(error) => Self::error_response(error),
            },
            (Method::Patch, "/list") => {
                let expected = match Self::expected_revision(&request) {
                    Ok(expected) => expected,
                    Err(response) => return Ok(response),
                };
                let body: ListBody = match Self::parse_body(&request) {
                    Ok(body) => body,
                    Err(response) => return Ok(response),
                };
                match self.sim.push_list(&body.list, expected) {
                    Ok(payload) => Self::json_response(&payload),
                    Err(error) => Self::error_response(error),
                }
            }
            (Method::Put, path) if path.starts_with("/list/") => {
                let expected = match Self::expected_revision(&request) {
                    Ok(expected) => expected,
                    Err(response) => return Ok(response),
                };
                let body: ItemBody = match Self::parse_body(&request) {
                    Ok(body) => body,
                    Err(response) => return Ok(response),
                };
                match self.sim.push_item(&body.item, expected) {
                    Ok(payload) => Self::json_response(&payload),
                    Err(error) => Self::error_response(error),
                }
            }
            _ => Ok(HttpResponse::new(404, b"no such endpoint".to_vec())),
        }
    }
}
