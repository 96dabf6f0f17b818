//! Remote gateway trait and HTTP implementation.

use crate::error::{GatewayError, GatewayResult};
use crate::http::{HttpClient, HttpRequest, HttpResponse, Method, DEFAULT_TIMEOUT};
use crate::interceptor::{AuthInterceptor, Interceptor, InterceptorChain};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use taskrev_model::{ItemPayload, ListPayload, TodoItem};

/// Header carrying the client's last-known collection revision on
/// writes; the backend rejects the write with 409 when it is stale.
pub const REVISION_HEADER: &str = "X-Last-Known-Revision";

/// The remote side of the synchronization boundary.
///
/// All operations exchange the full wire payloads described by
/// [`taskrev_model`]; `expected_revision` is the optimistic-concurrency
/// token for writes.
pub trait RemoteGateway: Send + Sync {
    /// Fetches the backend's current collection and revision.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport, auth or protocol
    /// failure.
    fn fetch_list(&self) -> GatewayResult<ListPayload>;

    /// Replaces the backend collection, guarded by the expected
    /// revision.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Conflict`] when the backend's revision
    /// has moved past `expected_revision`.
    fn push_list(&self, items: &[TodoItem], expected_revision: u64) -> GatewayResult<ListPayload>;

    /// Updates a single item, guarded by the expected revision.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Conflict`] when the backend's revision
    /// has moved past `expected_revision`.
    fn push_item(&self, item: &TodoItem, expected_revision: u64) -> GatewayResult<ItemPayload>;
}

impl<T: RemoteGateway + ?Sized> RemoteGateway for Arc<T> {
    fn fetch_list(&self) -> GatewayResult<ListPayload> {
        (**self).fetch_list()
    }

    fn push_list(&self, items: &[TodoItem], expected_revision: u64) -> GatewayResult<ListPayload> {
        (**self).push_list(items, expected_revision)
    }

    fn push_item(&self, item: &TodoItem, expected_revision: u64) -> GatewayResult<ItemPayload> {
        (**self).push_item(item, expected_revision)
    }
}

#[derive(Serialize)]
struct ListBody<'a> {
    list: &'a [TodoItem],
}

#[derive(Serialize)]
struct ItemBody<'a> {
    item: &'a TodoItem,
}

/// HTTP-based remote gateway.
///
/// Wraps an [`HttpClient`] with the interceptor pipeline, the JSON wire
/// codecs and the status-to-error mapping. The auth credential is
/// injected by an interceptor, so it reaches every request this gateway
/// ever sends.
///
/// # Example
///
/// ```ignore
/// let gateway = HttpGateway::new("https://todo.example.com/api", client)
///     .with_auth_token("secret")
///     .with_timeout(Duration::from_secs(20));
/// let payload = gateway.fetch_list()?;
/// ```
pub struct HttpGateway<C: HttpClient> {
    base_url: String,
    client: C,
    interceptors: InterceptorChain,
    timeout: Duration,
}

impl<C: HttpClient> HttpGateway<C> {
    /// Creates a gateway for the given base URL (no trailing slash) and
    /// client.
    #[must_use]
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            interceptors: InterceptorChain::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Registers the `Authorization: OAuth <token>` interceptor,
    /// builder style.
    #[must_use]
    pub fn with_auth_token(self, token: impl Into<String>) -> Self {
        self.with_interceptor(Arc::new(AuthInterceptor::new(token)))
    }

    /// Appends an interceptor to the pipeline, builder style.
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Sets the per-request timeout, builder style.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn dispatch(
        &self,
        mut request: HttpRequest,
        expected_revision: Option<u64>,
    ) -> GatewayResult<HttpResponse> {
        request.timeout = self.timeout;
        self.interceptors.apply_all(&mut request);

        tracing::debug!(method = request.method.as_str(), url = %request.url, "dispatching request");

        let response = self
            .client
            .execute(request)
            .map_err(GatewayError::network)?;

        match response.status {
            status if response.is_success() => {
                tracing::debug!(status, "request succeeded");
                Ok(response)
            }
            401 | 403 => Err(GatewayError::Auth(response.body_text())),
            409 => Err(GatewayError::Conflict {
                expected: expected_revision.unwrap_or_default(),
            }),
            status if (500..600).contains(&status) => Err(GatewayError::Server {
                status,
                message: response.body_text(),
            }),
            status => Err(GatewayError::Protocol(format!(
                "unexpected status {status}: {}",
                response.body_text()
            ))),
        }
    }

    fn decode<T: DeserializeOwned>(response: &HttpResponse) -> GatewayResult<T> {
        serde_json::from_slice(&response.body)
            .map_err(|e| GatewayError::Protocol(format!("undecodable response body: {e}")))
    }

    fn encode<T: Serialize>(body: &T) -> GatewayResult<Vec<u8>> {
        serde_json::to_vec(body)
            .map_err(|e| GatewayError::Protocol(format!("unencodable request body: {e}")))
    }
}

impl<C: HttpClient> RemoteGateway for HttpGateway<C> {
    fn fetch_list(&self) -> GatewayResult<ListPayload> {
        let request = HttpRequest::new(Method::Get, format!("{}/list", self.base_url));
        let response = self.dispatch(request, None)?;
        Self::decode(&response)
    }

    fn push_list(&self, items: &[TodoItem], expected_revision: u64) -> GatewayResult<ListPayload> {
        let body = Self::encode(&ListBody { list: items })?;
        let mut request =
            HttpRequest::new(Method::Patch, format!("{}/list", self.base_url)).with_body(body);
        request.set_header(REVISION_HEADER, expected_revision.to_string());

        let response = self.dispatch(request, Some(expected_revision))?;
        Self::decode(&response)
    }

    fn push_item(&self, item: &TodoItem, expected_revision: u64) -> GatewayResult<ItemPayload> {
        let body = Self::encode(&ItemBody { item })?;
        let mut request =
            HttpRequest::new(Method::Put, format!("{}/list/{}", self.base_url, item.id))
                .with_body(body);
        request.set_header(REVISION_HEADER, expected_revision.to_string());

        let response = self.dispatch(request, Some(expected_revision))?;
        Self::decode(&response)
    }
}
