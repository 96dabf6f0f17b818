//! Request interceptor pipeline.
//!
//! Interceptors are request-transform functions applied in registration
//! order to every outbound request before dispatch. Cross-cutting
//! concerns (authentication, tracing headers, client versions) live
//! here so no code path can bypass them per-request.

use crate::http::HttpRequest;
use std::sync::Arc;

/// A request transform applied to every outbound request.
pub trait Interceptor: Send + Sync {
    /// Mutates the request before dispatch.
    fn apply(&self, request: &mut HttpRequest);
}

/// Injects the static `Authorization: OAuth <token>` credential on
/// every request.
pub struct AuthInterceptor {
    header_value: String,
}

impl AuthInterceptor {
    /// Creates an interceptor for the given bearer token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            header_value: format!("OAuth {}", token.into()),
        }
    }
}

impl Interceptor for AuthInterceptor {
    fn apply(&self, request: &mut HttpRequest) {
        request.set_header("Authorization", self.header_value.clone());
    }
}

/// An ordered pipeline of interceptors.
#[derive(Default, Clone)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an interceptor to the end of the chain.
    pub fn push(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    /// Applies every interceptor to the request, in order.
    pub fn apply_all(&self, request: &mut HttpRequest) {
        for interceptor in &self.interceptors {
            interceptor.apply(request);
        }
    }

    /// Returns the number of registered interceptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Returns true when no interceptors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;

    struct TagInterceptor {
        name: &'static str,
    }

    impl Interceptor for TagInterceptor {
        fn apply(&self, request: &mut HttpRequest) {
            let trail = request.header("X-Trail").unwrap_or("").to_string();
            request.set_header("X-Trail", format!("{trail}{}", self.name));
        }
    }

    #[test]
    fn auth_interceptor_sets_oauth_header() {
        let mut request = HttpRequest::new(Method::Get, "https://api.example.com/list");
        AuthInterceptor::new("secret-token").apply(&mut request);
        assert_eq!(request.header("Authorization"), Some("OAuth secret-token"));
    }

    #[test]
    fn chain_applies_in_registration_order() {
        let mut chain = InterceptorChain::new();
        chain.push(Arc::new(TagInterceptor { name: "a" }));
        chain.push(Arc::new(TagInterceptor { name: "b" }));

        let mut request = HttpRequest::new(Method::Get, "https://api.example.com/list");
        chain.apply_all(&mut request);
        assert_eq!(request.header("X-Trail"), Some("ab"));
    }
}
