//! Request and response middleware.
//!
//! A [`MiddlewareChain`] holds an ordered list of request middleware, applied
//! before the transport call, and response middleware, applied to its
//! outcome. Response middleware sees non-2xx responses as
//! [`ApiError::Http`](crate::error::ApiError::Http) and may replace them.

use std::sync::Arc;

use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};

/// Rewrites an outgoing request.
pub trait RequestMiddleware: Send + Sync {
    fn on_request(&self, request: HttpRequest) -> HttpRequest;
}

/// Observes or replaces the outcome of a transport call.
pub trait ResponseMiddleware: Send + Sync {
    fn on_response(&self, outcome: Result<HttpResponse>) -> Result<HttpResponse>;
}

impl<F> RequestMiddleware for F
where
    F: Fn(HttpRequest) -> HttpRequest + Send + Sync,
{
    fn on_request(&self, request: HttpRequest) -> HttpRequest {
        self(request)
    }
}

impl<F> ResponseMiddleware for F
where
    F: Fn(Result<HttpResponse>) -> Result<HttpResponse> + Send + Sync,
{
    fn on_response(&self, outcome: Result<HttpResponse>) -> Result<HttpResponse> {
        self(outcome)
    }
}

/// Ordered middleware around the transport call.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    request: Vec<Arc<dyn RequestMiddleware>>,
    response: Vec<Arc<dyn ResponseMiddleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request middleware; it runs after those already registered.
    pub fn with_request(mut self, middleware: impl RequestMiddleware + 'static) -> Self {
        self.request.push(Arc::new(middleware));
        self
    }

    /// Append a response middleware; it runs after those already registered.
    pub fn with_response(mut self, middleware: impl ResponseMiddleware + 'static) -> Self {
        self.response.push(Arc::new(middleware));
        self
    }

    pub fn push_request(&mut self, middleware: Arc<dyn RequestMiddleware>) {
        self.request.push(middleware);
    }

    pub fn push_response(&mut self, middleware: Arc<dyn ResponseMiddleware>) {
        self.response.push(middleware);
    }

    /// Append all middleware of `other` after this chain's.
    pub fn extend(&mut self, other: MiddlewareChain) {
        self.request.extend(other.request);
        self.response.extend(other.response);
    }

    pub fn apply_request(&self, request: HttpRequest) -> HttpRequest {
        self.request
            .iter()
            .fold(request, |request, middleware| middleware.on_request(request))
    }

    pub fn apply_response(&self, outcome: Result<HttpResponse>) -> Result<HttpResponse> {
        self.response
            .iter()
            .fold(outcome, |outcome, middleware| middleware.on_response(outcome))
    }

    pub fn len(&self) -> usize {
        self.request.len() + self.response.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
