// =============================================================================
// CreUp API - API Client
// =============================================================================
// Table of Contents:
// 1. Response Type
// 2. API Client
// 3. Builder
// =============================================================================

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::auth::interceptor::{BearerAuth, SessionGuard};
use crate::auth::store::Session;
use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
use crate::middleware::{MiddlewareChain, RequestMiddleware, ResponseMiddleware};
use crate::navigation::Navigator;

// -----------------------------------------------------------------------------
// 1. Response Type
// -----------------------------------------------------------------------------

/// Successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    body: String,
}

impl ApiResponse {
    /// Decode the JSON body. An empty body decodes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        HttpResponse::new(self.status, self.body.as_str()).decode()
    }

    pub fn text(&self) -> &str {
        &self.body
    }
}

impl From<HttpResponse> for ApiResponse {
    fn from(response: HttpResponse) -> Self {
        Self {
            status: response.status,
            body: response.body,
        }
    }
}

// -----------------------------------------------------------------------------
// 2. API Client
// -----------------------------------------------------------------------------

/// HTTP client for API requests.
///
/// Cheap to clone; clones share transport, session and middleware.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    middleware: MiddlewareChain,
    session: Session,
    navigator: Arc<dyn Navigator>,
    cancel: Option<CancelToken>,
}

impl ApiClient {
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Clone of this client whose requests are bound to `token`.
    pub fn with_cancel(&self, token: &CancelToken) -> Self {
        Self {
            cancel: Some(token.clone()),
            ..self.clone()
        }
    }

    /// Send a request through the middleware chain and the transport.
    ///
    /// Non-2xx responses become [`ApiError::Http`] before the response
    /// middleware runs. Cancelled requests skip the response middleware.
    pub async fn send(&self, request: HttpRequest) -> Result<ApiResponse> {
        let request = self.middleware.apply_request(request);
        let method = request.method;
        let path = request.path.clone();
        debug!(method = %method, path = %path, transport = self.transport.name(), "Sending request");

        let sent = match &self.cancel {
            Some(token) => token.run(self.transport.send(request)).await.and_then(|r| r),
            None => self.transport.send(request).await,
        };
        if let Err(ApiError::Cancelled) = sent {
            debug!(method = %method, path = %path, "Request cancelled");
            return Err(ApiError::Cancelled);
        }

        let outcome = sent.and_then(|response| {
            if response.is_success() {
                Ok(response)
            } else {
                debug!(method = %method, path = %path, status = response.status, "Request failed");
                Err(ApiError::http(response.status, response.body))
            }
        });

        self.middleware.apply_response(outcome).map(ApiResponse::from)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.send(HttpRequest::new(method, path).with_body(body)).await
    }

    /// GET request.
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(HttpRequest::new(Method::Get, path)).await
    }

    /// POST request with JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send_json(Method::Post, path, body).await
    }

    /// PUT request with JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send_json(Method::Put, path, body).await
    }

    /// PATCH request with JSON body.
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send_json(Method::Patch, path, body).await
    }

    /// DELETE request.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send(HttpRequest::new(Method::Delete, path)).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("transport", &self.transport.name())
            .field("middleware", &self.middleware.len())
            .field("session", &self.session)
            .field("cancel", &self.cancel)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// 3. Builder
// -----------------------------------------------------------------------------

/// Builder for [`ApiClient`].
///
/// The auth interceptors are always installed first; extra middleware runs
/// after them in registration order.
pub struct ApiClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    session: Option<Session>,
    navigator: Option<Arc<dyn Navigator>>,
    middleware: MiddlewareChain,
}

impl ApiClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            session: None,
            navigator: None,
            middleware: MiddlewareChain::new(),
        }
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn request_middleware(mut self, middleware: impl RequestMiddleware + 'static) -> Self {
        self.middleware = self.middleware.with_request(middleware);
        self
    }

    pub fn response_middleware(mut self, middleware: impl ResponseMiddleware + 'static) -> Self {
        self.middleware = self.middleware.with_response(middleware);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        self.config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.config.base_url.clone())?),
        };
        let session = self.session.unwrap_or_else(default_session);
        let navigator = self.navigator.unwrap_or_else(default_navigator);

        let mut middleware = MiddlewareChain::new()
            .with_request(BearerAuth::new(session.clone(), navigator.clone(), &self.config))
            .with_response(SessionGuard::new(session.clone(), navigator.clone(), &self.config));
        middleware.extend(self.middleware);

        Ok(ApiClient {
            config: Arc::new(self.config),
            transport,
            middleware,
            session,
            navigator,
            cancel: None,
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_session() -> Session {
    Session::in_memory()
}

#[cfg(target_arch = "wasm32")]
fn default_session() -> Session {
    Session::browser()
}

#[cfg(not(target_arch = "wasm32"))]
fn default_navigator() -> Arc<dyn Navigator> {
    Arc::new(crate::navigation::MemoryNavigator::new("/"))
}

#[cfg(target_arch = "wasm32")]
fn default_navigator() -> Arc<dyn Navigator> {
    Arc::new(crate::navigation::BrowserNavigator)
}
