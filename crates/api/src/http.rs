// =============================================================================
// CreUp API - HTTP Transport
// =============================================================================
// Table of Contents:
// 1. Request/Response Types
// 2. Transport Trait
// 3. Reqwest Transport
// =============================================================================

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::error::{ApiError, Result};

/// Header carrying the bearer credential.
pub const AUTHORIZATION: &str = "Authorization";

/// Header set on every request.
pub const CONTENT_TYPE: &str = "Content-Type";

/// The only content type the API speaks.
pub const JSON_CONTENT_TYPE: &str = "application/json";

// -----------------------------------------------------------------------------
// 1. Request/Response Types
// -----------------------------------------------------------------------------

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Outgoing request, relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Endpoint path, including any query string
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Create a request with the default JSON content type.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());

        Self {
            method,
            path: path.into(),
            headers,
            body: None,
        }
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set or replace a header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Look up a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Raw response as returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// JSON response from a value.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body. An empty body decodes as JSON `null`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.trim().is_empty() {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

// -----------------------------------------------------------------------------
// 2. Transport Trait
// -----------------------------------------------------------------------------

/// Sends requests to the API.
///
/// Every HTTP status comes back as `Ok`; only a failure to obtain a response
/// is an error.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Transport name for logging
    fn name(&self) -> &str;
}

// -----------------------------------------------------------------------------
// 3. Reqwest Transport
// -----------------------------------------------------------------------------

/// Transport over a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a transport for an API base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.url(&request.path);
        let mut builder = self.client.request(request.method.into(), &url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        debug!(method = %request.method, url = %url, status, "Response received");
        Ok(HttpResponse { status, body })
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_request_defaults_to_json() {
        let request = HttpRequest::new(Method::Get, "/api/services");
        assert_eq!(request.header(CONTENT_TYPE), Some(JSON_CONTENT_TYPE));
        assert_eq!(request.header(AUTHORIZATION), None);
        assert!(request.body.is_none());
    }

    #[test]
    fn success_range_is_2xx() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let response = HttpResponse::new(204, "");
        let decoded: Option<serde_json::Value> = response.decode().unwrap();
        assert!(decoded.is_none());
        assert!(response.decode::<()>().is_ok());
    }

    #[test]
    fn malformed_body_is_a_deserialize_error() {
        let response = HttpResponse::new(200, "<html>");
        let err = response.decode::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, ApiError::Deserialize(_)));
    }

    #[test]
    fn json_response_round_trips_body() {
        let response = HttpResponse::json(201, &json!({ "id": "7" }));
        let value: serde_json::Value = response.decode().unwrap();
        assert_eq!(value["id"], "7");
    }

    #[test]
    fn transport_trims_base_url() {
        let transport = ReqwestTransport::new("http://localhost:8000/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8000");
        assert_eq!(transport.url("/api/projects"), "http://localhost:8000/api/projects");
    }
}
