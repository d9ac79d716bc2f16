//! Transport trait and implementations.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use url::Url;
use uuid::Uuid;

use crate::error::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request, ready to hand to a transport.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub bearer_token: Option<String>,
    pub body: Option<serde_json::Value>,
    /// Sent as `X-Request-ID` and attached to log lines.
    pub request_id: Uuid,
}

/// Status and body of a response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests over some medium, enabling mockability in tests.
///
/// Only transport-level failures are errors here; any HTTP status is a
/// successful send.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &Request) -> Result<RawResponse, TransportError>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { inner })
    }

    /// Wrap an already configured client.
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &Request) -> Result<RawResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.inner.get(request.url.clone()),
            Method::Post => self.inner.post(request.url.clone()),
            Method::Put => self.inner.put(request.url.clone()),
            Method::Delete => self.inner.delete(request.url.clone()),
        };

        builder = builder.header("X-Request-ID", request.request_id.to_string());
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

/// Canned response for [`MockTransport`].
#[derive(Debug, Clone)]
pub enum MockResponse {
    Json(u16, serde_json::Value),
    Text(u16, String),
    /// Fail at the transport level, as if the connection dropped.
    Unavailable(String),
}

impl MockResponse {
    fn into_result(self) -> Result<RawResponse, TransportError> {
        match self {
            MockResponse::Json(status, value) => Ok(RawResponse {
                status,
                body: value.to_string(),
            }),
            MockResponse::Text(status, body) => Ok(RawResponse { status, body }),
            MockResponse::Unavailable(reason) => Err(TransportError::Unavailable(reason)),
        }
    }
}

/// Mock transport for testing.
///
/// Responses are registered per method and URL path (query ignored). When
/// several are registered for the same route they are served in order and
/// the last one repeats. Every request is recorded.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<MockResponse>>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a route.
    pub fn with_response(self, method: Method, path: &str, response: MockResponse) -> Self {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
        self
    }

    /// Queue a JSON response for a route.
    pub fn with_json(self, method: Method, path: &str, status: u16, body: serde_json::Value) -> Self {
        self.with_response(method, path, MockResponse::Json(status, body))
    }

    /// Requests sent so far, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_response(&self, method: Method, path: &str) -> Option<MockResponse> {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &Request) -> Result<RawResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        match self.next_response(request.method, request.url.path()) {
            Some(response) => response.into_result(),
            None => Ok(RawResponse {
                status: 404,
                body: format!("No mock response for {} {}", request.method, request.url.path()),
            }),
        }
    }
}
