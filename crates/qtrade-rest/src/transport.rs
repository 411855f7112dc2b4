//! HTTP transport abstraction
//!
//! The request pipeline only ever talks to an [`HttpTransport`]. Production
//! code uses [`ReqwestTransport`]; tests inject a `MockTransport` that serves
//! canned responses and records what was sent.

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// Connection could not be established
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// A fully prepared outgoing request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body, exactly as signed
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A fully read response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are stored lower case
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response with no headers
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Create a response with a JSON body
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// Add a header
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Look up a header, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Body as text, lossy for invalid UTF-8
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Trait for HTTP transport abstraction
///
/// This trait enables unit testing of the request pipeline by allowing
/// mock implementations to be injected instead of real HTTP calls.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and read the full response
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Real HTTP transport using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new transport with a per-request timeout
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

        debug!(status, len = body.len(), "HTTP response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(err)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockTransport;

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    #[derive(Debug, Clone)]
    enum Reply {
        Response(HttpResponse),
        Fail(String),
    }

    /// Mock transport for testing
    ///
    /// Responses are queued per `(method, path)`. Each request pops the next
    /// queued reply; the last one stays in place and is served repeatedly.
    #[derive(Debug, Default)]
    pub struct MockTransport {
        routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        /// Create a new mock transport
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a raw response for a route
        pub fn push_response(&self, method: Method, path: &str, response: HttpResponse) {
            self.push(method, path, Reply::Response(response));
        }

        /// Queue a 200 response wrapping `data` in the success envelope
        pub fn push_data(&self, method: Method, path: &str, data: serde_json::Value) {
            let body = serde_json::json!({ "data": data });
            self.push_response(method, path, HttpResponse::json(200, &body));
        }

        /// Queue a transport failure for a route
        pub fn push_failure(&self, method: Method, path: &str, reason: &str) {
            self.push(method, path, Reply::Fail(reason.to_string()));
        }

        fn push(&self, method: Method, path: &str, reply: Reply) {
            self.routes
                .lock()
                .entry((method, path.to_string()))
                .or_default()
                .push_back(reply);
        }

        /// All requests sent so far
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().clone()
        }

        /// Requests sent to a given path
        pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .iter()
                .filter(|r| r.url.path() == path)
                .cloned()
                .collect()
        }

        /// Number of requests sent so far
        pub fn request_count(&self) -> usize {
            self.requests.lock().len()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let key = (request.method.clone(), request.url.path().to_string());
            self.requests.lock().push(request);

            let reply = {
                let mut routes = self.routes.lock();
                match routes.get_mut(&key) {
                    Some(queue) if queue.len() > 1 => queue.pop_front(),
                    Some(queue) => queue.front().cloned(),
                    None => None,
                }
            };

            match reply {
                Some(Reply::Response(response)) => Ok(response),
                Some(Reply::Fail(reason)) => Err(TransportError::ConnectionFailed(reason)),
                None => Err(TransportError::ConnectionFailed(format!(
                    "no mock response for {} {}",
                    key.0, key.1
                ))),
            }
        }
    }
}
