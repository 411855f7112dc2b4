//! Request description and decoded response payload

use reqwest::Method;
use std::collections::HashSet;

/// A request to the qTrade API, before signing
///
/// Query parameters and JSON body are explicit fields; nothing is inferred
/// from the HTTP method.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the endpoint, e.g. `/v1/user/orders`
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Error statuses that should not be logged
    pub silent_statuses: HashSet<u16>,
}

impl ApiRequest {
    /// Create a request
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
            silent_statuses: HashSet::new(),
        }
    }

    /// Create a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Add a query parameter
    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a query parameter if present
    pub fn with_optional_query(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.with_query(key, value),
            None => self,
        }
    }

    /// Set the JSON body
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Do not log failures with this status
    pub fn silent(mut self, status: u16) -> Self {
        self.silent_statuses.insert(status);
        self
    }
}

/// Decoded success response
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    /// The `data` field of a JSON envelope (`Null` if absent)
    Data(serde_json::Value),
    /// 2xx response whose body was not JSON
    Success,
}

impl ApiPayload {
    /// Take the data, if any
    pub fn into_data(self) -> Option<serde_json::Value> {
        match self {
            Self::Data(data) => Some(data),
            Self::Success => None,
        }
    }
}
