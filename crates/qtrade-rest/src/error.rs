//! Error types for REST API operations

use qtrade_auth::AuthError;
use qtrade_types::MarketKey;

use crate::transport::TransportError;

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Network-level failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// API key string is not in `keyid:secret` form
    #[error("Malformed credential: {0}")]
    MalformedCredential(String),

    /// Mutually exclusive or missing call arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Non-2xx response from the exchange
    #[error("API error ({status}): {message} {codes:?}")]
    Api {
        /// Human readable summary
        message: String,
        /// HTTP status code
        status: u16,
        /// Error codes from the `errors` list of the body, empty if unparsable
        codes: Vec<String>,
    },

    /// Endpoint or path could not be turned into a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Market or ticker not present in the exchange's reference data
    #[error("Market not found: {0}")]
    MarketNotFound(MarketKey),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),
}

impl From<AuthError> for RestError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MalformedCredential(msg) => Self::MalformedCredential(msg),
            AuthError::EnvVarNotSet(var) => Self::EnvVarNotSet(var),
        }
    }
}

impl RestError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Error codes of an API error, empty for other errors
    pub fn codes(&self) -> &[String] {
        match self {
            Self::Api { codes, .. } => codes,
            _ => &[],
        }
    }

    /// Check if this error indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
