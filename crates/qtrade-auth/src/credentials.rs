//! Authentication credentials for the qTrade API
//!
//! Implements the qTrade request signature:
//!
//! ```text
//! METHOD \n PATH[?QUERY] \n TIMESTAMP \n BODY \n SECRET
//! ```
//!
//! hashed with SHA-256 and base64 encoded. The body line is present but
//! empty for requests without a body.
//!
//! # Security
//!
//! The secret is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use sha2::{Digest, Sha256};

use crate::error::{AuthError, AuthResult};

/// Header carrying the signature
pub const AUTHORIZATION_HEADER: &str = "Authorization";
/// Header carrying the timestamp used in the signature
pub const TIMESTAMP_HEADER: &str = "HMAC-Timestamp";
/// Scheme tag prefixed to the signature
pub const SIGNATURE_SCHEME: &str = "HMAC-SHA256";

/// API credentials for authenticated requests
///
/// The secret is automatically zeroized when the Credentials are dropped.
pub struct Credentials {
    /// Key id (public)
    key_id: String,
    /// Signing secret (zeroized on drop)
    secret: SecretString,
}

impl Credentials {
    /// Create credentials from a key id and secret
    pub fn new(key_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            secret: SecretString::new(secret.into().into_boxed_str()),
        }
    }

    /// Parse credentials from the `"keyid:secret"` form handed out by qTrade
    ///
    /// The string is split on the first `:`.
    pub fn parse(pair: &str) -> AuthResult<Self> {
        let (key_id, secret) = pair.split_once(':').ok_or_else(|| {
            AuthError::MalformedCredential("expected \"keyid:secret\"".to_string())
        })?;

        if key_id.is_empty() || secret.is_empty() {
            return Err(AuthError::MalformedCredential(
                "key id and secret must not be empty".to_string(),
            ));
        }

        Ok(Self::new(key_id, secret))
    }

    /// Create credentials from environment variables
    ///
    /// Reads `QTRADE_API_KEY` (in `keyid:secret` form) from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let pair = std::env::var("QTRADE_API_KEY")
            .map_err(|_| AuthError::EnvVarNotSet("QTRADE_API_KEY".to_string()))?;

        Self::parse(&pair)
    }

    /// Get the key id
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Sign a request
    ///
    /// # Arguments
    /// * `method` - HTTP method, upper case
    /// * `path` - Request path including the query string, if any
    /// * `timestamp` - Unix seconds, also sent in the timestamp header
    /// * `body` - Raw request body, empty for none
    ///
    /// # Returns
    /// Base64-encoded signature
    pub fn sign(&self, method: &str, path: &str, timestamp: u64, body: &str) -> String {
        let mut sha256 = Sha256::new();
        sha256.update(method.as_bytes());
        sha256.update(b"\n");
        sha256.update(path.as_bytes());
        sha256.update(b"\n");
        sha256.update(timestamp.to_string().as_bytes());
        sha256.update(b"\n");
        sha256.update(body.as_bytes());
        sha256.update(b"\n");
        // expose_secret() provides controlled access to the key
        sha256.update(self.secret.expose_secret().as_bytes());

        BASE64.encode(sha256.finalize())
    }
}

impl Clone for Credentials {
    /// Clone credentials (creates new SecretString with same content)
    fn clone(&self) -> Self {
        Self::new(self.key_id.clone(), self.secret.expose_secret())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl<'de> Deserialize<'de> for Credentials {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pair = String::deserialize(deserializer)?;
        Self::parse(&pair).map_err(serde::de::Error::custom)
    }
}

/// Headers produced by signing a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// `HMAC-SHA256 <key_id>:<signature>`
    pub authorization: String,
    /// Unix seconds used in the signature
    pub timestamp: String,
}

impl SignedHeaders {
    /// Header name/value pairs ready to attach to a request
    pub fn into_pairs(self) -> [(&'static str, String); 2] {
        [
            (AUTHORIZATION_HEADER, self.authorization),
            (TIMESTAMP_HEADER, self.timestamp),
        ]
    }
}

/// Request signer bound to one timestamp
///
/// The timestamp is supplied by the caller, so identical inputs always
/// produce identical headers.
#[derive(Debug)]
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    timestamp: u64,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer
    pub fn new(credentials: &'a Credentials, timestamp: u64) -> Self {
        Self {
            credentials,
            timestamp,
        }
    }

    /// Get the timestamp for this request
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Get the key id
    pub fn key_id(&self) -> &str {
        self.credentials.key_id()
    }

    /// Sign the request, returning the bare signature
    pub fn sign(&self, method: &str, path: &str, body: &str) -> String {
        self.credentials.sign(method, path, self.timestamp, body)
    }

    /// Sign the request, returning both authentication headers
    pub fn headers(&self, method: &str, path: &str, body: &str) -> SignedHeaders {
        SignedHeaders {
            authorization: format!(
                "{} {}:{}",
                SIGNATURE_SCHEME,
                self.key_id(),
                self.sign(method, path, body)
            ),
            timestamp: self.timestamp.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "256:vwj043jtrw4o5igw4oi5jwoi45g";

    #[test]
    fn test_known_signature() {
        let creds = Credentials::parse(KEY).unwrap();
        let signer = RequestSigner::new(&creds, 12345);
        assert_eq!(signer.timestamp(), 12345);
        let headers = signer.headers("GET", "/", "");

        assert_eq!(
            headers.authorization,
            "HMAC-SHA256 256:iyfC4n+bE+3hLgMJns1Z67FKA7O5qm5PgDvZHGraMTQ="
        );
        assert_eq!(headers.timestamp, "12345");
    }

    #[test]
    fn test_signature_with_body() {
        let creds = Credentials::new("1", "secret");
        let signature = creds.sign("POST", "/v1/user/cancel_order", 1573776000, r#"{"id":42}"#);
        assert_eq!(signature, "ZWYwkI+Mqby5chB0eoavwfNl7PoWyN7Epww7pttUPoI=");
    }

    #[test]
    fn test_signing_consistency() {
        let creds = Credentials::parse(KEY).unwrap();
        let base = creds.sign("GET", "/v1/user/orders?open=true", 100, "");

        assert_eq!(base, creds.sign("GET", "/v1/user/orders?open=true", 100, ""));
        assert_ne!(base, creds.sign("POST", "/v1/user/orders?open=true", 100, ""));
        assert_ne!(base, creds.sign("GET", "/v1/user/orders?open=false", 100, ""));
        assert_ne!(base, creds.sign("GET", "/v1/user/orders?open=true", 101, ""));
        assert_ne!(base, creds.sign("GET", "/v1/user/orders?open=true", 100, "{}"));

        let other = Credentials::parse("256:another-secret").unwrap();
        assert_ne!(base, other.sign("GET", "/v1/user/orders?open=true", 100, ""));
    }

    #[test]
    fn test_parse_splits_on_first_colon() {
        let creds = Credentials::parse("7:abc:def").unwrap();
        assert_eq!(creds.key_id(), "7");
        assert_eq!(creds.secret.expose_secret(), "abc:def");
    }

    #[test]
    fn test_parse_without_separator_fails() {
        let err = Credentials::parse("256vwj043jtrw4o5igw4oi5jwoi45g").unwrap_err();
        assert!(matches!(err, AuthError::MalformedCredential(_)));

        assert!(Credentials::parse(":secret").is_err());
        assert!(Credentials::parse("256:").is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::parse(KEY).unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("vwj043jtrw4o5igw4oi5jwoi45g"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_deserialize_from_pair() {
        let creds: Credentials = serde_json::from_str(r#""1:1111""#).unwrap();
        assert_eq!(creds.key_id(), "1");

        assert!(serde_json::from_str::<Credentials>(r#""1111""#).is_err());
    }
}
