//! HMAC request signing for the qTrade API
//!
//! qTrade API keys come as a single `"keyid:secret"` string. Every private
//! request carries a signature over the method, path, timestamp and body,
//! plus the timestamp it was computed with.
//!
//! # Example
//!
//! ```
//! use qtrade_auth::{Credentials, RequestSigner};
//!
//! let creds = Credentials::parse("256:vwj043jtrw4o5igw4oi5jwoi45g").unwrap();
//! let headers = RequestSigner::new(&creds, 12345).headers("GET", "/", "");
//! assert_eq!(
//!     headers.authorization,
//!     "HMAC-SHA256 256:iyfC4n+bE+3hLgMJns1Z67FKA7O5qm5PgDvZHGraMTQ="
//! );
//! ```

mod credentials;
mod error;

pub use credentials::{
    Credentials, RequestSigner, SignedHeaders, AUTHORIZATION_HEADER, SIGNATURE_SCHEME,
    TIMESTAMP_HEADER,
};
pub use error::{AuthError, AuthResult};
