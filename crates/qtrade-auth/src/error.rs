//! Error types for authentication operations

/// Errors that can occur while building credentials
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Key string is not in `keyid:secret` form
    #[error("Malformed credential: {0}")]
    MalformedCredential(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::EnvVarNotSet("QTRADE_API_KEY".to_string());
        assert!(err.to_string().contains("QTRADE_API_KEY"));
    }
}
