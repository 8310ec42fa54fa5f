use thiserror::Error;

/// Errors raised while minting, parsing or validating bearer tokens
#[derive(Error, Debug)]
pub enum TokenError {
    /// The underlying biscuit library rejected the token or the builder
    #[error("Biscuit error: {0}")]
    BiscuitError(#[from] biscuit_auth::error::Token),

    /// The token is malformed, tampered with, expired, or lacks a subject
    #[error("Token is invalid or expired: {0}")]
    InvalidOrExpired(String),

    /// A signing or verification key could not be parsed
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// Catch-all for I/O and encoding failures
    #[error("{0}")]
    Generic(String),
}

impl TokenError {
    pub fn invalid_or_expired(msg: impl Into<String>) -> Self {
        TokenError::InvalidOrExpired(msg.into())
    }

    pub fn invalid_key_format(msg: impl Into<String>) -> Self {
        TokenError::InvalidKeyFormat(msg.into())
    }

    pub fn generic(msg: impl Into<String>) -> Self {
        TokenError::Generic(msg.into())
    }
}

impl From<hex::FromHexError> for TokenError {
    fn from(error: hex::FromHexError) -> Self {
        TokenError::InvalidKeyFormat(error.to_string())
    }
}

impl From<biscuit_auth::error::Format> for TokenError {
    fn from(error: biscuit_auth::error::Format) -> Self {
        TokenError::InvalidKeyFormat(error.to_string())
    }
}
