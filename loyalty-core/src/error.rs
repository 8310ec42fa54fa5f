use loyalty_token::TokenError;
use thiserror::Error;

use crate::account::AccountKind;
use crate::store::StoreError;

/// Errors raised by the account directory and the points ledger
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0}")]
    InvalidAmount(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Insufficient points: requested {requested}, available {available}")]
    InsufficientBalance { requested: i64, available: i64 },

    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Invalid id format: {0}")]
    InvalidId(String),

    #[error("Invalid points policy: {0}")]
    InvalidPolicy(String),

    #[error("{0}")]
    InvalidFilter(String),

    #[error("{kind} not found")]
    NotFound { kind: AccountKind, id: String },

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Update was not applied: {0}")]
    UpdateFailed(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl LedgerError {
    pub fn not_found(kind: AccountKind, id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        LedgerError::InvalidAmount(msg.into())
    }
}

/// Errors raised while resolving and checking the caller of a request
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Could not validate credentials")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Directory(#[from] LedgerError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl AuthError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        AuthError::Forbidden(msg.into())
    }
}
