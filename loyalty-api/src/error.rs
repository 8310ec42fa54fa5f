//! API error types

use axum::{
    extract::rejection::{FormRejection, JsonRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use loyalty_core::{AuthError, LedgerError};
use loyalty_token::TokenError;
use serde::Serialize;
use thiserror::Error;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

fn ledger_parts(err: &LedgerError) -> (StatusCode, &'static str, String) {
    let code = match err {
        LedgerError::InvalidAmount(_) => "INVALID_AMOUNT",
        LedgerError::MissingField(_) => "MISSING_FIELD",
        LedgerError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
        LedgerError::DuplicateEmail(_) => "DUPLICATE_EMAIL",
        LedgerError::InvalidEmail(_) => "INVALID_EMAIL",
        LedgerError::InvalidId(_) => "INVALID_ID",
        LedgerError::InvalidPolicy(_) => "INVALID_POLICY",
        LedgerError::InvalidFilter(_) => "INVALID_FILTER",
        LedgerError::InvalidCredentials => "INVALID_CREDENTIALS",
        LedgerError::NotFound { .. } => {
            return (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string());
        }
        LedgerError::UpdateFailed(_)
        | LedgerError::Credential(_)
        | LedgerError::Storage(_) => {
            return internal(err);
        }
    };
    (StatusCode::BAD_REQUEST, code, err.to_string())
}

fn internal(err: &dyn std::error::Error) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %err, "Request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Ledger(e) => ledger_parts(e),
            ApiError::Auth(AuthError::Unauthenticated) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                AuthError::Unauthenticated.to_string(),
            ),
            ApiError::Auth(e @ AuthError::Forbidden(_)) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", e.to_string())
            }
            ApiError::Auth(AuthError::Directory(e)) => ledger_parts(e),
            ApiError::Auth(e @ AuthError::Token(_)) => internal(e),
            ApiError::Token(e) => internal(e),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], Json(body)).into_response();
        }
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;
