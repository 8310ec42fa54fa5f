//! Bearer token extraction

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use loyalty_core::{Account, AuthError};

use crate::error::ApiError;
use crate::state::AppState;

/// The account behind the request's bearer token.
///
/// Rejects with 401 when the header is missing, malformed, or the token
/// does not resolve to an account.
pub struct CurrentAccount(pub Account);

pub(crate) fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::Unauthenticated)?;
        let account = state.guard.authenticate(token).await?;
        Ok(CurrentAccount(account))
    }
}
