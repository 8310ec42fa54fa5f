//! Administrator endpoints

use axum::{extract::State, Json};
use loyalty_core::{require_root_admin, Account, AccountKind, NewAccount};

use super::login;
use crate::auth::CurrentAccount;
use crate::dto::{LoginForm, MessageResponse, RegisterRequest, TokenResponse};
use crate::error::ApiResult;
use crate::extract::{ApiForm, ApiJson};
use crate::state::AppState;

pub async fn register_administrator(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Json<Account>> {
    let account = state
        .directory
        .register(NewAccount::new(
            AccountKind::Administrator,
            req.name,
            req.email,
            req.password,
        ))
        .await?;
    Ok(Json(account))
}

pub async fn login_administrator(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    login(&state, AccountKind::Administrator, form).await
}

pub async fn access_all(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
) -> ApiResult<Json<MessageResponse>> {
    require_root_admin(&caller, &state.root_admin_email)?;
    Ok(Json(MessageResponse {
        message: "Access granted to all admin features.".to_string(),
    }))
}
