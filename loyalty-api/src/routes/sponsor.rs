use axum::{extract::State, Json};
use loyalty_core::{Account, AccountKind, NewAccount};

use super::login;
use crate::dto::{LoginForm, RegisterRequest, TokenResponse};
use crate::error::ApiResult;
use crate::extract::{ApiForm, ApiJson};
use crate::state::AppState;

pub async fn register_sponsor(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Json<Account>> {
    let account = state
        .directory
        .register(NewAccount::new(
            AccountKind::Sponsor,
            req.name,
            req.email,
            req.password,
        ))
        .await?;
    Ok(Json(account))
}

pub async fn login_sponsor(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    login(&state, AccountKind::Sponsor, form).await
}
