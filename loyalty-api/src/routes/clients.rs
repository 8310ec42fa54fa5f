//! Client endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use loyalty_core::{
    require_ownership, Account, AccountId, AccountKind, NewAccount, PointsConsumption, Transaction,
};

use super::login;
use crate::auth::CurrentAccount;
use crate::dto::{
    LoginForm, PointsResponse, RedeemRequest, RedeemResponse, RegisterRequest, TokenResponse,
    TransactionRequest,
};
use crate::error::ApiResult;
use crate::extract::{ApiForm, ApiJson};
use crate::state::AppState;

pub async fn register_client(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Json<Account>> {
    let account = state
        .directory
        .register(NewAccount::new(
            AccountKind::Client,
            req.name,
            req.email,
            req.password,
        ))
        .await?;
    Ok(Json(account))
}

pub async fn login_client(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    login(&state, AccountKind::Client, form).await
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    CurrentAccount(_caller): CurrentAccount,
) -> ApiResult<Json<Account>> {
    let account = state.directory.get(AccountKind::Client, &client_id).await?;
    Ok(Json(account))
}

/// Balance of a client; only the client itself may read it
pub async fn get_points(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    CurrentAccount(caller): CurrentAccount,
) -> ApiResult<Json<PointsResponse>> {
    let owner = AccountId::parse(&client_id)?;
    require_ownership(&caller, &owner)?;

    let points = state.ledger.get_balance(&client_id).await?;
    Ok(Json(PointsResponse {
        points,
        message: format!("This client has {points} points."),
    }))
}

pub async fn record_transaction(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    CurrentAccount(_caller): CurrentAccount,
    ApiJson(req): ApiJson<TransactionRequest>,
) -> ApiResult<Json<Transaction>> {
    let transaction = state
        .ledger
        .record_transaction(
            &client_id,
            &req.establishment_id,
            req.amount_spent,
            &req.description,
        )
        .await?;
    Ok(Json(transaction))
}

pub async fn redeem_points(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    CurrentAccount(_caller): CurrentAccount,
    ApiJson(req): ApiJson<RedeemRequest>,
) -> ApiResult<Json<RedeemResponse>> {
    let receipt = state
        .ledger
        .redeem_points(&client_id, req.points, &req.description)
        .await?;
    Ok(Json(RedeemResponse {
        message: receipt.message(),
        remaining_points: receipt.remaining_points,
    }))
}

pub async fn consumption_history(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    CurrentAccount(_caller): CurrentAccount,
) -> ApiResult<Json<Vec<PointsConsumption>>> {
    Ok(Json(state.ledger.get_history(&client_id).await?))
}
