//! Establishment endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use loyalty_core::{
    require_ownership, require_role, Account, AccountId, AccountKind, NewAccount,
    PointsConsumption, PointsPolicy,
};

use super::login;
use crate::auth::CurrentAccount;
use crate::dto::{
    AssignPointsRequest, AssignPointsResponse, DetailResponse, LoginForm,
    RegisterEstablishmentRequest, TokenResponse, UsageQuery,
};
use crate::error::ApiResult;
use crate::extract::{ApiForm, ApiJson, ApiQuery};
use crate::state::AppState;

pub async fn register_establishment(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterEstablishmentRequest>,
) -> ApiResult<Json<Account>> {
    let account = state
        .directory
        .register(
            NewAccount::new(
                AccountKind::Establishment,
                req.name,
                req.email,
                req.password,
            )
            .with_location(req.location),
        )
        .await?;
    Ok(Json(account))
}

pub async fn login_establishment(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    login(&state, AccountKind::Establishment, form).await
}

/// Checks the caller is the establishment named in the path
fn require_establishment_owner(caller: &Account, establishment_id: &str) -> ApiResult<()> {
    require_role(caller, AccountKind::Establishment)?;
    let owner = AccountId::parse(establishment_id)?;
    require_ownership(caller, &owner)?;
    Ok(())
}

pub async fn update_points_policy(
    State(state): State<AppState>,
    Path(establishment_id): Path<String>,
    CurrentAccount(caller): CurrentAccount,
    ApiJson(policy): ApiJson<PointsPolicy>,
) -> ApiResult<Json<DetailResponse>> {
    require_establishment_owner(&caller, &establishment_id)?;
    state
        .ledger
        .update_points_policy(&establishment_id, policy)
        .await?;
    Ok(Json(DetailResponse {
        detail: "Points policy updated successfully".to_string(),
    }))
}

pub async fn assign_points(
    State(state): State<AppState>,
    Path(establishment_id): Path<String>,
    CurrentAccount(caller): CurrentAccount,
    ApiJson(req): ApiJson<AssignPointsRequest>,
) -> ApiResult<Json<AssignPointsResponse>> {
    require_establishment_owner(&caller, &establishment_id)?;
    let record = state
        .ledger
        .assign_points(&establishment_id, req.points, req.reason)
        .await?;
    Ok(Json(AssignPointsResponse {
        detail: "Points assigned successfully".to_string(),
        distribution_record: record,
    }))
}

/// Consumption records of a client, filtered by date and time
pub async fn usage_report(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    ApiQuery(query): ApiQuery<UsageQuery>,
) -> ApiResult<Json<Vec<PointsConsumption>>> {
    require_role(&caller, AccountKind::Establishment)?;
    let records = state
        .ledger
        .usage_report(
            &query.client_id,
            query.date.as_deref(),
            query.time.as_deref(),
        )
        .await?;
    Ok(Json(records))
}
