//! Health check endpoints

use axum::{extract::State, Json};

use crate::dto::{HealthResponse, MessageResponse};
use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

pub async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the Loyalty Club API".to_string(),
    })
}
