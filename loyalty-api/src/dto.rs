//! Request and response bodies

use loyalty_core::DistributionRecord;
use serde::{Deserialize, Serialize};

/// Client, administrator and sponsor registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterEstablishmentRequest {
    pub name: String,
    pub location: String,
    pub email: String,
    pub password: String,
}

/// Form-encoded login credentials; `username` is the account email
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PointsResponse {
    pub points: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    #[serde(default)]
    pub establishment_id: String,
    #[serde(default)]
    pub description: String,
    pub amount_spent: f64,
}

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub points: i64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RedeemResponse {
    pub message: String,
    pub remaining_points: i64,
}

#[derive(Debug, Deserialize)]
pub struct AssignPointsRequest {
    pub points: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssignPointsResponse {
    pub detail: String,
    pub distribution_record: DistributionRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Usage report filters: `date` is `dd-mm-yy`, `time` is `HH:MM`
#[derive(Debug, Deserialize)]
pub struct UsageQuery {
    pub client_id: String,
    #[serde(default, alias = "fecha")]
    pub date: Option<String>,
    #[serde(default, alias = "hora")]
    pub time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
