//! API routes

mod admin;
mod clients;
mod establishments;
mod health;
mod sponsor;

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use loyalty_core::AccountKind;

use crate::dto::{LoginForm, TokenResponse};
use crate::error::ApiResult;
use crate::extract::ApiForm;
use crate::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        .route("/token", post(token))
        // Client endpoints
        .route("/clients/register/", post(clients::register_client))
        .route("/clients/login/", post(clients::login_client))
        .route("/clients/{client_id}/", get(clients::get_client))
        .route("/clients/{client_id}/points/", get(clients::get_points))
        .route(
            "/clients/{client_id}/transactions/",
            post(clients::record_transaction),
        )
        .route("/clients/{client_id}/redeem/", post(clients::redeem_points))
        .route(
            "/clients/{client_id}/points_consumption_history/",
            get(clients::consumption_history),
        )
        // Establishment endpoints
        .route(
            "/establishments/register/",
            post(establishments::register_establishment),
        )
        .route(
            "/establishments/login/",
            post(establishments::login_establishment),
        )
        .route(
            "/establishments/{establishment_id}/points-policy/",
            put(establishments::update_points_policy),
        )
        .route(
            "/establishments/{establishment_id}/assign-points/",
            post(establishments::assign_points),
        )
        .route(
            "/establishments/reportes/uso",
            get(establishments::usage_report),
        )
        // Administrator endpoints
        .route("/admin/register/", post(admin::register_administrator))
        .route("/admin/login/", post(admin::login_administrator))
        .route("/admin/access-all/", get(admin::access_all))
        // Sponsor endpoints
        .route("/sponsor/register/", post(sponsor::register_sponsor))
        .route("/sponsor/login/", post(sponsor::login_sponsor))
        .with_state(state)
}

/// Checks credentials within one partition and issues a bearer token
async fn login(state: &AppState, kind: AccountKind, form: LoginForm) -> ApiResult<Json<TokenResponse>> {
    let account = state
        .directory
        .login(kind, &form.username, &form.password)
        .await?;
    let token = state.guard.issue_token(&account)?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// Establishment login under the OAuth2 token path
async fn token(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    login(&state, AccountKind::Establishment, form).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use chrono::NaiveDate;
    use loyalty_core::{CredentialStore, FixedClock, MemoryStore};
    use loyalty_token::{KeyPair, TokenService};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let clock = FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        );
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            TokenService::new(KeyPair::new(), 1800),
            CredentialStore::with_cost(1024, 1, 1).unwrap(),
            Arc::new(clock),
            "root_admin@example.com",
        );
        create_router(state)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn login_as(app: &Router, path: &str, email: &str, password: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={email}&password={password}")))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn register_client(app: &Router, email: &str) -> (String, String) {
        let (status, body) = send(
            app,
            Method::POST,
            "/clients/register/",
            None,
            Some(json!({"name": "Client", "email": email, "password": "pw1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = login_as(app, "/clients/login/", email, "pw1").await;
        assert_eq!(status, StatusCode::OK);
        (id, body["access_token"].as_str().unwrap().to_string())
    }

    async fn register_establishment(app: &Router, email: &str) -> (String, String) {
        let (status, body) = send(
            app,
            Method::POST,
            "/establishments/register/",
            None,
            Some(json!({
                "name": "Cafe",
                "location": "Main St",
                "email": email,
                "password": "secret"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = login_as(app, "/establishments/login/", email, "secret").await;
        assert_eq!(status, StatusCode::OK);
        (id, body["access_token"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_health_and_welcome() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(&app, Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().starts_with("Welcome"));
    }

    #[tokio::test]
    async fn test_register_and_login_client() {
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/clients/register/",
            None,
            Some(json!({"name": "Alice", "email": "alice@example.com", "password": "pw1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "client");
        assert_eq!(body["points"], 0);
        assert!(body.get("password_hash").is_none());

        let (status, body) = login_as(&app, "/clients/login/", "alice@example.com", "pw1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "bearer");

        let (status, body) = login_as(&app, "/clients/login/", "alice@example.com", "bad").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Incorrect username or password");
    }

    #[tokio::test]
    async fn test_registration_errors() {
        let app = test_app();
        register_client(&app, "alice@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/clients/register/",
            None,
            Some(json!({"name": "A", "email": "alice@example.com", "password": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "DUPLICATE_EMAIL");

        let (status, body) = send(
            &app,
            Method::POST,
            "/sponsor/register/",
            None,
            Some(json!({"name": "S", "email": "not-an-email", "password": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_EMAIL");

        let (status, body) = send(
            &app,
            Method::POST,
            "/admin/register/",
            None,
            Some(json!({"name": "A"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_protected_routes_require_bearer() {
        let app = test_app();
        let (id, _) = register_client(&app, "alice@example.com").await;

        let (status, body) = send(&app, Method::GET, &format!("/clients/{id}/"), None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");

        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/clients/{id}/"),
            Some("not-a-token"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_get_client_validates_id() {
        let app = test_app();
        let (id, token) = register_client(&app, "alice@example.com").await;

        let (status, body) =
            send(&app, Method::GET, &format!("/clients/{id}/"), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "alice@example.com");

        let (status, body) = send(&app, Method::GET, "/clients/xyz/", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ID");

        let (status, _) = send(
            &app,
            Method::GET,
            "/clients/0123456789abcdef01234567/",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_balance_is_owner_only() {
        let app = test_app();
        let (alice, alice_token) = register_client(&app, "alice@example.com").await;
        let (bob, _) = register_client(&app, "bob@example.com").await;

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/clients/{alice}/points/"),
            Some(&alice_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["points"], 0);
        assert_eq!(body["message"], "This client has 0 points.");

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/clients/{bob}/points/"),
            Some(&alice_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_accrual_redemption_and_history() {
        let app = test_app();
        let (alice, token) = register_client(&app, "alice@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/clients/{alice}/transactions/"),
            Some(&token),
            Some(json!({"establishment_id": "est-1", "description": "dinner", "amount_spent": 50.0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["points"], 500);
        assert_eq!(body["date"], "01-06-24 12:00");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/clients/{alice}/transactions/"),
            Some(&token),
            Some(json!({"establishment_id": "est-1", "description": "refund", "amount_spent": -1.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_AMOUNT");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/clients/{alice}/redeem/"),
            Some(&token),
            Some(json!({"points": 200, "description": "coffee"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "Points redeemed successfully. You spent 200 points."
        );
        assert_eq!(body["remaining_points"], 300);

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/clients/{alice}/redeem/"),
            Some(&token),
            Some(json!({"points": 400, "description": "tv"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INSUFFICIENT_BALANCE");

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/clients/{alice}/points_consumption_history/"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let history = body.as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["points_consumed"], -200);
        assert_eq!(history[0]["expiration_date"], "30-08-24 12:00");
    }

    #[tokio::test]
    async fn test_establishment_policy_and_assignment() {
        let app = test_app();
        let (est, est_token) = register_establishment(&app, "cafe@example.com").await;
        let (other, _) = register_establishment(&app, "bar@example.com").await;
        let (_, client_token) = register_client(&app, "alice@example.com").await;

        let policy = json!({"min_points": 0, "max_points": 1000, "expiration_days": 30});
        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/establishments/{est}/points-policy/"),
            Some(&est_token),
            Some(policy.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["detail"], "Points policy updated successfully");

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/establishments/{est}/points-policy/"),
            Some(&client_token),
            Some(policy.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/establishments/{est}/points-policy/"),
            Some(&est_token),
            Some(json!({"min_points": -5, "max_points": 10, "expiration_days": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_POLICY");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/establishments/{est}/assign-points/"),
            Some(&est_token),
            Some(json!({"points": 100, "reason": "opening week"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["detail"], "Points assigned successfully");
        assert_eq!(body["distribution_record"]["points"], 100);
        assert_eq!(body["distribution_record"]["reason"], "opening week");

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/establishments/{other}/assign-points/"),
            Some(&est_token),
            Some(json!({"points": 100})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/establishments/{est}/assign-points/"),
            None,
            Some(json!({"points": 100})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_usage_report() {
        let app = test_app();
        let (_, est_token) = register_establishment(&app, "cafe@example.com").await;
        let (alice, client_token) = register_client(&app, "alice@example.com").await;

        send(
            &app,
            Method::POST,
            &format!("/clients/{alice}/transactions/"),
            Some(&client_token),
            Some(json!({"establishment_id": "cafe", "description": "meal", "amount_spent": 20.0})),
        )
        .await;
        send(
            &app,
            Method::POST,
            &format!("/clients/{alice}/redeem/"),
            Some(&client_token),
            Some(json!({"points": 50, "description": "drink"})),
        )
        .await;

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/establishments/reportes/uso?client_id={alice}&fecha=01-06-24&hora=12:00"),
            Some(&est_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/establishments/reportes/uso?client_id={alice}&date=02-06-24"),
            Some(&est_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/establishments/reportes/uso?client_id={alice}&date=2024-06-01"),
            Some(&est_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_FILTER");

        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/establishments/reportes/uso?client_id={alice}"),
            Some(&client_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_token_endpoint_and_root_admin() {
        let app = test_app();
        register_establishment(&app, "cafe@example.com").await;
        let (status, body) = login_as(&app, "/token", "cafe@example.com", "secret").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "bearer");

        for email in ["root_admin@example.com", "ops@example.com"] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/admin/register/",
                None,
                Some(json!({"name": "Admin", "email": email, "password": "adm"})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, root) = login_as(&app, "/admin/login/", "root_admin@example.com", "adm").await;
        let (_, ops) = login_as(&app, "/admin/login/", "ops@example.com", "adm").await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/admin/access-all/",
            root["access_token"].as_str(),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Access granted to all admin features.");

        let (status, _) = send(
            &app,
            Method::GET,
            "/admin/access-all/",
            ops["access_token"].as_str(),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
