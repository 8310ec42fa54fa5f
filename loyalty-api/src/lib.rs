//! # Loyalty API
//!
//! HTTP surface of the loyalty service on axum.
//!
//! Every protected route takes a [`CurrentAccount`], resolved from the
//! `Authorization: Bearer <token>` header. Errors are returned as
//! `{"error": ..., "code": ...}` with the status mapped by [`ApiError`].

mod auth;
pub mod dto;
mod error;
mod extract;
mod routes;
mod server;
mod state;

pub use auth::CurrentAccount;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::create_router;
pub use server::{create_app, run_server, start_background_server, ServerError};
pub use state::AppState;
