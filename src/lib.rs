//! # Loyalty
//!
//! A loyalty-points service: clients earn points through transactions at
//! establishments and redeem them later; administrators and sponsors hold
//! their own accounts.
//!
//! This crate ties the workspace together:
//!
//! - [`loyalty_token`]: signed, time-limited bearer tokens
//! - [`loyalty_config`]: service configuration
//! - [`loyalty_core`]: accounts, the points ledger and authorization
//! - [`loyalty_api`]: the HTTP surface
//!
//! ## Usage
//!
//! ```no_run
//! use loyalty::{load_config, run_server};
//!
//! # async fn example() -> Result<(), loyalty::LoyaltyError> {
//! let config = load_config(None)?;
//! run_server(config, async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! [`load_config`] looks in order at:
//!
//! 1. an explicit path (`.json` is read as JSON, anything else as TOML)
//! 2. the environment, when `LOYALTY_SIGNING_KEY` or
//!    `LOYALTY_SIGNING_KEY_FILE` is set
//! 3. the default file `<config dir>/loyalty/config.toml`

use std::env;
use std::path::Path;

use thiserror::Error;

pub use loyalty_api::{
    create_app, create_router, run_server, start_background_server, ApiError, AppState,
    ServerError,
};
pub use loyalty_config::{ConfigError, LoyaltyConfig, LoyaltyConfigBuilder};
pub use loyalty_core::{
    Account, AccountDirectory, AccountId, AccountKind, AccountStore, AuthError,
    AuthorizationGuard, Clock, CredentialStore, LedgerError, MemoryStore, PointsLedger,
    SystemClock,
};
pub use loyalty_token::{generate_keypair_pem, public_key_to_string, TokenError, TokenService};

/// Prefix of every environment variable read by the service
pub const ENV_PREFIX: &str = "LOYALTY";

#[derive(Error, Debug)]
pub enum LoyaltyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No configuration found. Pass --config, set LOYALTY_SIGNING_KEY or LOYALTY_SIGNING_KEY_FILE, or create {0}")]
    MissingConfig(String),
}

/// Loads a configuration file, choosing the format by extension
pub fn load_config_file(path: impl AsRef<Path>) -> Result<LoyaltyConfig, LoyaltyError> {
    let path = path.as_ref();
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => LoyaltyConfig::from_file(path)?,
        _ => LoyaltyConfig::from_toml(path)?,
    };
    Ok(config)
}

/// Resolves the service configuration from a path, the environment or the default file
pub fn load_config(path: Option<&Path>) -> Result<LoyaltyConfig, LoyaltyError> {
    if let Some(path) = path {
        return load_config_file(path);
    }

    let key_in_env = [
        format!("{ENV_PREFIX}_SIGNING_KEY"),
        format!("{ENV_PREFIX}_SIGNING_KEY_FILE"),
    ]
    .iter()
    .any(|name| env::var_os(name).is_some());
    if key_in_env {
        return Ok(LoyaltyConfig::from_env_or_file(ENV_PREFIX)?);
    }

    match LoyaltyConfig::default_path() {
        Some(default) if default.exists() => load_config_file(default),
        Some(default) => Err(LoyaltyError::MissingConfig(default.display().to_string())),
        None => Err(LoyaltyError::MissingConfig(
            "a configuration file".to_string(),
        )),
    }
}
