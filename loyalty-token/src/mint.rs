extern crate biscuit_auth as biscuit;

use biscuit::macros::{biscuit, fact};
use biscuit::KeyPair;
use chrono::Utc;
use tracing::debug;

use crate::error::TokenError;

/// Default lifetime of a bearer token: 30 minutes.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 30 * 60;

/// TokenTimeConfig allows control over token creation times and durations
#[derive(Debug, Clone, Copy)]
pub struct TokenTimeConfig {
    /// Optional custom start time (now time override)
    pub start_time: Option<i64>,
    /// Duration in seconds (default: 1800 seconds = 30 minutes)
    pub duration: i64,
}

impl Default for TokenTimeConfig {
    fn default() -> Self {
        Self {
            start_time: None,
            duration: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}

impl TokenTimeConfig {
    /// Starts now and lasts `duration` seconds.
    pub fn with_duration(duration: i64) -> Self {
        Self {
            start_time: None,
            duration,
        }
    }

    /// Absolute unix timestamp after which the token is rejected
    pub fn expiration(&self) -> i64 {
        let start_time = self.start_time.unwrap_or_else(|| Utc::now().timestamp());
        start_time + self.duration
    }
}

/// Mints a signed bearer token for `subject`.
///
/// The authority block carries:
/// - `subject({subject})`: the account email the token was issued to
/// - `role({role})`: optional role claim
/// - `expiration({expiration})` plus a time check so verification fails once
///   the absolute expiration has passed
///
/// # Arguments
///
/// * `subject` - Subject identity, must not be empty
/// * `role` - Optional role claim
/// * `keypair` - Signing keypair
/// * `time_config` - Start time and lifetime of the token
///
/// # Returns
///
/// Base64-encoded biscuit token
pub fn create_subject_token(
    subject: String,
    role: Option<String>,
    keypair: &KeyPair,
    time_config: TokenTimeConfig,
) -> Result<String, TokenError> {
    if subject.trim().is_empty() {
        return Err(TokenError::generic("Token requires a subject"));
    }
    let expiration = time_config.expiration();

    let mut biscuit_builder = biscuit!(
        r#"
            subject({subject});
            expiration({expiration});
            check if time($time), $time < {expiration};
        "#
    );

    if let Some(role) = role {
        biscuit_builder = biscuit_builder.fact(fact!(r#"role({role});"#))?;
    }

    let biscuit = biscuit_builder.build(keypair)?;
    debug!("biscuit (authority): {}", biscuit);

    Ok(biscuit.to_base64()?)
}
