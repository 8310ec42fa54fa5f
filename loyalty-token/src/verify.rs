extern crate biscuit_auth as biscuit;

use biscuit::macros::authorizer;
use biscuit::{Biscuit, PublicKey};
use chrono::Utc;

use crate::error::TokenError;

/// Claims recovered from a validated bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject identity (account email)
    pub subject: String,
    /// Role claim, when the token was minted with one
    pub role: Option<String>,
    /// Unix timestamp after which the token is no longer accepted
    pub expires_at: i64,
}

/// Verifies a bearer token locally and extracts its claims.
///
/// Any parse, signature or expiration failure is reported as
/// [`TokenError::InvalidOrExpired`].
///
/// # Arguments
///
/// * `token` - Base64-encoded biscuit token
/// * `public_key` - The public key used to verify the token signature
///
/// # Returns
///
/// * `Ok(TokenClaims)` - If the signature is valid and the token has not expired
/// * `Err(TokenError)` - If verification fails for any reason
pub fn verify_subject_token(token: &str, public_key: PublicKey) -> Result<TokenClaims, TokenError> {
    let biscuit = Biscuit::from_base64(token, public_key)
        .map_err(|e| TokenError::invalid_or_expired(format!("Failed to parse token: {e}")))?;

    let now = Utc::now().timestamp();
    let authz = authorizer!(
        r#"
            time({now});
            allow if subject($sub);
        "#
    );

    let mut authorizer = authz
        .build(&biscuit)
        .map_err(|e| TokenError::invalid_or_expired(format!("Failed to build authorizer: {e}")))?;

    authorizer
        .authorize()
        .map_err(|e| TokenError::invalid_or_expired(format!("Token rejected: {e}")))?;

    let subjects: Vec<(String,)> = authorizer
        .query("data($name) <- subject($name)")
        .map_err(|e| TokenError::invalid_or_expired(format!("Failed to query subject: {e}")))?;
    let subject = subjects
        .into_iter()
        .next()
        .map(|(s,)| s)
        .ok_or_else(|| TokenError::invalid_or_expired("No subject found in token"))?;

    let roles: Vec<(String,)> = authorizer
        .query("data($role) <- role($role)")
        .map_err(|e| TokenError::invalid_or_expired(format!("Failed to query role: {e}")))?;
    let role = roles.into_iter().next().map(|(r,)| r);

    let expirations: Vec<(i64,)> = authorizer
        .query("data($exp) <- expiration($exp)")
        .map_err(|e| TokenError::invalid_or_expired(format!("Failed to query expiration: {e}")))?;
    let expires_at = expirations
        .into_iter()
        .map(|(e,)| e)
        .min()
        .ok_or_else(|| TokenError::invalid_or_expired("No expiration found in token"))?;

    Ok(TokenClaims {
        subject,
        role,
        expires_at,
    })
}
