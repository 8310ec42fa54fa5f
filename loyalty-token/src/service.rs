use biscuit_auth::{KeyPair, PublicKey};

use crate::error::TokenError;
use crate::mint::{create_subject_token, TokenTimeConfig};
use crate::utils::keypair_from_pem;
use crate::verify::{verify_subject_token, TokenClaims};

/// Issues and validates the bearer tokens handed out at login.
///
/// Holds the signing keypair loaded at process start; the key is never
/// compiled into the binary.
pub struct TokenService {
    keypair: KeyPair,
    ttl_seconds: i64,
}

impl TokenService {
    pub fn new(keypair: KeyPair, ttl_seconds: i64) -> Self {
        Self {
            keypair,
            ttl_seconds,
        }
    }

    /// Builds a service from a PEM private key and a lifetime in minutes
    pub fn from_pem(pem: &str, ttl_minutes: i64) -> Result<Self, TokenError> {
        if ttl_minutes <= 0 {
            return Err(TokenError::generic("Token lifetime must be positive"));
        }
        let ttl_seconds = ttl_minutes
            .checked_mul(60)
            .ok_or_else(|| TokenError::generic("Token lifetime too large"))?;
        Ok(Self::new(keypair_from_pem(pem)?, ttl_seconds))
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public()
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Issues a token for `subject` valid for the configured lifetime
    pub fn issue(&self, subject: &str, role: Option<&str>) -> Result<String, TokenError> {
        self.issue_with_time(
            subject,
            role,
            TokenTimeConfig::with_duration(self.ttl_seconds),
        )
    }

    pub fn issue_with_time(
        &self,
        subject: &str,
        role: Option<&str>,
        time_config: TokenTimeConfig,
    ) -> Result<String, TokenError> {
        create_subject_token(
            subject.to_string(),
            role.map(str::to_string),
            &self.keypair,
            time_config,
        )
    }

    /// Verifies signature and expiration and returns the token's claims
    pub fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        verify_subject_token(token, self.keypair.public())
    }
}
