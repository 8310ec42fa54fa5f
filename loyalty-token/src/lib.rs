//! # Loyalty Token
//!
//! Bearer tokens for the loyalty service.
//!
//! Tokens are signed biscuits carrying the subject (account email), an
//! optional role claim and an absolute expiration. Verification is local:
//! only the public half of the signing keypair is needed.
//!
//! ## Usage
//!
//! ```no_run
//! use loyalty_token::{TokenService, generate_keypair_pem};
//!
//! fn main() -> Result<(), loyalty_token::TokenError> {
//!     let (pem, _public_key) = generate_keypair_pem()?;
//!     let tokens = TokenService::from_pem(&pem, 30)?;
//!
//!     let token = tokens.issue("alice@example.com", Some("client"))?;
//!     let claims = tokens.validate(&token)?;
//!     assert_eq!(claims.subject, "alice@example.com");
//!     Ok(())
//! }
//! ```

mod error;
mod mint;
mod service;
mod utils;
mod verify;

pub use error::TokenError;
pub use mint::{create_subject_token, TokenTimeConfig, DEFAULT_TOKEN_TTL_SECONDS};
pub use service::TokenService;
pub use utils::{generate_keypair_pem, keypair_from_pem, keypair_from_pem_file, public_key_to_string};
pub use verify::{verify_subject_token, TokenClaims};

// Re-export biscuit types that are needed for public API
pub use biscuit_auth::{KeyPair, PublicKey};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_service() -> TokenService {
        TokenService::new(KeyPair::new(), DEFAULT_TOKEN_TTL_SECONDS)
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let tokens = test_service();
        let token = tokens.issue("e@example.com", Some("establishment")).unwrap();

        let claims = tokens.validate(&token).unwrap();
        assert_eq!(claims.subject, "e@example.com");
        assert_eq!(claims.role.as_deref(), Some("establishment"));
        assert!(claims.expires_at > Utc::now().timestamp());
    }

    #[test]
    fn test_expired_token_fails_validation() {
        let tokens = test_service();
        let token = tokens
            .issue_with_time(
                "e@example.com",
                None,
                TokenTimeConfig {
                    start_time: Some(Utc::now().timestamp() - 3600),
                    duration: 60,
                },
            )
            .unwrap();

        let result = tokens.validate(&token);
        assert!(matches!(result, Err(TokenError::InvalidOrExpired(_))));
    }

    #[test]
    fn test_altered_token_fails_validation() {
        let tokens = test_service();
        let token = tokens.issue("e@example.com", None).unwrap();

        // Flip one character in the middle of the signed payload
        let mut chars: Vec<char> = token.chars().collect();
        let middle = chars.len() / 2;
        chars[middle] = if chars[middle] == 'A' { 'B' } else { 'A' };
        let altered: String = chars.into_iter().collect();

        assert!(tokens.validate(&altered).is_err());
    }

    #[test]
    fn test_token_from_other_key_is_rejected() {
        let issuer = test_service();
        let verifier = test_service();
        let token = issuer.issue("e@example.com", None).unwrap();

        let result = verifier.validate(&token);
        assert!(matches!(result, Err(TokenError::InvalidOrExpired(_))));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let tokens = test_service();
        let result = tokens.validate("invalid-base64!");
        assert!(matches!(result, Err(TokenError::InvalidOrExpired(_))));
    }

    #[test]
    fn test_pem_roundtrip() {
        let (pem, public_key) = generate_keypair_pem().unwrap();
        let keypair = keypair_from_pem(&pem).unwrap();
        assert_eq!(keypair.public().to_bytes(), public_key.to_bytes());

        let printed = public_key_to_string(&public_key);
        assert!(printed.starts_with("ed25519/"));
        assert_eq!(printed.len(), "ed25519/".len() + 64);
    }

    #[test]
    fn test_from_pem_rejects_bad_input() {
        assert!(TokenService::from_pem("not a key", 30).is_err());

        let (pem, _) = generate_keypair_pem().unwrap();
        assert!(TokenService::from_pem(&pem, 0).is_err());

        let tokens = TokenService::from_pem(&pem, 45).unwrap();
        assert_eq!(tokens.ttl_seconds(), 45 * 60);
    }

    #[test]
    fn test_from_pem_rejects_oversized_lifetime() {
        let (pem, _) = generate_keypair_pem().unwrap();
        match TokenService::from_pem(&pem, i64::MAX / 30) {
            Err(TokenError::Generic(msg)) => assert!(msg.contains("too large")),
            Err(other) => panic!("Expected Generic error, got {:?}", other),
            Ok(_) => panic!("Expected oversized lifetime to be rejected"),
        }
    }
}
