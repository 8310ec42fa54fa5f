use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::LedgerError;

/// Salted one-way password hashing (Argon2id).
///
/// Plaintext passwords are never stored; only PHC-format hashes are.
#[derive(Clone, Default)]
pub struct CredentialStore {
    hasher: Argon2<'static>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Argon2id with explicit cost parameters
    ///
    /// # Arguments
    ///
    /// * `memory_kib` - Memory cost in KiB
    /// * `iterations` - Number of passes
    /// * `parallelism` - Degree of parallelism
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, LedgerError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| LedgerError::Credential(e.to_string()))?;
        Ok(Self {
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, password: &str) -> Result<String, LedgerError> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| LedgerError::Credential(e.to_string()))
    }

    /// Checks `password` against a stored hash. A mismatch is `Ok(false)`;
    /// a malformed hash is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, LedgerError> {
        let parsed = PasswordHash::new(hash).map_err(|e| LedgerError::Credential(e.to_string()))?;
        match self.hasher.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(LedgerError::Credential(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> CredentialStore {
        CredentialStore::with_cost(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let credentials = cheap();
        let hash = credentials.hash("pw1").unwrap();
        assert_ne!(hash, "pw1");
        assert!(hash.starts_with("$argon2id$"));
        assert!(credentials.verify("pw1", &hash).unwrap());
        assert!(!credentials.verify("pw2", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let credentials = cheap();
        let a = credentials.hash("same").unwrap();
        let b = credentials.hash("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(cheap().verify("pw", "not-a-hash").is_err());
    }

    #[test]
    fn test_invalid_cost_rejected() {
        assert!(CredentialStore::with_cost(1024, 0, 1).is_err());
    }
}
