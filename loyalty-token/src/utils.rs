use std::fs::read_to_string;
use std::path::Path;

use biscuit_auth::{KeyPair, PublicKey};

use crate::error::TokenError;

/// Parses a PEM-encoded private key into a signing keypair
pub fn keypair_from_pem(pem: &str) -> Result<KeyPair, TokenError> {
    KeyPair::from_private_key_pem(pem)
        .map_err(|e| TokenError::invalid_key_format(format!("Failed to parse PEM: {e}")))
}

pub fn keypair_from_pem_file(path: impl AsRef<Path>) -> Result<KeyPair, TokenError> {
    let key_string = read_to_string(path)
        .map_err(|e| TokenError::generic(format!("Failed to read file: {e}")))?;
    keypair_from_pem(&key_string)
}

/// Generates a fresh Ed25519 signing keypair.
///
/// # Returns
///
/// The private key in PEM format and the matching public key
pub fn generate_keypair_pem() -> Result<(String, PublicKey), TokenError> {
    let keypair = KeyPair::new();
    let pem = keypair.to_private_key_pem()?.to_string();
    Ok((pem, keypair.public()))
}

/// Formats a public key as `ed25519/<hex>`
pub fn public_key_to_string(public_key: &PublicKey) -> String {
    format!("ed25519/{}", hex::encode(public_key.to_bytes()))
}
