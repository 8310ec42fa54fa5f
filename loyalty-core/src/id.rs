use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;

/// Length of an account identifier in hex characters
pub const ACCOUNT_ID_LEN: usize = 24;

/// Identifier of an account document: 24 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        let uuid = Uuid::new_v4();
        AccountId(hex::encode(&uuid.as_bytes()[..ACCOUNT_ID_LEN / 2]))
    }

    /// Parses an identifier supplied by a caller.
    ///
    /// Accepts upper or lower case hex; the stored form is lowercase.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        if raw.len() != ACCOUNT_ID_LEN || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(LedgerError::InvalidId(raw.to_string()));
        }
        Ok(AccountId(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        AccountId::parse(&raw).map_err(serde::de::Error::custom)
    }
}
