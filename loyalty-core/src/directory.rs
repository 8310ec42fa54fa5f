use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{info, warn};

use crate::account::{Account, AccountDetails, AccountKind};
use crate::credentials::CredentialStore;
use crate::error::LedgerError;
use crate::id::AccountId;
use crate::store::{AccountStore, StoreError};

pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid email regex"));

pub fn validate_email(email: &str) -> Result<(), LedgerError> {
    if !EMAIL_RE.is_match(email) {
        return Err(LedgerError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

/// Fields supplied when registering an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub kind: AccountKind,
    pub name: String,
    pub email: String,
    pub password: String,
    /// Required for establishments, ignored otherwise
    pub location: Option<String>,
}

impl NewAccount {
    pub fn new(
        kind: AccountKind,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            email: email.into(),
            password: password.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Registration, login and lookup over the four account partitions
pub struct AccountDirectory {
    store: Arc<dyn AccountStore>,
    credentials: CredentialStore,
}

impl AccountDirectory {
    pub fn new(store: Arc<dyn AccountStore>, credentials: CredentialStore) -> Self {
        Self { store, credentials }
    }

    /// Finds an account by email, searching partitions in
    /// [`AccountKind::LOOKUP_ORDER`]. The first match wins.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, LedgerError> {
        for kind in AccountKind::LOOKUP_ORDER {
            if let Some(account) = self.store.find_by_email(kind, email).await? {
                return Ok(Some(account));
            }
        }
        Ok(None)
    }

    pub async fn register(&self, new: NewAccount) -> Result<Account, LedgerError> {
        validate_email(&new.email)?;
        if new.name.trim().is_empty() {
            return Err(LedgerError::MissingField("name"));
        }
        if new.password.is_empty() {
            return Err(LedgerError::MissingField("password"));
        }
        let location = match new.kind {
            AccountKind::Establishment => match new.location {
                Some(location) if !location.trim().is_empty() => Some(location),
                _ => return Err(LedgerError::MissingField("location")),
            },
            _ => None,
        };

        if self
            .store
            .find_by_email(new.kind, &new.email)
            .await?
            .is_some()
        {
            warn!(kind = %new.kind, email = %new.email, "Registration rejected: email taken");
            return Err(LedgerError::DuplicateEmail(new.email));
        }

        let account = Account {
            id: AccountId::generate(),
            name: new.name,
            email: new.email,
            password_hash: self.credentials.hash(&new.password)?,
            details: AccountDetails::empty(new.kind, location),
        };

        match self.store.insert(account.clone()).await {
            Ok(()) => {}
            Err(StoreError::DuplicateEmail { email, .. }) => {
                return Err(LedgerError::DuplicateEmail(email))
            }
            Err(e) => return Err(e.into()),
        }

        info!(kind = %account.kind(), id = %account.id, "Registered account");
        Ok(account)
    }

    /// Checks credentials against one partition
    pub async fn login(
        &self,
        kind: AccountKind,
        email: &str,
        password: &str,
    ) -> Result<Account, LedgerError> {
        let Some(account) = self.store.find_by_email(kind, email).await? else {
            warn!(kind = %kind, "Login failed: unknown email");
            return Err(LedgerError::InvalidCredentials);
        };
        if !self.credentials.verify(password, &account.password_hash)? {
            warn!(kind = %kind, id = %account.id, "Login failed: wrong password");
            return Err(LedgerError::InvalidCredentials);
        }
        info!(kind = %kind, id = %account.id, "Login succeeded");
        Ok(account)
    }

    /// Fetches an account by its caller-supplied id
    pub async fn get(&self, kind: AccountKind, id: &str) -> Result<Account, LedgerError> {
        let account_id = AccountId::parse(id)?;
        self.store
            .find_by_id(kind, &account_id)
            .await?
            .ok_or_else(|| {
                warn!(kind = %kind, id = %account_id, "Account not found");
                LedgerError::not_found(kind, id)
            })
    }
}
