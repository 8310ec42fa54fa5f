use std::sync::Arc;

use loyalty_token::TokenService;
use tracing::warn;

use crate::account::{Account, AccountKind};
use crate::directory::AccountDirectory;
use crate::error::AuthError;
use crate::id::AccountId;

/// Resolves bearer tokens to accounts and checks per-operation access.
///
/// Holds no session state; every call re-validates the token.
pub struct AuthorizationGuard {
    tokens: Arc<TokenService>,
    directory: Arc<AccountDirectory>,
}

impl AuthorizationGuard {
    pub fn new(tokens: Arc<TokenService>, directory: Arc<AccountDirectory>) -> Self {
        Self { tokens, directory }
    }

    /// Issues a bearer token whose subject is the account email and whose
    /// role claim is the account kind
    pub fn issue_token(&self, account: &Account) -> Result<String, AuthError> {
        Ok(self
            .tokens
            .issue(&account.email, Some(account.kind().as_str()))?)
    }

    pub async fn authenticate(&self, token: &str) -> Result<Account, AuthError> {
        let claims = self.tokens.validate(token).map_err(|e| {
            warn!(error = %e, "Rejected bearer token");
            AuthError::Unauthenticated
        })?;

        match self.directory.find_by_email(&claims.subject).await? {
            Some(account) => Ok(account),
            None => {
                warn!(subject = %claims.subject, "Token subject has no account");
                Err(AuthError::Unauthenticated)
            }
        }
    }
}

pub fn require_role(account: &Account, kind: AccountKind) -> Result<(), AuthError> {
    if account.kind() != kind {
        warn!(id = %account.id, role = %account.kind(), required = %kind, "Role check failed");
        return Err(AuthError::forbidden(
            "Not authorized to access this resource",
        ));
    }
    Ok(())
}

pub fn require_ownership(account: &Account, owner_id: &AccountId) -> Result<(), AuthError> {
    if &account.id != owner_id {
        warn!(id = %account.id, owner = %owner_id, "Ownership check failed");
        return Err(AuthError::forbidden(
            "You do not have permission to access this resource",
        ));
    }
    Ok(())
}

/// Only the administrator whose email is `root_email` passes
pub fn require_root_admin(account: &Account, root_email: &str) -> Result<(), AuthError> {
    require_role(account, AccountKind::Administrator)?;
    if account.email != root_email {
        warn!(id = %account.id, "Root administrator check failed");
        return Err(AuthError::forbidden("Only the root administrator has access"));
    }
    Ok(())
}
