//! Application state for the API server

use std::sync::Arc;

use loyalty_config::LoyaltyConfig;
use loyalty_core::{
    AccountDirectory, AccountStore, AuthorizationGuard, Clock, CredentialStore, MemoryStore,
    PointsLedger, SystemClock,
};
use loyalty_token::{TokenError, TokenService};

/// API server state
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<AccountDirectory>,
    pub ledger: Arc<PointsLedger>,
    pub guard: Arc<AuthorizationGuard>,
    /// Email of the administrator allowed through `/admin/access-all/`
    pub root_admin_email: String,
    pub version: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AccountStore>,
        tokens: TokenService,
        credentials: CredentialStore,
        clock: Arc<dyn Clock>,
        root_admin_email: impl Into<String>,
    ) -> Self {
        let directory = Arc::new(AccountDirectory::new(store.clone(), credentials));
        let ledger = Arc::new(PointsLedger::new(store, clock));
        let guard = Arc::new(AuthorizationGuard::new(Arc::new(tokens), directory.clone()));

        Self {
            directory,
            ledger,
            guard,
            root_admin_email: root_admin_email.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// State backed by an in-memory store and the system clock
    pub fn from_config(config: &LoyaltyConfig) -> Result<Self, TokenError> {
        let tokens = TokenService::from_pem(&config.signing_key, config.token_ttl_minutes)?;
        Ok(Self::new(
            Arc::new(MemoryStore::new()),
            tokens,
            CredentialStore::new(),
            Arc::new(SystemClock),
            config.root_admin_email.clone(),
        ))
    }
}
