//! # Loyalty Core
//!
//! Accounts, the points ledger and request authorization for the
//! loyalty service.
//!
//! - [`CredentialStore`]: salted password hashing
//! - [`AccountDirectory`]: registration, login and lookup across the four
//!   account partitions
//! - [`PointsLedger`]: accrual, redemption, distribution and history
//! - [`AuthorizationGuard`]: bearer token resolution plus role and
//!   ownership checks
//!
//! All persistence goes through the [`AccountStore`] trait; [`MemoryStore`]
//! is the in-process implementation.

pub mod account;
mod credentials;
mod directory;
mod error;
pub mod guard;
mod id;
mod ledger;
pub mod store;
pub mod time;

pub use account::{
    Account, AccountDetails, AccountKind, DistributionRecord, PointsConsumption, PointsPolicy,
    Transaction,
};
pub use credentials::CredentialStore;
pub use directory::{validate_email, AccountDirectory, NewAccount, EMAIL_PATTERN};
pub use error::{AuthError, LedgerError};
pub use guard::{require_ownership, require_role, require_root_admin, AuthorizationGuard};
pub use id::{AccountId, ACCOUNT_ID_LEN};
pub use ledger::{
    points_for_amount, PointsLedger, RedemptionReceipt, CONSUMPTION_EXPIRATION_DAYS,
    MAX_POINTS_PER_TRANSACTION, POINTS_PER_UNIT_SPENT,
};
pub use store::{AccountStore, Condition, DocumentUpdate, MemoryStore, StoreError, UpdateOp};
pub use time::{Clock, FixedClock, SystemClock, Timestamp};
