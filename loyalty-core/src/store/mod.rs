//! Document store abstraction for account partitions.
//!
//! Each [`AccountKind`] is its own partition. Writes against a single
//! document go through [`DocumentUpdate`], which a store must apply
//! atomically: either every operation lands or none does.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::account::{
    Account, AccountDetails, AccountKind, DistributionRecord, PointsConsumption, PointsPolicy,
    Transaction,
};
use crate::id::AccountId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} with email '{email}' already exists")]
    DuplicateEmail { kind: AccountKind, email: String },

    #[error("operation {op} does not apply to a {kind} document")]
    InvalidOperation { op: &'static str, kind: AccountKind },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Precondition checked against the current document before an update
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Client balance is at least the given amount
    PointsAtLeast(i64),
}

/// One mutation within a [`DocumentUpdate`]
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    IncrementPoints(i64),
    PushTransaction(Transaction),
    PushConsumption(PointsConsumption),
    PushDistribution(DistributionRecord),
    SetPointsPolicy(PointsPolicy),
}

impl UpdateOp {
    fn name(&self) -> &'static str {
        match self {
            UpdateOp::IncrementPoints(_) => "increment_points",
            UpdateOp::PushTransaction(_) => "push_transaction",
            UpdateOp::PushConsumption(_) => "push_consumption",
            UpdateOp::PushDistribution(_) => "push_distribution",
            UpdateOp::SetPointsPolicy(_) => "set_points_policy",
        }
    }
}

/// A conditional, all-or-nothing update of one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentUpdate {
    pub condition: Option<Condition>,
    pub ops: Vec<UpdateOp>,
}

impl DocumentUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with(mut self, op: UpdateOp) -> Self {
        self.ops.push(op);
        self
    }

    /// Applies the update to a copy of `account`.
    ///
    /// Returns `Ok(None)` when the condition does not hold or there is
    /// nothing to apply; the original document is never touched.
    pub fn apply(&self, account: &Account) -> Result<Option<Account>> {
        if let Some(condition) = &self.condition {
            if !condition_holds(condition, account) {
                return Ok(None);
            }
        }
        if self.ops.is_empty() {
            return Ok(None);
        }

        let mut updated = account.clone();
        for op in &self.ops {
            apply_op(op, &mut updated.details)?;
        }
        Ok(Some(updated))
    }
}

fn condition_holds(condition: &Condition, account: &Account) -> bool {
    match condition {
        Condition::PointsAtLeast(min) => account.points().is_some_and(|p| p >= *min),
    }
}

fn apply_op(op: &UpdateOp, details: &mut AccountDetails) -> Result<()> {
    match (op, details) {
        (UpdateOp::IncrementPoints(delta), AccountDetails::Client { points, .. }) => {
            *points += delta;
        }
        (
            UpdateOp::PushTransaction(tx),
            AccountDetails::Client {
                transaction_history,
                ..
            },
        ) => transaction_history.push(tx.clone()),
        (
            UpdateOp::PushConsumption(record),
            AccountDetails::Client {
                points_consumption_history,
                ..
            },
        ) => points_consumption_history.push(record.clone()),
        (
            UpdateOp::PushDistribution(record),
            AccountDetails::Establishment {
                points_distribution_history,
                ..
            },
        ) => points_distribution_history.push(record.clone()),
        (UpdateOp::SetPointsPolicy(policy), AccountDetails::Establishment { points_policy, .. }) => {
            *points_policy = Some(*policy);
        }
        (op, details) => {
            return Err(StoreError::InvalidOperation {
                op: op.name(),
                kind: details.kind(),
            })
        }
    }
    Ok(())
}

/// Persistence for account documents, partitioned by kind
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new document; fails if its email is taken within the partition
    async fn insert(&self, account: Account) -> Result<()>;

    async fn find_by_id(&self, kind: AccountKind, id: &AccountId) -> Result<Option<Account>>;

    async fn find_by_email(&self, kind: AccountKind, email: &str) -> Result<Option<Account>>;

    /// Applies `update` atomically and returns the updated document, or
    /// `None` when the document is missing or nothing was modified.
    async fn update(
        &self,
        kind: AccountKind,
        id: &AccountId,
        update: DocumentUpdate,
    ) -> Result<Option<Account>>;
}
