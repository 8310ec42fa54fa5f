//! Points ledger: accrual, redemption and history over client and
//! establishment documents.
//!
//! Every balance change is a single [`DocumentUpdate`] that adjusts the
//! balance and appends the matching history record together. Redemption
//! is additionally conditional on the balance covering the request, so
//! concurrent redemptions serialize in the store instead of overdrawing.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{error, info};

use crate::account::{
    Account, AccountKind, DistributionRecord, PointsConsumption, PointsPolicy, Transaction,
};
use crate::error::LedgerError;
use crate::id::AccountId;
use crate::store::{AccountStore, Condition, DocumentUpdate, UpdateOp};
use crate::time::Clock;

/// Points earned per unit of currency spent
pub const POINTS_PER_UNIT_SPENT: f64 = 10.0;
/// Ceiling on points earned by a single transaction
pub const MAX_POINTS_PER_TRANSACTION: i64 = 3000;
/// Offset of a consumption record's expiration from its creation
pub const CONSUMPTION_EXPIRATION_DAYS: i64 = 90;

static DATE_FILTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-\d{2}-\d{2}$").expect("valid date filter regex"));
static TIME_FILTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").expect("valid time filter regex"));

/// Points earned for `amount_spent`: ten per unit, truncated, capped.
pub fn points_for_amount(amount_spent: f64) -> i64 {
    ((amount_spent * POINTS_PER_UNIT_SPENT).trunc() as i64).min(MAX_POINTS_PER_TRANSACTION)
}

/// Result of a successful redemption
#[derive(Debug, Clone, PartialEq)]
pub struct RedemptionReceipt {
    pub points_redeemed: i64,
    pub remaining_points: i64,
    pub consumption: PointsConsumption,
}

impl RedemptionReceipt {
    pub fn message(&self) -> String {
        format!(
            "Points redeemed successfully. You spent {} points.",
            self.points_redeemed
        )
    }
}

pub struct PointsLedger {
    store: Arc<dyn AccountStore>,
    clock: Arc<dyn Clock>,
}

impl PointsLedger {
    pub fn new(store: Arc<dyn AccountStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    async fn load(&self, kind: AccountKind, id: &str) -> Result<(AccountId, Account), LedgerError> {
        let account_id = AccountId::parse(id)?;
        let account = self
            .store
            .find_by_id(kind, &account_id)
            .await?
            .ok_or_else(|| LedgerError::not_found(kind, id))?;
        Ok((account_id, account))
    }

    /// Records a purchase and credits the earned points.
    pub async fn record_transaction(
        &self,
        client_id: &str,
        establishment_id: &str,
        amount_spent: f64,
        description: &str,
    ) -> Result<Transaction, LedgerError> {
        let (id, _) = self.load(AccountKind::Client, client_id).await?;

        if !amount_spent.is_finite() || amount_spent <= 0.0 {
            return Err(LedgerError::invalid_amount("Amount spent must be positive"));
        }
        if establishment_id.trim().is_empty() {
            return Err(LedgerError::MissingField("establishment_id"));
        }
        if description.trim().is_empty() {
            return Err(LedgerError::MissingField("description"));
        }

        let transaction = Transaction {
            establishment_id: establishment_id.to_string(),
            points: points_for_amount(amount_spent),
            description: description.to_string(),
            amount_spent,
            date: self.clock.now(),
        };

        let update = DocumentUpdate::new()
            .with(UpdateOp::IncrementPoints(transaction.points))
            .with(UpdateOp::PushTransaction(transaction.clone()));

        if self
            .store
            .update(AccountKind::Client, &id, update)
            .await?
            .is_none()
        {
            error!(client = %id, "Transaction update was not applied");
            return Err(LedgerError::UpdateFailed("transaction".to_string()));
        }

        info!(
            client = %id,
            establishment = %transaction.establishment_id,
            points = transaction.points,
            "Recorded transaction"
        );
        Ok(transaction)
    }

    /// Redeems points from a client balance.
    pub async fn redeem_points(
        &self,
        client_id: &str,
        points: i64,
        description: &str,
    ) -> Result<RedemptionReceipt, LedgerError> {
        let (id, account) = self.load(AccountKind::Client, client_id).await?;

        if points <= 0 {
            return Err(LedgerError::invalid_amount(
                "Points to redeem must be positive",
            ));
        }
        let available = account.points().unwrap_or_default();
        if points > available {
            return Err(LedgerError::InsufficientBalance {
                requested: points,
                available,
            });
        }

        let now = self.clock.now();
        let consumption = PointsConsumption {
            points_consumed: -points,
            description: description.to_string(),
            date: now,
            expiration_date: now.plus_days(CONSUMPTION_EXPIRATION_DAYS),
        };

        let update = DocumentUpdate::new()
            .when(Condition::PointsAtLeast(points))
            .with(UpdateOp::IncrementPoints(-points))
            .with(UpdateOp::PushConsumption(consumption.clone()));

        let Some(updated) = self.store.update(AccountKind::Client, &id, update).await? else {
            error!(client = %id, points, "Redemption update was not applied");
            return Err(LedgerError::UpdateFailed("redemption".to_string()));
        };

        let remaining_points = updated.points().unwrap_or_default();
        info!(client = %id, points, remaining = remaining_points, "Redeemed points");
        Ok(RedemptionReceipt {
            points_redeemed: points,
            remaining_points,
            consumption,
        })
    }

    /// Appends to an establishment's distribution log. No client balance changes.
    pub async fn assign_points(
        &self,
        establishment_id: &str,
        points: i64,
        reason: Option<String>,
    ) -> Result<DistributionRecord, LedgerError> {
        let (id, _) = self.load(AccountKind::Establishment, establishment_id).await?;

        let record = DistributionRecord {
            points,
            reason,
            date: self.clock.now(),
        };
        let update = DocumentUpdate::new().with(UpdateOp::PushDistribution(record.clone()));
        if self
            .store
            .update(AccountKind::Establishment, &id, update)
            .await?
            .is_none()
        {
            return Err(LedgerError::UpdateFailed("assignment".to_string()));
        }

        info!(establishment = %id, points, "Assigned points");
        Ok(record)
    }

    /// Consumption history of a client, oldest first
    pub async fn get_history(&self, client_id: &str) -> Result<Vec<PointsConsumption>, LedgerError> {
        let (_, account) = self.load(AccountKind::Client, client_id).await?;
        Ok(account.consumption_history().to_vec())
    }

    pub async fn get_balance(&self, client_id: &str) -> Result<i64, LedgerError> {
        let (_, account) = self.load(AccountKind::Client, client_id).await?;
        Ok(account.points().unwrap_or_default())
    }

    pub async fn update_points_policy(
        &self,
        establishment_id: &str,
        policy: PointsPolicy,
    ) -> Result<PointsPolicy, LedgerError> {
        let id = AccountId::parse(establishment_id)?;
        if policy.min_points < 0 || policy.max_points < 0 {
            return Err(LedgerError::InvalidPolicy(
                "points must be non-negative".to_string(),
            ));
        }
        if policy.expiration_days < 0 {
            return Err(LedgerError::InvalidPolicy(
                "expiration_days must be non-negative".to_string(),
            ));
        }

        let update = DocumentUpdate::new().with(UpdateOp::SetPointsPolicy(policy));
        if self
            .store
            .update(AccountKind::Establishment, &id, update)
            .await?
            .is_none()
        {
            return Err(LedgerError::not_found(
                AccountKind::Establishment,
                establishment_id,
            ));
        }

        info!(establishment = %id, "Updated points policy");
        Ok(policy)
    }

    /// Consumption records of a client matching an optional `dd-mm-yy`
    /// date and `HH:MM` time.
    pub async fn usage_report(
        &self,
        client_id: &str,
        date: Option<&str>,
        time: Option<&str>,
    ) -> Result<Vec<PointsConsumption>, LedgerError> {
        let id = AccountId::parse(client_id)?;
        check_filter(&DATE_FILTER_RE, date, "Invalid date format. Expected 'dd-mm-yy'")?;
        check_filter(&TIME_FILTER_RE, time, "Invalid time format. Expected 'HH:MM'")?;

        let account = self
            .store
            .find_by_id(AccountKind::Client, &id)
            .await?
            .ok_or_else(|| LedgerError::not_found(AccountKind::Client, client_id))?;

        Ok(account
            .consumption_history()
            .iter()
            .filter(|record| date.map_or(true, |d| record.date.date_part() == d))
            .filter(|record| time.map_or(true, |t| record.date.time_part() == t))
            .cloned()
            .collect())
    }
}

fn check_filter(pattern: &Regex, value: Option<&str>, message: &str) -> Result<(), LedgerError> {
    let Some(value) = value else {
        return Ok(());
    };
    if !pattern.is_match(value) {
        return Err(LedgerError::InvalidFilter(message.to_string()));
    }
    Ok(())
}
