//! Account documents and the records embedded in them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::AccountId;
use crate::time::Timestamp;

/// The four account partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Client,
    Establishment,
    Administrator,
    Sponsor,
}

impl AccountKind {
    /// Order in which partitions are searched when resolving an email
    pub const LOOKUP_ORDER: [AccountKind; 4] = [
        AccountKind::Client,
        AccountKind::Establishment,
        AccountKind::Administrator,
        AccountKind::Sponsor,
    ];

    /// Role tag carried by documents and tokens
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Client => "client",
            AccountKind::Establishment => "establishment",
            AccountKind::Administrator => "administrator",
            AccountKind::Sponsor => "sponsor",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountKind::Client => "Client",
            AccountKind::Establishment => "Establishment",
            AccountKind::Administrator => "Administrator",
            AccountKind::Sponsor => "Sponsor",
        };
        f.write_str(label)
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountKind::LOOKUP_ORDER
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown account kind: {s}"))
    }
}

/// An accrual event on a client account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub establishment_id: String,
    pub points: i64,
    pub description: String,
    pub amount_spent: f64,
    pub date: Timestamp,
}

/// A redemption event on a client account.
///
/// `points_consumed` is stored negative. `expiration_date` is recorded
/// metadata; nothing reads it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsConsumption {
    pub points_consumed: i64,
    pub description: String,
    pub date: Timestamp,
    pub expiration_date: Timestamp,
}

/// A point-assignment entry in an establishment's distribution log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionRecord {
    pub points: i64,
    pub reason: Option<String>,
    pub date: Timestamp,
}

/// Descriptive bounds on point issuance for an establishment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsPolicy {
    pub min_points: i64,
    pub max_points: i64,
    pub expiration_days: i64,
}

/// Kind-specific part of an account document, tagged by `role`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum AccountDetails {
    Client {
        points: i64,
        transaction_history: Vec<Transaction>,
        points_consumption_history: Vec<PointsConsumption>,
    },
    Establishment {
        location: String,
        points_policy: Option<PointsPolicy>,
        points_distribution_history: Vec<DistributionRecord>,
    },
    Administrator,
    Sponsor,
}

impl AccountDetails {
    /// Fresh details with empty histories
    pub fn empty(kind: AccountKind, location: Option<String>) -> Self {
        match kind {
            AccountKind::Client => AccountDetails::Client {
                points: 0,
                transaction_history: Vec::new(),
                points_consumption_history: Vec::new(),
            },
            AccountKind::Establishment => AccountDetails::Establishment {
                location: location.unwrap_or_default(),
                points_policy: None,
                points_distribution_history: Vec::new(),
            },
            AccountKind::Administrator => AccountDetails::Administrator,
            AccountKind::Sponsor => AccountDetails::Sponsor,
        }
    }

    pub fn kind(&self) -> AccountKind {
        match self {
            AccountDetails::Client { .. } => AccountKind::Client,
            AccountDetails::Establishment { .. } => AccountKind::Establishment,
            AccountDetails::Administrator => AccountKind::Administrator,
            AccountDetails::Sponsor => AccountKind::Sponsor,
        }
    }
}

/// A stored account. The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(flatten)]
    pub details: AccountDetails,
}

impl Account {
    pub fn kind(&self) -> AccountKind {
        self.details.kind()
    }

    /// Point balance, for client accounts
    pub fn points(&self) -> Option<i64> {
        match &self.details {
            AccountDetails::Client { points, .. } => Some(*points),
            _ => None,
        }
    }

    pub fn consumption_history(&self) -> &[PointsConsumption] {
        match &self.details {
            AccountDetails::Client {
                points_consumption_history,
                ..
            } => points_consumption_history,
            _ => &[],
        }
    }

    pub fn transaction_history(&self) -> &[Transaction] {
        match &self.details {
            AccountDetails::Client {
                transaction_history,
                ..
            } => transaction_history,
            _ => &[],
        }
    }

    pub fn distribution_history(&self) -> &[DistributionRecord] {
        match &self.details {
            AccountDetails::Establishment {
                points_distribution_history,
                ..
            } => points_distribution_history,
            _ => &[],
        }
    }
}
