//! In-memory account store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AccountStore, DocumentUpdate, Result, StoreError};
use crate::account::{Account, AccountKind};
use crate::id::AccountId;

/// Account store that keeps every partition in memory.
///
/// Each partition preserves insertion order. All writes take the single
/// write lock, so an update is applied to one consistent document.
#[derive(Default)]
pub struct MemoryStore {
    partitions: RwLock<HashMap<AccountKind, Vec<Account>>>,
    fail_writes: RwLock<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with [`StoreError::Unavailable`]
    pub async fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().await = fail;
    }

    /// Number of documents in a partition
    pub async fn count(&self, kind: AccountKind) -> usize {
        self.partitions
            .read()
            .await
            .get(&kind)
            .map(Vec::len)
            .unwrap_or_default()
    }

    async fn check_writable(&self) -> Result<()> {
        if *self.fail_writes.read().await {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert(&self, account: Account) -> Result<()> {
        self.check_writable().await?;
        let kind = account.kind();
        let mut partitions = self.partitions.write().await;
        let partition = partitions.entry(kind).or_default();
        if partition.iter().any(|a| a.email == account.email) {
            return Err(StoreError::DuplicateEmail {
                kind,
                email: account.email,
            });
        }
        partition.push(account);
        Ok(())
    }

    async fn find_by_id(&self, kind: AccountKind, id: &AccountId) -> Result<Option<Account>> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(&kind)
            .and_then(|p| p.iter().find(|a| &a.id == id))
            .cloned())
    }

    async fn find_by_email(&self, kind: AccountKind, email: &str) -> Result<Option<Account>> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(&kind)
            .and_then(|p| p.iter().find(|a| a.email == email))
            .cloned())
    }

    async fn update(
        &self,
        kind: AccountKind,
        id: &AccountId,
        update: DocumentUpdate,
    ) -> Result<Option<Account>> {
        self.check_writable().await?;
        let mut partitions = self.partitions.write().await;
        let Some(slot) = partitions
            .get_mut(&kind)
            .and_then(|p| p.iter_mut().find(|a| &a.id == id))
        else {
            return Ok(None);
        };

        match update.apply(slot)? {
            Some(updated) => {
                *slot = updated.clone();
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }
}
