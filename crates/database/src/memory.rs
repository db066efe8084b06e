use crate::error::DbError;
use crate::store::ProfileStore;
use async_trait::async_trait;
use core_types::{AccountTier, UserProfile, UserTransaction};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use uuid::Uuid;

/// An in-process backend holding all profiles and transactions behind a
/// single mutex.
///
/// The lock is held for the full duration of each mutating operation, and
/// reads hand out defensive copies, so callers never iterate a collection
/// that is being mutated concurrently. Used by the test suite and by
/// deployments that select the `memory` storage backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    profiles: Vec<UserProfile>,
    transactions: Vec<UserTransaction>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn insert_profile(&self, profile: &UserProfile) -> Result<(), DbError> {
        self.inner.lock().profiles.push(profile.clone());
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<UserProfile>, DbError> {
        Ok(self.inner.lock().profiles.clone())
    }

    async fn fetch_profile(&self, id: Uuid) -> Result<Option<UserProfile>, DbError> {
        let inner = self.inner.lock();
        Ok(inner.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<(), DbError> {
        let mut inner = self.inner.lock();
        if let Some(idx) = inner.profiles.iter().position(|p| p.id == profile.id) {
            inner.profiles[idx] = profile.clone();
        }
        Ok(())
    }

    async fn delete_profile(&self, id: Uuid) -> Result<(), DbError> {
        let mut inner = self.inner.lock();
        inner.profiles.retain(|p| p.id != id);
        // Cascade: a profile owns its transactions.
        inner.transactions.retain(|t| t.user_id != id);
        Ok(())
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<UserProfile>, DbError> {
        let inner = self.inner.lock();
        Ok(inner
            .profiles
            .iter()
            .filter(|p| p.name.contains(fragment))
            .cloned()
            .collect())
    }

    async fn fetch_by_tier(&self, tier: AccountTier) -> Result<Vec<UserProfile>, DbError> {
        let inner = self.inner.lock();
        Ok(inner
            .profiles
            .iter()
            .filter(|p| p.tier == tier)
            .cloned()
            .collect())
    }

    async fn fetch_by_balance_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<UserProfile>, DbError> {
        let mut matches: Vec<UserProfile> = {
            let inner = self.inner.lock();
            inner
                .profiles
                .iter()
                .filter(|p| p.balance >= min && p.balance <= max)
                .cloned()
                .collect()
        };
        matches.sort_by(|a, b| b.balance.cmp(&a.balance));
        Ok(matches)
    }

    async fn record_transaction(
        &self,
        profile: &UserProfile,
        transaction: &UserTransaction,
    ) -> Result<(), DbError> {
        let mut inner = self.inner.lock();
        // Both writes happen under one lock acquisition, or neither does.
        if let Some(idx) = inner.profiles.iter().position(|p| p.id == profile.id) {
            inner.profiles[idx] = profile.clone();
            inner.transactions.push(transaction.clone());
        }
        Ok(())
    }

    async fn fetch_transactions(&self, user_id: Uuid) -> Result<Vec<UserTransaction>, DbError> {
        let mut matches: Vec<UserTransaction> = {
            let inner = self.inner.lock();
            inner
                .transactions
                .iter()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect()
        };
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn fetch_all_transactions(&self) -> Result<Vec<UserTransaction>, DbError> {
        Ok(self.inner.lock().transactions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_types::TransactionType;
    use rust_decimal_macros::dec;

    fn profile(balance: Decimal) -> UserProfile {
        let now = Utc::now();
        UserProfile {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            age: Some(30),
            balance,
            tier: AccountTier::for_balance(balance),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn delete_cascades_to_transactions() {
        let store = MemoryStore::new();
        let owner = profile(dec!(500));
        store.insert_profile(&owner).await.unwrap();

        let transaction = UserTransaction {
            id: Uuid::new_v4(),
            user_id: owner.id,
            amount: dec!(50),
            description: "coffee".to_string(),
            kind: TransactionType::Expense,
            created_at: Utc::now(),
        };
        store.record_transaction(&owner, &transaction).await.unwrap();
        assert_eq!(store.fetch_transactions(owner.id).await.unwrap().len(), 1);

        store.delete_profile(owner.id).await.unwrap();
        assert!(store.fetch_profile(owner.id).await.unwrap().is_none());
        assert!(store.fetch_transactions(owner.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn record_transaction_skips_unknown_profiles() {
        let store = MemoryStore::new();
        let ghost = profile(dec!(100));

        let transaction = UserTransaction {
            id: Uuid::new_v4(),
            user_id: ghost.id,
            amount: dec!(10),
            description: String::new(),
            kind: TransactionType::Income,
            created_at: Utc::now(),
        };
        // Neither write lands when the owner is not stored.
        store.record_transaction(&ghost, &transaction).await.unwrap();
        assert!(store.fetch_all_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn balance_range_is_descending() {
        let store = MemoryStore::new();
        for balance in [dec!(100), dec!(900), dec!(400)] {
            store.insert_profile(&profile(balance)).await.unwrap();
        }

        let matches = store
            .fetch_by_balance_range(dec!(0), dec!(1000))
            .await
            .unwrap();
        let balances: Vec<Decimal> = matches.iter().map(|p| p.balance).collect();
        assert_eq!(balances, vec![dec!(900), dec!(400), dec!(100)]);
    }
}
