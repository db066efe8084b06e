use crate::error::ServiceError;
use analytics::{AnalyticsEngine, AnalyticsReport};
use chrono::Utc;
use core_types::{AccountTier, TransactionType, UserProfile, UserTransaction};
use database::ProfileStore;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Maximum length of a profile's display name.
const MAX_NAME_LEN: usize = 100;
/// Maximum length of a transaction description.
const MAX_DESCRIPTION_LEN: usize = 500;

/// The caller-supplied fields of a profile, used for both create and update.
/// Identity, tier and timestamps are always assigned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub age: Option<i32>,
    pub balance: Decimal,
}

/// The caller-supplied fields of a transaction. The owning user, identity
/// and timestamp are assigned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionDraft {
    pub amount: Decimal,
    pub description: String,
    pub kind: TransactionType,
}

/// The result of an update against a possibly-missing profile.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    Updated(UserProfile),
    NotFound,
}

/// The result of recording a transaction against a possibly-missing profile.
#[derive(Debug, Clone)]
pub enum TransactionOutcome {
    Added {
        user: UserProfile,
        transaction: UserTransaction,
    },
    UserNotFound,
}

/// The domain service mediating all profile and transaction access.
///
/// Holds no state of its own beyond the storage reference; every operation
/// validates, mutates domain values, and persists through the store.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Validates and persists a new profile, assigning its id, timestamps
    /// and derived tier.
    pub async fn add_user(&self, draft: ProfileDraft) -> Result<UserProfile, ServiceError> {
        validate_profile(&draft)?;

        let now = Utc::now();
        let profile = UserProfile {
            id: Uuid::new_v4(),
            tier: AccountTier::for_balance(draft.balance),
            name: draft.name,
            age: draft.age,
            balance: draft.balance,
            created_at: now,
            updated_at: now,
        };

        self.store.insert_profile(&profile).await?;
        tracing::info!(user_id = %profile.id, tier = %profile.tier, "Profile created.");
        Ok(profile)
    }

    /// Returns a snapshot of all profiles in storage-defined order.
    pub async fn get_all(&self) -> Result<Vec<UserProfile>, ServiceError> {
        Ok(self.store.fetch_all().await?)
    }

    /// Looks up a single profile by exact id. No partial matches.
    pub async fn get_user_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, ServiceError> {
        Ok(self.store.fetch_profile(id).await?)
    }

    /// Re-validates the draft exactly as `add_user`, then overwrites the
    /// profile's name, age and balance, refreshes the update timestamp and
    /// re-derives the tier.
    pub async fn update_user(
        &self,
        id: Uuid,
        draft: ProfileDraft,
    ) -> Result<UpdateOutcome, ServiceError> {
        validate_profile(&draft)?;

        let Some(mut profile) = self.store.fetch_profile(id).await? else {
            return Ok(UpdateOutcome::NotFound);
        };

        profile.name = draft.name;
        profile.age = draft.age;
        profile.balance = draft.balance;
        profile.tier = AccountTier::for_balance(profile.balance);
        profile.updated_at = Utc::now();

        self.store.update_profile(&profile).await?;
        tracing::info!(user_id = %profile.id, tier = %profile.tier, "Profile updated.");
        Ok(UpdateOutcome::Updated(profile))
    }

    /// Removes a profile; its transactions are removed with it.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), ServiceError> {
        self.store.delete_profile(id).await?;
        tracing::info!(user_id = %id, "Profile deleted.");
        Ok(())
    }

    /// Case-sensitive substring search over display names.
    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<UserProfile>, ServiceError> {
        Ok(self.store.search_by_name(fragment).await?)
    }

    pub async fn get_by_tier(&self, tier: AccountTier) -> Result<Vec<UserProfile>, ServiceError> {
        Ok(self.store.fetch_by_tier(tier).await?)
    }

    /// Profiles with `min <= balance <= max`, descending by balance. The
    /// boundary layer guarantees `0 <= min <= max`.
    pub async fn get_by_balance_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<UserProfile>, ServiceError> {
        Ok(self.store.fetch_by_balance_range(min, max).await?)
    }

    /// Records a transaction against a profile: adjusts the balance by the
    /// kind's signed effect, refreshes the update timestamp, re-derives the
    /// tier, and persists transaction and profile as one atomic unit.
    ///
    /// The entered amount must be positive, but the resulting balance may go
    /// negative; only create and update enforce a non-negative balance.
    pub async fn add_transaction(
        &self,
        user_id: Uuid,
        draft: TransactionDraft,
    ) -> Result<TransactionOutcome, ServiceError> {
        if draft.amount <= Decimal::ZERO {
            return Err(ServiceError::InvalidArgument(
                "Amount must be greater than 0".to_string(),
            ));
        }
        if draft.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ServiceError::InvalidArgument(format!(
                "Description cannot exceed {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }

        let Some(mut user) = self.store.fetch_profile(user_id).await? else {
            return Ok(TransactionOutcome::UserNotFound);
        };

        let now = Utc::now();
        let transaction = UserTransaction {
            id: Uuid::new_v4(),
            user_id,
            amount: draft.amount,
            description: draft.description,
            kind: draft.kind,
            created_at: now,
        };

        user.balance += draft.kind.signed_effect(draft.amount);
        user.tier = AccountTier::for_balance(user.balance);
        user.updated_at = now;

        self.store.record_transaction(&user, &transaction).await?;
        tracing::info!(
            user_id = %user.id,
            kind = %transaction.kind,
            tier = %user.tier,
            "Transaction recorded."
        );
        Ok(TransactionOutcome::Added { user, transaction })
    }

    /// A user's transactions, newest first.
    pub async fn get_user_transactions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserTransaction>, ServiceError> {
        Ok(self.store.fetch_transactions(user_id).await?)
    }

    /// Computes the analytics snapshot over the full current profile and
    /// transaction sets. Recomputed fresh on every call; nothing is cached.
    pub async fn get_analytics(&self) -> Result<AnalyticsReport, ServiceError> {
        let profiles = self.store.fetch_all().await?;
        let transactions = self.store.fetch_all_transactions().await?;
        Ok(AnalyticsEngine::new().summarize(&profiles, &transactions))
    }
}

/// The validation rule shared by create and update: the name must contain at
/// least one non-whitespace character and fit the column width, and the
/// balance must be non-negative.
fn validate_profile(draft: &ProfileDraft) -> Result<(), ServiceError> {
    if draft.name.trim().is_empty() {
        return Err(ServiceError::InvalidArgument(
            "Name cannot be empty".to_string(),
        ));
    }
    if draft.name.chars().count() > MAX_NAME_LEN {
        return Err(ServiceError::InvalidArgument(format!(
            "Name cannot exceed {} characters",
            MAX_NAME_LEN
        )));
    }
    if draft.balance < Decimal::ZERO {
        return Err(ServiceError::InvalidArgument(
            "Balance cannot be negative".to_string(),
        ));
    }
    Ok(())
}
