use crate::error::DbError;
use async_trait::async_trait;
use core_types::{AccountTier, UserProfile, UserTransaction};
use rust_decimal::Decimal;
use uuid::Uuid;

/// The storage abstraction the profile service is written against.
///
/// Implementations must make `record_transaction` atomic: the transaction
/// insert and the profile update commit together or not at all. Read
/// operations return snapshot copies; callers never observe a view that
/// mutates under concurrent iteration.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Persists a freshly created profile.
    async fn insert_profile(&self, profile: &UserProfile) -> Result<(), DbError>;

    /// Returns a snapshot of all profiles in storage-defined order.
    async fn fetch_all(&self) -> Result<Vec<UserProfile>, DbError>;

    /// Looks up a single profile by exact id.
    async fn fetch_profile(&self, id: Uuid) -> Result<Option<UserProfile>, DbError>;

    /// Overwrites an existing profile's stored state.
    async fn update_profile(&self, profile: &UserProfile) -> Result<(), DbError>;

    /// Removes a profile and cascades removal of its transactions.
    async fn delete_profile(&self, id: Uuid) -> Result<(), DbError>;

    /// Case-sensitive substring search over display names. No ordering guarantee.
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<UserProfile>, DbError>;

    async fn fetch_by_tier(&self, tier: AccountTier) -> Result<Vec<UserProfile>, DbError>;

    /// Profiles with `min <= balance <= max`, ordered descending by balance.
    async fn fetch_by_balance_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<UserProfile>, DbError>;

    /// Persists a transaction together with its owner's updated balance and
    /// tier, as one atomic unit.
    async fn record_transaction(
        &self,
        profile: &UserProfile,
        transaction: &UserTransaction,
    ) -> Result<(), DbError>;

    /// A user's transactions, ordered by creation time descending.
    async fn fetch_transactions(&self, user_id: Uuid) -> Result<Vec<UserTransaction>, DbError>;

    /// Every transaction in storage; input to the analytics aggregation.
    async fn fetch_all_transactions(&self) -> Result<Vec<UserTransaction>, DbError>;
}
