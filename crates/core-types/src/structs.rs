use crate::enums::{AccountTier, TransactionType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's financial account record.
///
/// The `tier` field is derived from `balance` and is never set
/// independently; every mutation that touches the balance re-derives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub age: Option<i32>,
    pub balance: Decimal,
    pub tier: AccountTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single balance-affecting event tied to one profile.
///
/// Transactions reference their owner by id only; the owning profile's
/// transaction list is reconstructed by query, not held as a back-pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub kind: TransactionType,
    pub created_at: DateTime<Utc>,
}
