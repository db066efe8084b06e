use chrono::{DateTime, Utc};
use core_types::{AccountTier, TransactionType, UserProfile};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A point-in-time aggregate computed over all profiles and transactions.
///
/// This struct is the final output of the `AnalyticsEngine` and is never
/// persisted; it is recomputed fresh on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    // I. Population Totals
    pub total_users: usize,
    pub average_balance: Decimal,
    pub total_balance: Decimal,

    // II. Extremes
    pub highest_balance_user: Option<UserProfile>, // None for an empty population
    pub lowest_balance_user: Option<UserProfile>,  // None for an empty population

    // III. Groupings and Rankings
    /// Count of users per tier, covering only tiers actually present.
    pub users_by_tier: HashMap<AccountTier, usize>,
    /// Top 5 users ranked descending by cumulative expense amount.
    pub top_spenders: Vec<UserProfile>,

    // IV. Activity
    /// The 10 most recently created transactions, enriched with the owning
    /// user's display name.
    pub recent_transactions: Vec<RecentTransaction>,
}

/// A recent transaction annotated with the owning user's display name
/// (`"Unknown"` when the owner cannot be found).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentTransaction {
    pub user_name: String,
    pub amount: Decimal,
    pub kind: TransactionType,
    pub created_at: DateTime<Utc>,
}

impl AnalyticsReport {
    /// Creates a new, zeroed-out AnalyticsReport.
    /// This is the starting point before aggregation runs.
    pub fn new() -> Self {
        Self {
            total_users: 0,
            average_balance: Decimal::ZERO,
            total_balance: Decimal::ZERO,
            highest_balance_user: None,
            lowest_balance_user: None,
            users_by_tier: HashMap::new(),
            top_spenders: Vec::new(),
            recent_transactions: Vec::new(),
        }
    }
}

impl Default for AnalyticsReport {
    fn default() -> Self {
        Self::new()
    }
}
