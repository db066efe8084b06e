use crate::report::{AnalyticsReport, RecentTransaction};
use core_types::{TransactionType, UserProfile, UserTransaction};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

/// Number of users reported in the top-spender ranking.
const TOP_SPENDER_COUNT: usize = 5;
/// Number of entries reported in the recent-transaction feed.
const RECENT_TRANSACTION_COUNT: usize = 10;

/// A stateless calculator for deriving population statistics from the
/// current profile and transaction sets.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for computing the analytics snapshot.
    ///
    /// A pure function of its inputs: no side effects, no caching. An empty
    /// population yields a zeroed report with `None` extremes.
    pub fn summarize(
        &self,
        profiles: &[UserProfile],
        transactions: &[UserTransaction],
    ) -> AnalyticsReport {
        let mut report = AnalyticsReport::new();

        report.total_users = profiles.len();
        report.total_balance = profiles.iter().map(|p| p.balance).sum();

        if !profiles.is_empty() {
            report.average_balance = report.total_balance / Decimal::from(profiles.len());
        }

        for profile in profiles {
            *report.users_by_tier.entry(profile.tier).or_insert(0) += 1;

            // Strict comparisons keep the first profile encountered on ties.
            let is_highest = report
                .highest_balance_user
                .as_ref()
                .is_none_or(|current| profile.balance > current.balance);
            if is_highest {
                report.highest_balance_user = Some(profile.clone());
            }

            let is_lowest = report
                .lowest_balance_user
                .as_ref()
                .is_none_or(|current| profile.balance < current.balance);
            if is_lowest {
                report.lowest_balance_user = Some(profile.clone());
            }
        }

        report.top_spenders = self.rank_top_spenders(profiles, transactions);
        report.recent_transactions = self.collect_recent(profiles, transactions);

        report
    }

    /// Ranks all users descending by the sum of their `Expense`-typed
    /// transaction amounts and keeps the top five.
    ///
    /// Only `Expense` counts toward spending; `Transfer` debits the balance
    /// but is not treated as consumption here.
    fn rank_top_spenders(
        &self,
        profiles: &[UserProfile],
        transactions: &[UserTransaction],
    ) -> Vec<UserProfile> {
        let mut spent_by_user: HashMap<Uuid, Decimal> = HashMap::new();
        for transaction in transactions {
            if transaction.kind == TransactionType::Expense {
                *spent_by_user
                    .entry(transaction.user_id)
                    .or_insert(Decimal::ZERO) += transaction.amount;
            }
        }

        let total_spent = |profile: &UserProfile| {
            spent_by_user
                .get(&profile.id)
                .copied()
                .unwrap_or(Decimal::ZERO)
        };

        let mut ranked: Vec<&UserProfile> = profiles.iter().collect();
        // Stable sort, so ties keep their original encounter order.
        ranked.sort_by(|a, b| total_spent(b).cmp(&total_spent(a)));

        ranked
            .into_iter()
            .take(TOP_SPENDER_COUNT)
            .cloned()
            .collect()
    }

    /// Collects the ten most recently created transactions, annotating each
    /// with the owning user's display name.
    fn collect_recent(
        &self,
        profiles: &[UserProfile],
        transactions: &[UserTransaction],
    ) -> Vec<RecentTransaction> {
        let mut ordered: Vec<&UserTransaction> = transactions.iter().collect();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        ordered
            .into_iter()
            .take(RECENT_TRANSACTION_COUNT)
            .map(|transaction| {
                // A missing owner is a reference-integrity gap, not an error.
                let user_name = profiles
                    .iter()
                    .find(|p| p.id == transaction.user_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string());

                RecentTransaction {
                    user_name,
                    amount: transaction.amount,
                    kind: transaction.kind,
                    created_at: transaction.created_at,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use core_types::AccountTier;
    use rust_decimal_macros::dec;

    fn profile(name: &str, balance: Decimal) -> UserProfile {
        let now = Utc::now();
        UserProfile {
            id: Uuid::new_v4(),
            name: name.to_string(),
            age: None,
            balance,
            tier: AccountTier::for_balance(balance),
            created_at: now,
            updated_at: now,
        }
    }

    fn transaction(
        user_id: Uuid,
        amount: Decimal,
        kind: TransactionType,
        age_secs: i64,
    ) -> UserTransaction {
        UserTransaction {
            id: Uuid::new_v4(),
            user_id,
            amount,
            description: String::new(),
            kind,
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[test]
    fn empty_population_yields_zeroed_report() {
        let report = AnalyticsEngine::new().summarize(&[], &[]);

        assert_eq!(report.total_users, 0);
        assert_eq!(report.average_balance, Decimal::ZERO);
        assert_eq!(report.total_balance, Decimal::ZERO);
        assert!(report.highest_balance_user.is_none());
        assert!(report.lowest_balance_user.is_none());
        assert!(report.users_by_tier.is_empty());
        assert!(report.top_spenders.is_empty());
        assert!(report.recent_transactions.is_empty());
    }

    #[test]
    fn totals_and_tier_counts_cover_the_population() {
        let profiles = vec![
            profile("basic", dec!(100)),
            profile("silver", dec!(2000)),
            profile("gold", dec!(6000)),
        ];

        let report = AnalyticsEngine::new().summarize(&profiles, &[]);

        assert_eq!(report.total_users, 3);
        assert_eq!(report.total_balance, dec!(8100));
        assert_eq!(report.average_balance, dec!(2700));
        assert_eq!(report.users_by_tier.len(), 3);
        assert_eq!(report.users_by_tier[&AccountTier::Basic], 1);
        assert_eq!(report.users_by_tier[&AccountTier::Silver], 1);
        assert_eq!(report.users_by_tier[&AccountTier::Gold], 1);
        assert_eq!(report.highest_balance_user.unwrap().name, "gold");
        assert_eq!(report.lowest_balance_user.unwrap().name, "basic");
    }

    #[test]
    fn balance_ties_keep_the_first_profile_encountered() {
        let profiles = vec![profile("first", dec!(500)), profile("second", dec!(500))];

        let report = AnalyticsEngine::new().summarize(&profiles, &[]);

        assert_eq!(report.highest_balance_user.unwrap().name, "first");
        assert_eq!(report.lowest_balance_user.unwrap().name, "first");
    }

    #[test]
    fn top_spenders_rank_by_expense_only() {
        let profiles: Vec<UserProfile> = (0..6)
            .map(|i| profile(&format!("user-{}", i), dec!(1000)))
            .collect();

        let mut transactions = vec![
            transaction(profiles[0].id, dec!(50), TransactionType::Expense, 0),
            transaction(profiles[1].id, dec!(500), TransactionType::Expense, 0),
            transaction(profiles[1].id, dec!(100), TransactionType::Expense, 0),
            // Transfers debit the balance but do not count as spending.
            transaction(profiles[2].id, dec!(9000), TransactionType::Transfer, 0),
            transaction(profiles[3].id, dec!(9000), TransactionType::Income, 0),
        ];
        transactions.push(transaction(
            profiles[4].id,
            dec!(200),
            TransactionType::Expense,
            0,
        ));

        let report = AnalyticsEngine::new().summarize(&profiles, &transactions);

        assert_eq!(report.top_spenders.len(), 5);
        assert_eq!(report.top_spenders[0].name, "user-1");
        assert_eq!(report.top_spenders[1].name, "user-4");
        assert_eq!(report.top_spenders[2].name, "user-0");
    }

    #[test]
    fn recent_transactions_are_newest_first_and_capped() {
        let owner = profile("Ana", dec!(100));
        let transactions: Vec<UserTransaction> = (0..12)
            .map(|i| transaction(owner.id, dec!(1), TransactionType::Income, i))
            .collect();

        let profiles = vec![owner];
        let report = AnalyticsEngine::new().summarize(&profiles, &transactions);

        assert_eq!(report.recent_transactions.len(), 10);
        for pair in report.recent_transactions.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
        assert!(report.recent_transactions.iter().all(|t| t.user_name == "Ana"));
    }

    #[test]
    fn orphaned_transactions_are_annotated_as_unknown() {
        let transactions = vec![transaction(
            Uuid::new_v4(),
            dec!(10),
            TransactionType::Expense,
            0,
        )];

        let report = AnalyticsEngine::new().summarize(&[], &transactions);

        assert_eq!(report.recent_transactions.len(), 1);
        assert_eq!(report.recent_transactions[0].user_name, "Unknown");
    }
}
