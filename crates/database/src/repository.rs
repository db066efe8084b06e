use crate::error::DbError;
use crate::store::ProfileStore;
use async_trait::async_trait;
use core_types::{AccountTier, UserProfile, UserTransaction};
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the PostgreSQL database. It encapsulates all SQL queries and data
/// access logic behind the `ProfileStore` trait.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a `user_profiles` row to the domain struct.
///
/// Tiers are stored as their symbolic names; an unknown name means the row
/// was written by something other than this application.
fn profile_from_row(row: &PgRow) -> Result<UserProfile, DbError> {
    let tier: String = row.get("tier");
    Ok(UserProfile {
        id: row.get("id"),
        name: row.get("name"),
        age: row.get("age"),
        balance: row.get("balance"),
        tier: tier.parse().map_err(|e| DbError::Decode(format!("{}", e)))?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn transaction_from_row(row: &PgRow) -> Result<UserTransaction, DbError> {
    let kind: String = row.get("kind");
    Ok(UserTransaction {
        id: row.get("id"),
        user_id: row.get("user_id"),
        amount: row.get("amount"),
        description: row.get("description"),
        kind: kind.parse().map_err(|e| DbError::Decode(format!("{}", e)))?,
        created_at: row.get("created_at"),
    })
}

const PROFILE_COLUMNS: &str = "id, name, age, balance, tier, created_at, updated_at";
const TRANSACTION_COLUMNS: &str = "id, user_id, amount, description, kind, created_at";

#[async_trait]
impl ProfileStore for DbRepository {
    async fn insert_profile(&self, profile: &UserProfile) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (id, name, age, balance, tier, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(profile.id)
        .bind(&profile.name)
        .bind(profile.age)
        .bind(profile.balance)
        .bind(profile.tier.to_string())
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<UserProfile>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM user_profiles ORDER BY created_at ASC",
            PROFILE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(profile_from_row).collect()
    }

    async fn fetch_profile(&self, id: Uuid) -> Result<Option<UserProfile>, DbError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM user_profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(profile_from_row).transpose()
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<(), DbError> {
        sqlx::query(
            r#"
            UPDATE user_profiles
            SET name = $1, age = $2, balance = $3, tier = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&profile.name)
        .bind(profile.age)
        .bind(profile.balance)
        .bind(profile.tier.to_string())
        .bind(profile.updated_at)
        .bind(profile.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_profile(&self, id: Uuid) -> Result<(), DbError> {
        // Transactions go with the profile via ON DELETE CASCADE.
        sqlx::query("DELETE FROM user_profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<UserProfile>, DbError> {
        // position() gives case-sensitive containment without LIKE-escaping
        // the fragment.
        let rows = sqlx::query(&format!(
            "SELECT {} FROM user_profiles WHERE position($1 in name) > 0",
            PROFILE_COLUMNS
        ))
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(profile_from_row).collect()
    }

    async fn fetch_by_tier(&self, tier: AccountTier) -> Result<Vec<UserProfile>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM user_profiles WHERE tier = $1",
            PROFILE_COLUMNS
        ))
        .bind(tier.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(profile_from_row).collect()
    }

    async fn fetch_by_balance_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<UserProfile>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM user_profiles WHERE balance >= $1 AND balance <= $2 ORDER BY balance DESC",
            PROFILE_COLUMNS
        ))
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(profile_from_row).collect()
    }

    /// Persists the transaction and the owner's updated balance and tier
    /// within a single SQL transaction, so both commit or both roll back.
    async fn record_transaction(
        &self,
        profile: &UserProfile,
        transaction: &UserTransaction,
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO user_transactions (id, user_id, amount, description, kind, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(transaction.id)
        .bind(transaction.user_id)
        .bind(transaction.amount)
        .bind(&transaction.description)
        .bind(transaction.kind.to_string())
        .bind(transaction.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE user_profiles
            SET balance = $1, tier = $2, updated_at = $3
            WHERE id = $4
            "#,
        )
        .bind(profile.balance)
        .bind(profile.tier.to_string())
        .bind(profile.updated_at)
        .bind(profile.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn fetch_transactions(&self, user_id: Uuid) -> Result<Vec<UserTransaction>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM user_transactions WHERE user_id = $1 ORDER BY created_at DESC",
            TRANSACTION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(transaction_from_row).collect()
    }

    async fn fetch_all_transactions(&self) -> Result<Vec<UserTransaction>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM user_transactions",
            TRANSACTION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(transaction_from_row).collect()
    }
}
