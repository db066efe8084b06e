use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lower balance bound for the Silver tier (inclusive).
const SILVER_FLOOR: Decimal = dec!(1000);
/// Lower balance bound for the Gold tier (inclusive).
const GOLD_FLOOR: Decimal = dec!(5000);

/// The classification label derived from a profile's current balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountTier {
    Basic,
    Silver,
    Gold,
}

impl AccountTier {
    /// Classifies a balance into its tier.
    ///
    /// Total over all of `Decimal`, including negative balances, which fall
    /// into `Basic`. Boundaries are inclusive-lower: exactly 1000 is Silver
    /// and exactly 5000 is Gold.
    pub fn for_balance(balance: Decimal) -> Self {
        if balance < SILVER_FLOOR {
            AccountTier::Basic
        } else if balance < GOLD_FLOOR {
            AccountTier::Silver
        } else {
            AccountTier::Gold
        }
    }
}

impl fmt::Display for AccountTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountTier::Basic => "Basic",
            AccountTier::Silver => "Silver",
            AccountTier::Gold => "Gold",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for AccountTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Basic" => Ok(AccountTier::Basic),
            "Silver" => Ok(AccountTier::Silver),
            "Gold" => Ok(AccountTier::Gold),
            other => Err(CoreError::InvalidInput(
                "tier".to_string(),
                format!("unknown tier '{}'", other),
            )),
        }
    }
}

/// The kind of a balance-affecting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    /// Returns the signed effect this transaction kind has on a balance.
    ///
    /// `Income` credits the full amount. `Expense` debits it. `Transfer`
    /// currently debits exactly like `Expense`; a transfer between two
    /// profiles is not modeled yet.
    pub fn signed_effect(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::Income => amount,
            TransactionType::Expense | TransactionType::Transfer => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
            TransactionType::Transfer => "Transfer",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TransactionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Income" => Ok(TransactionType::Income),
            "Expense" => Ok(TransactionType::Expense),
            "Transfer" => Ok(TransactionType::Transfer),
            other => Err(CoreError::InvalidInput(
                "transaction type".to_string(),
                format!("unknown transaction type '{}'", other),
            )),
        }
    }
}
