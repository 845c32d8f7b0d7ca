//! Account model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use osprey_shared::types::{AccountId, Currency, UserId};

use super::number::AccountNumber;
use crate::ledger::error::LedgerError;
use crate::ledger::transaction::Transaction;

/// High-level account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Personal current account.
    Personal,
    /// Business current account.
    Business,
}

/// Branch sort code, `NN-NN-NN` format.
///
/// The system is single-branch, so every account carries the configured
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortCode(String);

impl SortCode {
    /// Returns the sort code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SortCode {
    fn default() -> Self {
        Self("10-10-10".to_string())
    }
}

impl std::fmt::Display for SortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SortCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        let valid = parts.len() == 3
            && parts
                .iter()
                .all(|p| p.len() == 2 && p.bytes().all(|b| b.is_ascii_digit()));

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(format!("Invalid sort code: {s}"))
        }
    }
}

/// A bank account.
///
/// The balance invariant `balance >= 0` holds after every committed
/// mutation. `version` is the optimistic concurrency token: the store
/// advances it on every successful save and rejects writes whose expected
/// version no longer matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, assigned at creation.
    pub id: AccountId,
    /// Globally unique account number, immutable after creation.
    pub account_number: AccountNumber,
    /// Branch sort code.
    pub sort_code: SortCode,
    /// Display name from the create request.
    pub name: String,
    /// Personal or business.
    pub account_type: AccountType,
    /// The owning user, immutable.
    pub owner_id: UserId,
    /// Current balance, two fractional digits, never negative.
    pub balance: Decimal,
    /// Fixed at creation; all transactions must match it.
    pub currency: Currency,
    /// Set once when the account is created.
    pub created_at: DateTime<Utc>,
    /// Refreshed by the store on every successful save.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency token, advanced by the store.
    pub version: i64,
    /// Append-only transaction history, owned by the account.
    pub transactions: Vec<Transaction>,
}

impl Account {
    /// Adds the amount to the balance.
    pub fn deposit(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    /// Subtracts the amount from the balance.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` if the balance would go negative; the
    /// balance is left unchanged.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if self.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Appends a transaction to the account's history.
    pub fn record(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }
}
