//! Ledger transaction model.
//!
//! Transactions are created and persisted exactly once as part of a
//! successful processor run, and are immutable afterward.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use osprey_shared::types::{AccountId, Currency, TransactionId};

use super::error::LedgerError;

/// Kind of balance mutation a transaction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Adds the amount to the balance.
    Deposit,
    /// Subtracts the amount from the balance; requires sufficient funds.
    Withdraw,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Withdraw => write!(f, "withdraw"),
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "withdraw" => Ok(Self::Withdraw),
            other => Err(LedgerError::InvalidTransactionType(other.to_string())),
        }
    }
}

/// A committed deposit or withdrawal against an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, assigned at creation.
    pub id: TransactionId,
    /// The account this transaction was posted against.
    pub account_id: AccountId,
    /// Deposit or withdraw.
    pub kind: TransactionKind,
    /// Positive amount, bounded by the per-transaction limit.
    pub amount: Decimal,
    /// Equals the account currency at creation time.
    pub currency: Currency,
    /// Set at creation, immutable thereafter.
    pub timestamp: DateTime<Utc>,
    /// Caller-supplied label; not used for deduplication.
    pub reference: Option<String>,
}

impl Transaction {
    /// Builds a new transaction record stamped with the current time.
    #[must_use]
    pub fn new(account_id: AccountId, input: &CreateTransactionInput) -> Self {
        Self {
            id: TransactionId::new(),
            account_id,
            kind: input.kind,
            amount: input.amount,
            currency: input.currency,
            timestamp: Utc::now(),
            reference: input.reference.clone(),
        }
    }
}

/// Input for posting a single deposit/withdraw transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Deposit or withdraw.
    pub kind: TransactionKind,
    /// Requested amount.
    pub amount: Decimal,
    /// Must match the account currency.
    pub currency: Currency,
    /// Optional caller-supplied label.
    pub reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_kind_parse() {
        assert_eq!(
            TransactionKind::from_str("deposit").unwrap(),
            TransactionKind::Deposit
        );
        assert_eq!(
            TransactionKind::from_str("withdraw").unwrap(),
            TransactionKind::Withdraw
        );
    }

    #[test]
    fn test_kind_parse_rejects_unknown() {
        let err = TransactionKind::from_str("transfer").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransactionType(t) if t == "transfer"));
        // Case-sensitive, matching the wire format
        assert!(TransactionKind::from_str("Deposit").is_err());
    }

    #[test]
    fn test_new_transaction_copies_input() {
        let account_id = AccountId::new();
        let input = CreateTransactionInput {
            kind: TransactionKind::Deposit,
            amount: dec!(25.00),
            currency: Currency::Gbp,
            reference: Some("salary".to_string()),
        };

        let txn = Transaction::new(account_id, &input);
        assert_eq!(txn.account_id, account_id);
        assert_eq!(txn.kind, TransactionKind::Deposit);
        assert_eq!(txn.amount, dec!(25.00));
        assert_eq!(txn.currency, Currency::Gbp);
        assert_eq!(txn.reference.as_deref(), Some("salary"));
    }
}
