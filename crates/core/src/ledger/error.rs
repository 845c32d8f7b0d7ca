//! Ledger error taxonomy.
//!
//! Every failure of the transaction processor, the account service, and the
//! sequence allocator is one of these variants. Callers branch exhaustively;
//! only `ConcurrentConflict` is retryable.

use rust_decimal::Decimal;
use thiserror::Error;

use osprey_shared::types::{Currency, UserId};

use crate::account::AccountNumber;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Lookup / Authorization Errors ==========
    /// No account exists with the given number.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountNumber),

    /// The caller does not own the account.
    #[error("User {user_id} does not own account {account_number}")]
    AccessDenied {
        /// The identity that made the request.
        user_id: UserId,
        /// The account the request targeted.
        account_number: AccountNumber,
    },

    // ========== Validation Errors ==========
    /// Transaction currency does not match the account currency.
    #[error("Transaction currency {requested} does not match account currency {account}")]
    CurrencyMismatch {
        /// The currency supplied with the transaction.
        requested: Currency,
        /// The currency the account is denominated in.
        account: Currency,
    },

    /// Transaction amount cannot be zero.
    #[error("Transaction amount cannot be zero")]
    ZeroAmount,

    /// Transaction amount cannot be negative.
    #[error("Transaction amount cannot be negative")]
    NegativeAmount,

    /// Transaction amount exceeds the per-transaction limit.
    #[error("Transaction amount {amount} exceeds the limit of {limit}")]
    AmountAboveLimit {
        /// The requested amount.
        amount: Decimal,
        /// The per-transaction limit.
        limit: Decimal,
    },

    /// The transaction type is neither deposit nor withdraw.
    #[error("Invalid transaction type: {0}")]
    InvalidTransactionType(String),

    // ========== Business Rule Errors ==========
    /// Withdrawal larger than the current balance.
    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Balance at the time of the attempt.
        balance: Decimal,
        /// The requested withdrawal amount.
        requested: Decimal,
    },

    /// The account number sequence has issued all 999,999 values.
    #[error("Account number sequence exhausted")]
    SequenceExhausted,

    // ========== Concurrency Errors ==========
    /// Another writer committed against the same base version first.
    #[error("Account updated by another transaction, please retry")]
    ConcurrentConflict {
        /// The version the write was based on.
        expected: i64,
        /// The version found in the store at commit time.
        actual: i64,
    },

    // ========== Store Errors ==========
    /// Unrecoverable persistence failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccessDenied { .. } => "ACCESS_DENIED",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AmountAboveLimit { .. } => "AMOUNT_ABOVE_LIMIT",
            Self::InvalidTransactionType(_) => "INVALID_TRANSACTION_TYPE",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::SequenceExhausted => "SEQUENCE_EXHAUSTED",
            Self::ConcurrentConflict { .. } => "CONCURRENT_CONFLICT",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::CurrencyMismatch { .. }
            | Self::ZeroAmount
            | Self::NegativeAmount
            | Self::AmountAboveLimit { .. }
            | Self::InvalidTransactionType(_) => 400,

            // 403 Forbidden - ownership errors
            Self::AccessDenied { .. } => 403,

            // 404 Not Found
            Self::AccountNotFound(_) => 404,

            // 409 Conflict - concurrency errors
            Self::ConcurrentConflict { .. } => 409,

            // 422 Unprocessable - business rule violations
            Self::InsufficientFunds { .. } => 422,

            // 500 Internal Server Error
            Self::SequenceExhausted | Self::Store(_) => 500,
        }
    }

    /// Returns true if re-invoking the same operation may succeed.
    ///
    /// Only optimistic-conflict failures qualify; every other kind fails
    /// identically on retry with the same arguments.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentConflict { .. })
    }
}
