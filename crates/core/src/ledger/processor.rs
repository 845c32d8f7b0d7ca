//! Ledger transaction processor.
//!
//! Executes the authorize -> validate -> apply -> commit state machine for a
//! single deposit/withdraw request. The processor performs exactly one
//! attempt per call and never retries internally: on `ConcurrentConflict`
//! the in-memory mutation is discarded whole and the caller re-invokes from
//! scratch against the now-current balance.

use std::sync::Arc;

use rust_decimal::Decimal;

use osprey_shared::types::{UserId, round_money};

use super::error::LedgerError;
use super::store::AccountStore;
use super::transaction::{CreateTransactionInput, Transaction, TransactionKind};
use crate::account::{Account, AccountNumber};

/// Per-transaction amount ceiling (10,000.00).
#[must_use]
pub fn max_transaction_amount() -> Decimal {
    Decimal::new(1_000_000, 2)
}

/// Validates the requested amount: positive and within the limit.
fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    if amount.is_sign_negative() {
        return Err(LedgerError::NegativeAmount);
    }
    let limit = max_transaction_amount();
    if amount > limit {
        return Err(LedgerError::AmountAboveLimit { amount, limit });
    }
    Ok(())
}

/// Processes deposit/withdraw transactions under optimistic concurrency
/// control.
///
/// The account row in the store is the only shared mutable state; there is
/// no per-account lock. Concurrency safety comes entirely from the version
/// check at commit time.
pub struct TransactionProcessor {
    store: Arc<dyn AccountStore>,
}

impl TransactionProcessor {
    /// Creates a new processor over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Posts a single transaction against an account.
    ///
    /// State machine (linear, no internal retry):
    /// 1. Fetch the account, capturing its current version
    /// 2. Authorize the caller against the account owner
    /// 3. Validate currency and amount
    /// 4. Apply the balance mutation in memory
    /// 5. Commit with a conditional save against the captured version
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account has the given number
    /// - `AccessDenied` if `owner_id` does not own the account
    /// - `CurrencyMismatch` if the transaction currency differs
    /// - `ZeroAmount` / `NegativeAmount` / `AmountAboveLimit` on bad amounts
    /// - `InsufficientFunds` on an overdraw attempt
    /// - `ConcurrentConflict` if another writer committed first (retryable)
    /// - `Store` on unrecoverable persistence failures
    pub async fn create_transaction(
        &self,
        account_number: &AccountNumber,
        owner_id: UserId,
        input: &CreateTransactionInput,
    ) -> Result<Transaction, LedgerError> {
        // Fetch, capturing the optimistic concurrency token
        let mut account = self
            .store
            .load(account_number)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.clone()))?;
        let base_version = account.version;

        // Authorize
        if account.owner_id != owner_id {
            return Err(LedgerError::AccessDenied {
                user_id: owner_id,
                account_number: account_number.clone(),
            });
        }

        // Validate
        if input.currency != account.currency {
            return Err(LedgerError::CurrencyMismatch {
                requested: input.currency,
                account: account.currency,
            });
        }
        // Amounts are currency-scaled to two fractional digits
        let input = CreateTransactionInput {
            amount: round_money(input.amount),
            ..input.clone()
        };
        validate_amount(input.amount)?;

        // Apply (in memory only, not yet durable)
        match input.kind {
            TransactionKind::Deposit => account.deposit(input.amount),
            TransactionKind::Withdraw => account.withdraw(input.amount)?,
        }

        // Persist the balance mutation and the transaction record as one
        // conditional write against the captured version
        let transaction = Transaction::new(account.id, &input);
        let transaction_id = transaction.id;
        account.record(transaction);

        let saved = self.store.save(account, base_version).await?;

        saved
            .transactions
            .iter()
            .rev()
            .find(|t| t.id == transaction_id)
            .cloned()
            .ok_or_else(|| {
                LedgerError::Store("committed account is missing the new transaction".to_string())
            })
    }
}
