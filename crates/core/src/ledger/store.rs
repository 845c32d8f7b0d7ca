//! Storage ports for accounts and the account-number sequence.
//!
//! The core never touches a storage backend directly; it talks to these
//! traits. Adapters (see `osprey-store`) implement them over whatever
//! backend they like, as long as `save` is a compare-and-swap on the
//! account version and `next_value` is a single atomic increment.

use async_trait::async_trait;
use thiserror::Error;

use osprey_shared::types::UserId;

use super::error::LedgerError;
use crate::account::{Account, AccountNumber};

/// Unrecoverable storage failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An account with this number already exists.
    #[error("Duplicate account number: {0}")]
    DuplicateAccountNumber(AccountNumber),

    /// Backend failure (connection loss, timeout, corruption).
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Failure modes of a conditional save.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The stored version no longer matches the version last read. This is
    /// the expected optimistic-conflict outcome, not an exceptional one.
    #[error("Version conflict: expected {expected}, stored {actual}")]
    VersionConflict {
        /// The version the write was based on.
        expected: i64,
        /// The version currently in the store.
        actual: i64,
    },

    /// Backend failure, fatal.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<SaveError> for LedgerError {
    fn from(err: SaveError) -> Self {
        match err {
            SaveError::VersionConflict { expected, actual } => {
                Self::ConcurrentConflict { expected, actual }
            }
            SaveError::Store(store) => store.into(),
        }
    }
}

/// Failure modes of sequence allocation.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// All 999,999 values have been issued.
    #[error("Account number sequence exhausted")]
    Exhausted,

    /// Backend failure, fatal.
    #[error("Sequence storage error: {0}")]
    Storage(String),
}

impl From<SequenceError> for LedgerError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::Exhausted => Self::SequenceExhausted,
            SequenceError::Storage(msg) => Self::Store(msg),
        }
    }
}

/// Durable keyed storage for accounts with optimistic concurrency control.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Loads an account by number, including its current version.
    async fn load(&self, number: &AccountNumber) -> Result<Option<Account>, StoreError>;

    /// Inserts a freshly created account.
    ///
    /// The store assigns the initial version. No conflict is possible on the
    /// first insert of a fresh account number; a duplicate number is a
    /// `StoreError`.
    async fn insert(&self, account: Account) -> Result<Account, StoreError>;

    /// Conditionally saves an account.
    ///
    /// Commits only if the stored version still equals `expected_version`,
    /// advancing the version by one and returning the saved state. Otherwise
    /// fails with `SaveError::VersionConflict` and leaves the stored account
    /// untouched.
    async fn save(&self, account: Account, expected_version: i64) -> Result<Account, SaveError>;

    /// Lists the accounts owned by a user, ordered by account number.
    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Account>, StoreError>;
}

/// Hands out unique, densely packed sequence values for account numbers.
#[async_trait]
pub trait SequenceAllocator: Send + Sync {
    /// Returns the next unused value in `[1, SEQUENCE_LIMIT)`.
    ///
    /// Safe under arbitrary concurrent callers: each call observes a
    /// distinct, monotonically increasing value. A caller that obtains a
    /// value and then fails does not return it to the pool.
    async fn next_value(&self) -> Result<u32, SequenceError>;
}
