//! In-memory store implementations.
//!
//! The account map sits behind a single `RwLock`; `save` takes the write
//! guard for the whole compare-and-swap, so version checks and replacements
//! are atomic with respect to every other writer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use osprey_core::account::{Account, AccountNumber, SEQUENCE_LIMIT};
use osprey_core::ledger::{
    AccountStore, SaveError, SequenceAllocator, SequenceError, StoreError,
};
use osprey_shared::types::UserId;

/// Version assigned to an account on first insert.
const INITIAL_VERSION: i64 = 1;

/// In-memory account store with optimistic concurrency control.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<AccountNumber, Account>>,
}

impl InMemoryAccountStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn load(&self, number: &AccountNumber) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(number).cloned())
    }

    async fn insert(&self, mut account: Account) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.account_number) {
            return Err(StoreError::DuplicateAccountNumber(
                account.account_number.clone(),
            ));
        }

        account.version = INITIAL_VERSION;
        accounts.insert(account.account_number.clone(), account.clone());
        debug!(account_number = %account.account_number, "Account inserted");
        Ok(account)
    }

    async fn save(&self, mut account: Account, expected_version: i64) -> Result<Account, SaveError> {
        let mut accounts = self.accounts.write().await;

        let stored = accounts.get(&account.account_number).ok_or_else(|| {
            SaveError::Store(StoreError::Backend(format!(
                "account {} vanished from store",
                account.account_number
            )))
        })?;

        if stored.version != expected_version {
            debug!(
                account_number = %account.account_number,
                expected = expected_version,
                actual = stored.version,
                "Optimistic save rejected"
            );
            return Err(SaveError::VersionConflict {
                expected: expected_version,
                actual: stored.version,
            });
        }

        account.version = expected_version + 1;
        account.updated_at = Utc::now();
        accounts.insert(account.account_number.clone(), account.clone());
        debug!(
            account_number = %account.account_number,
            version = account.version,
            "Account saved"
        );
        Ok(account)
    }

    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Account>, StoreError> {
        let mut owned: Vec<Account> = self
            .accounts
            .read()
            .await
            .values()
            .filter(|account| account.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.account_number.as_str().cmp(b.account_number.as_str()));
        Ok(owned)
    }
}

/// Atomic sequence allocator for account numbers.
///
/// `next_value` is a single atomic read-modify-write: concurrent callers
/// each observe a distinct value and the counter never moves backwards.
#[derive(Debug)]
pub struct InMemorySequence {
    next: AtomicU32,
}

impl InMemorySequence {
    /// Creates an allocator starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates an allocator whose next issued value is `next`.
    ///
    /// Values below 1 are clamped so the allocator stays inside the valid
    /// sequence range.
    #[must_use]
    pub fn starting_at(next: u32) -> Self {
        Self {
            next: AtomicU32::new(next.max(1)),
        }
    }
}

impl Default for InMemorySequence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SequenceAllocator for InMemorySequence {
    async fn next_value(&self) -> Result<u32, SequenceError> {
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < SEQUENCE_LIMIT).then_some(n + 1)
            })
            .map_err(|_| SequenceError::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use osprey_core::account::{AccountType, SortCode};
    use osprey_shared::types::{AccountId, Currency};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn test_account(sequence: u32, owner_id: UserId) -> Account {
        Account {
            id: AccountId::new(),
            account_number: AccountNumber::from_sequence(sequence),
            sort_code: SortCode::default(),
            name: "Store Test".to_string(),
            account_type: AccountType::Personal,
            owner_id,
            balance: Decimal::ZERO,
            currency: Currency::Gbp,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 0,
            transactions: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_initial_version() {
        let store = InMemoryAccountStore::new();
        let inserted = store
            .insert(test_account(1, UserId::new()))
            .await
            .unwrap();
        assert_eq!(inserted.version, INITIAL_VERSION);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_number() {
        let store = InMemoryAccountStore::new();
        store.insert(test_account(1, UserId::new())).await.unwrap();

        let err = store
            .insert(test_account(1, UserId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateAccountNumber(_)));
    }

    #[tokio::test]
    async fn test_save_advances_version_and_updated_at() {
        let store = InMemoryAccountStore::new();
        let inserted = store
            .insert(test_account(1, UserId::new()))
            .await
            .unwrap();

        let mut modified = inserted.clone();
        modified.balance = dec!(10.00);
        let saved = store.save(modified, inserted.version).await.unwrap();

        assert_eq!(saved.version, inserted.version + 1);
        assert_eq!(saved.balance, dec!(10.00));
        assert!(saved.updated_at >= inserted.updated_at);
    }

    #[tokio::test]
    async fn test_stale_save_conflicts_and_leaves_store_untouched() {
        let store = InMemoryAccountStore::new();
        let inserted = store
            .insert(test_account(1, UserId::new()))
            .await
            .unwrap();

        // First writer wins
        let mut first = inserted.clone();
        first.balance = dec!(10.00);
        store.save(first, inserted.version).await.unwrap();

        // Second writer based on the stale version loses
        let mut second = inserted.clone();
        second.balance = dec!(99.00);
        let err = store.save(second, inserted.version).await.unwrap_err();
        assert!(matches!(
            err,
            SaveError::VersionConflict {
                expected: 1,
                actual: 2,
            }
        ));

        let stored = store
            .load(&inserted.account_number)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.balance, dec!(10.00));
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn test_list_by_owner_is_ordered_and_filtered() {
        let store = InMemoryAccountStore::new();
        let owner = UserId::new();
        store.insert(test_account(3, owner)).await.unwrap();
        store.insert(test_account(1, owner)).await.unwrap();
        store.insert(test_account(2, UserId::new())).await.unwrap();

        let owned = store.list_by_owner(owner).await.unwrap();
        let numbers: Vec<&str> = owned.iter().map(|a| a.account_number.as_str()).collect();
        assert_eq!(numbers, vec!["01000001", "01000003"]);
    }

    #[tokio::test]
    async fn test_sequence_issues_increasing_values() {
        let sequence = InMemorySequence::new();
        assert_eq!(sequence.next_value().await.unwrap(), 1);
        assert_eq!(sequence.next_value().await.unwrap(), 2);
        assert_eq!(sequence.next_value().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_sequence_start_clamped_to_one() {
        let sequence = InMemorySequence::starting_at(0);
        assert_eq!(sequence.next_value().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sequence_exhaustion() {
        let sequence = InMemorySequence::starting_at(999_999);
        assert_eq!(sequence.next_value().await.unwrap(), 999_999);

        let err = sequence.next_value().await.unwrap_err();
        assert!(matches!(err, SequenceError::Exhausted));
        // Stays exhausted
        assert!(sequence.next_value().await.is_err());
    }
}
