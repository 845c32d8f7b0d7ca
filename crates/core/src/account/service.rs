//! Account creation and owner-checked queries.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use osprey_shared::types::{AccountId, Currency, UserId};

use super::number::AccountNumber;
use super::types::{Account, AccountType, SortCode};
use crate::ledger::error::LedgerError;
use crate::ledger::store::{AccountStore, SequenceAllocator};

/// Creation-time defaults for new accounts, sourced from configuration.
#[derive(Debug, Clone)]
pub struct AccountDefaults {
    /// Currency new accounts are denominated in.
    pub currency: Currency,
    /// Sort code stamped on new accounts.
    pub sort_code: SortCode,
}

impl Default for AccountDefaults {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            sort_code: SortCode::default(),
        }
    }
}

/// Input for opening a new account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Display name for the account.
    pub name: String,
    /// Personal or business.
    pub account_type: AccountType,
}

/// Opens accounts and serves owner-checked reads.
///
/// Each creation draws one value from the sequence allocator; a creation
/// that fails after drawing does not return the value to the pool, so
/// account numbers stay unique without coordination.
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    allocator: Arc<dyn SequenceAllocator>,
    defaults: AccountDefaults,
}

impl AccountService {
    /// Creates a new account service.
    #[must_use]
    pub fn new(
        store: Arc<dyn AccountStore>,
        allocator: Arc<dyn SequenceAllocator>,
        defaults: AccountDefaults,
    ) -> Self {
        Self {
            store,
            allocator,
            defaults,
        }
    }

    /// Opens a new account for `owner_id` with a zero balance.
    ///
    /// # Errors
    ///
    /// - `SequenceExhausted` once all account numbers have been issued
    /// - `Store` if the insert fails (fatal; no conflict is possible on the
    ///   first insert of a fresh account number)
    pub async fn create_account(
        &self,
        owner_id: UserId,
        input: CreateAccountInput,
    ) -> Result<Account, LedgerError> {
        let sequence = self.allocator.next_value().await?;
        let account_number = AccountNumber::from_sequence(sequence);
        let now = Utc::now();

        let account = Account {
            id: AccountId::new(),
            account_number,
            sort_code: self.defaults.sort_code.clone(),
            name: input.name,
            account_type: input.account_type,
            owner_id,
            balance: Decimal::ZERO,
            currency: self.defaults.currency,
            created_at: now,
            updated_at: now,
            version: 0, // the store assigns the initial version on insert
            transactions: Vec::new(),
        };

        Ok(self.store.insert(account).await?)
    }

    /// Fetches a single account, verifying ownership.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account has the given number
    /// - `AccessDenied` if `owner_id` does not own the account
    pub async fn fetch_account(
        &self,
        account_number: &AccountNumber,
        owner_id: UserId,
    ) -> Result<Account, LedgerError> {
        let account = self
            .store
            .load(account_number)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.clone()))?;

        if account.owner_id != owner_id {
            return Err(LedgerError::AccessDenied {
                user_id: owner_id,
                account_number: account_number.clone(),
            });
        }

        Ok(account)
    }

    /// Lists the accounts owned by `owner_id`, ordered by account number.
    pub async fn list_accounts(&self, owner_id: UserId) -> Result<Vec<Account>, LedgerError> {
        Ok(self.store.list_by_owner(owner_id).await?)
    }
}
