//! Deposit/withdraw ledger processing.
//!
//! This module implements the core ledger functionality:
//! - Transaction model and creation input
//! - Storage ports (account store, sequence allocator)
//! - The transaction processor (authorize -> validate -> apply -> commit)
//! - Error taxonomy for ledger operations

pub mod error;
pub mod processor;
pub mod store;
pub mod transaction;

#[cfg(test)]
mod processor_props;

pub use error::LedgerError;
pub use processor::{TransactionProcessor, max_transaction_amount};
pub use store::{AccountStore, SaveError, SequenceAllocator, SequenceError, StoreError};
pub use transaction::{CreateTransactionInput, Transaction, TransactionKind};
