//! Bank account domain.
//!
//! - Account model with balance invariants
//! - Account number formatting backed by the shared sequence
//! - Account service (creation and owner-checked queries)

pub mod number;
pub mod service;
pub mod types;

pub use number::{ACCOUNT_PREFIX, AccountNumber, InvalidAccountNumber, SEQUENCE_LIMIT};
pub use service::{AccountDefaults, AccountService, CreateAccountInput};
pub use types::{Account, AccountType, SortCode};
