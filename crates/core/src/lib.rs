//! Core business logic for Osprey.
//!
//! This crate contains the banking ledger domain: account and transaction
//! models, the account-number sequence, and the transaction processor that
//! commits balance mutations under optimistic concurrency control.
//!
//! # Modules
//!
//! - `account` - Account model, account numbers, and account creation
//! - `ledger` - Deposit/withdraw processing, store ports, and error taxonomy

pub mod account;
pub mod ledger;
