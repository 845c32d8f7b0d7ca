//! Storage adapters for Osprey.
//!
//! Implements the `osprey-core` store ports for a single logical store with
//! in-process concurrent callers: a versioned account store whose save is a
//! compare-and-swap on the account version, and an atomic sequence
//! allocator for account numbers.

pub mod memory;

pub use memory::{InMemoryAccountStore, InMemorySequence};
