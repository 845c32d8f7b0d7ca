//! Account number formatting and validation.
//!
//! Account numbers are `"01"` followed by a six-digit zero-padded sequence
//! value, e.g. `"01000042"`. The sequence is shared across all account
//! creations, so at most 999,999 accounts can ever be opened.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix for all account numbers.
pub const ACCOUNT_PREFIX: &str = "01";

/// Exclusive upper bound for sequence values. The allocation that would
/// reach this value fails with `SequenceExhausted`.
pub const SEQUENCE_LIMIT: u32 = 1_000_000;

/// A validated account number.
///
/// Globally unique and immutable once assigned at account creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

/// Error returned when parsing a malformed account number.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid account number: {0}")]
pub struct InvalidAccountNumber(pub String);

impl AccountNumber {
    /// Formats an account number from a sequence value.
    ///
    /// The caller must hold a value issued by the sequence allocator, which
    /// guarantees `1 <= sequence < SEQUENCE_LIMIT`.
    #[must_use]
    pub fn from_sequence(sequence: u32) -> Self {
        debug_assert!(sequence >= 1 && sequence < SEQUENCE_LIMIT);
        Self(format!("{ACCOUNT_PREFIX}{sequence:06}"))
    }

    /// Returns the account number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountNumber {
    type Err = InvalidAccountNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(ACCOUNT_PREFIX)
            .ok_or_else(|| InvalidAccountNumber(s.to_string()))?;

        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidAccountNumber(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }
}
