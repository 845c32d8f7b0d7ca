//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `UserId` where an
//! `AccountId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a typed ID wrapper around a UUID.
macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Mints a fresh id. UUID v7, so ids sort by creation time.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

typed_id! {
    /// Unique identifier for a user (the account owner).
    UserId
}

typed_id! {
    /// Unique identifier for a bank account.
    AccountId
}

typed_id! {
    /// Unique identifier for a ledger transaction.
    TransactionId
}
