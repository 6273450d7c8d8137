//! Chain-agnostic 32-byte identities.
//!
//! Assets, price feeds, accounts, and credentials are all identified by
//! opaque 32-byte values assigned by the enclosing substrate. The engine
//! only ever compares them for equality.

use core::fmt;

macro_rules! byte_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; 32]);

        impl $name {
            /// Creates an identity from raw bytes.
            #[must_use]
            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Returns the underlying 32-byte representation.
            #[must_use]
            pub const fn as_bytes(&self) -> [u8; 32] {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for byte in &self.0[..4] {
                    write!(f, "{byte:02x}")?;
                }
                write!(f, "…")
            }
        }
    };
}

byte_id! {
    /// The identity of a pool asset (token type, mint, or contract address).
    AssetId
}

byte_id! {
    /// The identity of a price feed. Every reading consumed by the pool must
    /// originate from the feed registered for the asset.
    OracleId
}

byte_id! {
    /// The identity of an external account, e.g. the fee collector.
    AccountId
}

byte_id! {
    /// The opaque identity of a bearer credential. The pool stores the id
    /// and compares it against presented capability tokens; custody and
    /// uniqueness are the substrate's responsibility.
    CredentialId
}
