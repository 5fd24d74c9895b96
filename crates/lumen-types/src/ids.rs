//! Type-safe identifier wrappers around monotonic counters.
//!
//! Ripple records are identified by a per-kind counter that only ever moves
//! forward. Wrapping the raw integer prevents mixing identifiers of different
//! entities at compile time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around a `u64` counter value with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u64);

        impl $name {
            /// The first identifier handed out by a fresh counter.
            pub const FIRST: Self = Self(0);

            /// Return the identifier that follows this one, or `None` if the
            /// counter is exhausted.
            pub const fn next(self) -> Option<Self> {
                match self.0.checked_add(1) {
                    Some(raw) => Some(Self(raw)),
                    None => None,
                }
            }

            /// Return the inner counter value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a ripple record, unique within its [`RippleKind`].
    ///
    /// [`RippleKind`]: crate::enums::RippleKind
    RippleId
}
