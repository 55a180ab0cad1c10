//! Newtype IDs for type-safe entity references.
//!
//! The platform API identifies every record with an opaque string (`MongoDB`
//! object IDs for most collections, human-readable codes for game rooms).
//! Use the `define_id!` macro to wrap those strings so a deposit ID can never
//! be passed where a withdrawal ID is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use utpfund_core::define_id;
/// define_id!(DepositId);
/// define_id!(PayoutId);
///
/// let deposit = DepositId::new("665f1c2e9b");
/// let payout = PayoutId::new("665f1c2e9b");
///
/// assert_eq!(deposit.as_str(), payout.as_str());
/// // These are different types, so this won't compile:
/// // let _: DepositId = payout;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Standard entity IDs
define_id!(AdminId);
define_id!(UserId);
define_id!(DepositRequestId);
define_id!(WithdrawalId);
define_id!(TransactionId);
define_id!(RoomId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_is_raw_string() {
        let id = DepositRequestId::new("65a1f0c2d4");
        assert_eq!(id.to_string(), "65a1f0c2d4");
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = RoomId::new("NR-1042");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"NR-1042\"");

        let parsed: RoomId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_conversions() {
        let from_str: UserId = "abc".into();
        let from_string: UserId = String::from("abc").into();
        assert_eq!(from_str, from_string);
        assert_eq!(from_str.into_inner(), "abc");
    }
}
