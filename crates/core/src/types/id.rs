//! Opaque string IDs for type-safe entity references.
//!
//! Identifiers in this system are assigned by external services (the identity
//! provider assigns user IDs, the document store assigns item IDs), so they are
//! opaque strings rather than integers. Use the `define_id!` macro to create
//! wrappers that prevent accidentally mixing IDs from different sources.

/// Macro to define a type-safe opaque ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use pantry_tracker_core::define_id;
/// define_id!(UserId);
/// define_id!(ItemId);
///
/// let user_id = UserId::new("uid-1");
/// let item_id = ItemId::new("uid-1");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = item_id;
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

// User IDs come from the identity provider.
define_id!(UserId);
// Pantry item IDs come from the document store.
define_id!(ItemId);
// Raw document IDs, before they are interpreted as a specific entity.
define_id!(DocumentId);

impl From<DocumentId> for ItemId {
    fn from(id: DocumentId) -> Self {
        Self(id.0)
    }
}

impl From<ItemId> for DocumentId {
    fn from(id: ItemId) -> Self {
        Self(id.0)
    }
}
