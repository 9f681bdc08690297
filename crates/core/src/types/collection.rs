//! Document store collection paths.

use core::fmt;

use super::id::UserId;

/// Path of a collection in the document store, e.g. `users/{uid}/pantryItems`.
///
/// Paths are built through constructors so that every pantry item lands in
/// exactly one user's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// The pantry item namespace owned by `user`.
    #[must_use]
    pub fn pantry_items(user: &UserId) -> Self {
        Self(format!("users/{user}/pantryItems"))
    }

    /// The path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pantry_items_path() {
        let path = CollectionPath::pantry_items(&UserId::new("abc"));
        assert_eq!(path.as_str(), "users/abc/pantryItems");
    }

    #[test]
    fn test_users_get_distinct_namespaces() {
        let a = CollectionPath::pantry_items(&UserId::new("a"));
        let b = CollectionPath::pantry_items(&UserId::new("b"));
        assert_ne!(a, b);
    }
}
