//! Type-safe wrappers for AppBase identifiers.
//!
//! Wrapping every identifier in its own newtype keeps an owner id from being
//! passed where a namespace id is expected. All ids are opaque strings.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new id from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the inner String.
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

macro_rules! generated_id {
    ($(#[$doc:meta])* $name:ident) => {
        string_id!($(#[$doc])* $name);

        impl $name {
            /// Generates a fresh random id.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }
        }
    };
}

string_id!(
    /// Authenticated owner of one or more logical Databases. Opaque,
    /// supplied by the authentication collaborator.
    OwnerId
);

string_id!(
    /// Isolated physical storage namespace backing one logical Database.
    /// Globally unique, immutable once assigned.
    NamespaceId
);

string_id!(
    /// Identifier of an element in a screen's element tree.
    ElementId
);

string_id!(
    /// Identifier of a repeating container, used to key per-row bindings in
    /// an evaluation context.
    ContainerId
);

generated_id!(
    /// Identifier of a logical Database (the metadata entity, not the
    /// physical namespace).
    DatabaseId
);

generated_id!(
    /// Identifier of a table definition within a Database.
    TableId
);

generated_id!(
    /// Identifier of a column definition within a table.
    ColumnId
);

generated_id!(
    /// Identity of one stored record inside a table's container.
    RecordId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct_types() {
        let owner = OwnerId::new("owner-1");
        assert_eq!(owner.as_str(), "owner-1");
        assert_eq!(owner.to_string(), "owner-1");
        assert_eq!(OwnerId::from("owner-1"), owner);
    }

    #[test]
    fn test_generated_ids_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_serde_transparent() {
        let ns = NamespaceId::new("udb_abc12345_sales_123456");
        let json = serde_json::to_string(&ns).unwrap();
        assert_eq!(json, "\"udb_abc12345_sales_123456\"");
        let back: NamespaceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ns);
    }
}
