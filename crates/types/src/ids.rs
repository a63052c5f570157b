//! Newtype wrappers for the string identifiers carried through layout.
//!
//! `FoId` is the `id` property of a formatting object (the target of named
//! destinations), `ResourceUri` the `src` of an external graphic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(value: impl Into<Arc<str>>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s.into())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.into())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// The `id` of a formatting object.
    FoId
);

string_id!(
    /// A URI for an external resource (images).
    ResourceUri
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_fo_id_creation() {
        let id1 = FoId::new("section-1");
        let id2 = FoId::from("section-1");
        let id3 = FoId::from(String::from("section-1"));

        assert_eq!(id1, id2);
        assert_eq!(id2, id3);
        assert_eq!(id1.as_str(), "section-1");
        assert_eq!(id1.to_string(), "section-1");
    }

    #[test]
    fn test_ids_deserialize_transparently() {
        let uri: ResourceUri = serde_json::from_str("\"images/logo.png\"").unwrap();
        assert_eq!(uri.as_str(), "images/logo.png");
    }

    #[test]
    fn test_hash_map_usage() {
        let mut pages = HashMap::new();
        pages.insert(FoId::new("intro"), 1);
        pages.insert(FoId::new("appendix"), 12);

        assert_eq!(pages.get(&FoId::new("appendix")), Some(&12));
    }
}
