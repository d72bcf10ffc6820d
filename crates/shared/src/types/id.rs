//! Typed IDs for remote drive objects.
//!
//! Backend identifiers are opaque strings. Wrapping them prevents passing a
//! `FileId` where a `FolderId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers around backend-issued strings.
macro_rules! remote_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a backend-issued identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

remote_id!(FolderId, "Identifier of a folder on the remote drive.");
remote_id!(FileId, "Identifier of a file on the remote drive.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_id_round_trips_string() {
        let id = FolderId::new("1AbC");
        assert_eq!(id.as_str(), "1AbC");
        assert_eq!(id.to_string(), "1AbC");
        assert_eq!(id.clone().into_inner(), "1AbC".to_string());
        assert_eq!(id, "1AbC");
    }

    #[test]
    fn test_remote_id_conversions() {
        let from_str: FileId = "f-1".into();
        let from_string: FileId = String::from("f-1").into();
        assert_eq!(from_str, from_string);
        assert_eq!(from_str.as_ref(), "f-1");
    }

    #[test]
    fn test_remote_id_serde_transparent() {
        let id = FileId::new("abc");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"abc\"");

        let back: FileId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
