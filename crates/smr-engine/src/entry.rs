//! Entry content trees and protected metadata fields
//!
//! An [`Entry`] is one content record: a JSON-shaped tree of strings,
//! numbers, booleans, nulls, sequences and mappings. Using an owned
//! `serde_json::Value` makes the tree shape a type-level guarantee, so the
//! recursive walks in this crate need no cycle guard.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// One content record, fetched fresh per request
pub type Entry = Value;

/// Identity, version and audit keys that content rewrites never touch
pub const DEFAULT_PROTECTED_FIELDS: &[&str] = &[
    "uid",
    "_version",
    "locale",
    "created_at",
    "updated_at",
    "created_by",
    "updated_by",
    "publish_details",
    "ACL",
    "_in_progress",
];

/// Set of protected metadata key names
///
/// Matching is by exact, case-sensitive key name. The value type under a
/// protected key is irrelevant: the whole subtree is copied untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtectedFields(BTreeSet<String>);

impl ProtectedFields {
    /// Create from key names
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    /// Empty set (every key is rewritable)
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Check whether a key is protected
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    /// Add a key to the set
    #[must_use]
    pub fn with(mut self, key: impl Into<String>) -> Self {
        self.0.insert(key.into());
        self
    }

    /// Iterate protected key names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of protected keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no key is protected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ProtectedFields {
    fn default() -> Self {
        Self::new(DEFAULT_PROTECTED_FIELDS.iter().copied())
    }
}

/// Concatenate every string leaf outside protected fields
///
/// Leaves are joined with single spaces in traversal order. Used as the
/// surrounding context when scoring and prompting for suggestions.
#[must_use]
pub fn collect_text(entry: &Entry, protected: &ProtectedFields) -> String {
    let mut parts = Vec::new();
    collect_into(entry, protected, &mut parts);
    parts.join(" ")
}

fn collect_into<'a>(value: &'a Value, protected: &ProtectedFields, parts: &mut Vec<&'a str>) {
    match value {
        Value::String(s) if !s.trim().is_empty() => parts.push(s),
        Value::Array(items) => {
            for item in items {
                collect_into(item, protected, parts);
            }
        }
        Value::Object(map) => {
            for (key, child) in map {
                if !protected.contains(key) {
                    collect_into(child, protected, parts);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_protects_identity_keys() {
        let protected = ProtectedFields::default();
        assert!(protected.contains("uid"));
        assert!(protected.contains("_version"));
        assert!(protected.contains("publish_details"));
        assert!(!protected.contains("title"));
    }

    #[test]
    fn protection_is_case_sensitive() {
        let protected = ProtectedFields::default();
        assert!(protected.contains("ACL"));
        assert!(!protected.contains("acl"));
        assert!(!protected.contains("UID"));
    }

    #[test]
    fn custom_set() {
        let protected = ProtectedFields::none().with("id").with("rev");
        assert_eq!(protected.len(), 2);
        assert!(protected.contains("rev"));
        assert!(!protected.contains("uid"));
    }

    #[test]
    fn deserializes_from_list() {
        let protected: ProtectedFields = serde_json::from_value(json!(["sys", "uid"])).unwrap();
        assert_eq!(protected.iter().collect::<Vec<_>>(), vec!["sys", "uid"]);
    }

    #[test]
    fn collect_text_skips_protected_and_scalars() {
        let entry = json!({
            "uid": "blt123",
            "title": "Hello",
            "count": 4,
            "blocks": [{"body": "World"}, {"body": "  "}],
            "created_by": "admin",
        });
        assert_eq!(collect_text(&entry, &ProtectedFields::default()), "Hello World");
    }
}
