//! Field update resolver
//!
//! Maps requested field names onto the keys an entry actually has. Each
//! requested name resolves through the first rule that applies:
//!
//! 1. **Alias** - the name belongs (case-insensitively) to an alias group and
//!    one of the group's keys exists on the entry; the first existing member,
//!    in group order, is overwritten
//! 2. **Exact** - the entry has a key spelled exactly like the request
//! 3. **Lowercase** - the entry has the lowercased request as a key
//! 4. **Created** - a new key with the literal requested name is added
//!
//! Protected metadata keys are never written. A request that would resolve
//! onto one is reported as [`FieldResolution::Protected`] and skipped.

use crate::entry::{Entry, ProtectedFields};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Alias groups, each in overwrite-preference order
pub const ALIAS_GROUPS: &[&[&str]] = &[
    &["email", "contact"],
    &["company", "organization"],
    &["title", "heading", "name"],
    &["designation", "role", "position"],
    &["author", "writer"],
    &["description", "summary", "excerpt"],
];

/// How a requested field name was mapped onto the entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldResolution {
    /// Existing member of the request's alias group
    Alias,
    /// Existing key with identical spelling
    Exact,
    /// Existing key equal to the lowercased request
    Lowercase,
    /// New key with the requested name
    Created,
    /// Target is a protected metadata key; not written
    Protected,
    /// Entry is not a mapping; not written
    Unsupported,
}

impl FieldResolution {
    /// Whether the entry was written
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Alias | Self::Exact | Self::Lowercase | Self::Created)
    }
}

/// Resolution of one requested update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdateReport {
    /// Field name as requested
    pub requested: String,
    /// Entry key that was (or would have been) written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_key: Option<String>,
    /// Which rule produced the key
    pub resolution: FieldResolution,
}

/// Resolver with a configurable protected-field set
#[derive(Debug, Clone, Default)]
pub struct FieldResolver {
    protected: ProtectedFields,
}

impl FieldResolver {
    /// Create resolver with the default protected fields
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different protected-field set
    #[inline]
    #[must_use]
    pub fn with_protected(mut self, protected: ProtectedFields) -> Self {
        self.protected = protected;
        self
    }

    /// Pick the key a requested name maps onto, without writing
    #[must_use]
    pub fn resolve(&self, fields: &Map<String, Value>, requested: &str) -> (String, FieldResolution) {
        let (key, resolution) = Self::locate(fields, requested);
        if self.protected.contains(&key) {
            return (key, FieldResolution::Protected);
        }
        (key, resolution)
    }

    fn locate(fields: &Map<String, Value>, requested: &str) -> (String, FieldResolution) {
        let lowered = requested.to_lowercase();

        let alias_hit = ALIAS_GROUPS
            .iter()
            .find(|group| group.contains(&lowered.as_str()))
            .and_then(|group| group.iter().find(|member| fields.contains_key(**member)));
        if let Some(member) = alias_hit {
            return ((*member).to_string(), FieldResolution::Alias);
        }

        if fields.contains_key(requested) {
            return (requested.to_string(), FieldResolution::Exact);
        }
        if fields.contains_key(&lowered) {
            return (lowered, FieldResolution::Lowercase);
        }
        (requested.to_string(), FieldResolution::Created)
    }

    /// Apply every update in request order and report each resolution
    #[must_use]
    pub fn apply(
        &self,
        entry: &Entry,
        updates: &IndexMap<String, String>,
    ) -> (Entry, Vec<FieldUpdateReport>) {
        let Value::Object(original) = entry else {
            tracing::warn!(updates = updates.len(), "field updates on non-mapping entry ignored");
            let reports = updates
                .keys()
                .map(|requested| FieldUpdateReport {
                    requested: requested.clone(),
                    resolved_key: None,
                    resolution: FieldResolution::Unsupported,
                })
                .collect();
            return (entry.clone(), reports);
        };

        let mut fields = original.clone();
        let mut reports = Vec::with_capacity(updates.len());

        for (requested, value) in updates {
            let (key, resolution) = self.resolve(&fields, requested);
            if resolution.is_applied() {
                tracing::debug!(requested = %requested, key = %key, ?resolution, "field update");
                fields.insert(key.clone(), Value::String(value.clone()));
            } else {
                tracing::warn!(requested = %requested, key = %key, "refusing update to protected field");
            }
            reports.push(FieldUpdateReport {
                requested: requested.clone(),
                resolved_key: Some(key),
                resolution,
            });
        }

        (Value::Object(fields), reports)
    }
}

/// Apply named-field updates with the default protected fields
#[must_use]
pub fn apply_field_updates(entry: &Entry, updates: &IndexMap<String, String>) -> Entry {
    FieldResolver::new().apply(entry, updates).0
}

/// Apply named-field updates and report how each name resolved
#[must_use]
pub fn apply_field_updates_with_report(
    entry: &Entry,
    updates: &IndexMap<String, String>,
    protected: &ProtectedFields,
) -> (Entry, Vec<FieldUpdateReport>) {
    FieldResolver::new()
        .with_protected(protected.clone())
        .apply(entry, updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn updates(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn resolutions(entry: &Entry, pairs: &[(&str, &str)]) -> Vec<FieldResolution> {
        apply_field_updates_with_report(entry, &updates(pairs), &ProtectedFields::default())
            .1
            .into_iter()
            .map(|r| r.resolution)
            .collect()
    }

    #[test]
    fn alias_hits_existing_title() {
        let entry = json!({"title": "A"});
        let out = apply_field_updates(&entry, &updates(&[("heading", "B")]));
        assert_eq!(out, json!({"title": "B"}));
    }

    #[test]
    fn alias_prefers_group_order() {
        let entry = json!({"excerpt": "e", "summary": "s"});
        let out = apply_field_updates(&entry, &updates(&[("description", "d")]));
        assert_eq!(out, json!({"excerpt": "e", "summary": "d"}));
    }

    #[test]
    fn alias_match_is_case_insensitive() {
        let entry = json!({"writer": "John"});
        let out = apply_field_updates(&entry, &updates(&[("Author", "Jane")]));
        assert_eq!(out, json!({"writer": "Jane"}));
    }

    #[test]
    fn alias_group_without_members_falls_through() {
        let entry = json!({"Heading": "old"});
        // "heading" is in the title group, but no lowercase member exists
        let out = apply_field_updates(&entry, &updates(&[("Heading", "new")]));
        assert_eq!(out, json!({"Heading": "new"}));
        assert_eq!(resolutions(&entry, &[("Heading", "new")]), vec![FieldResolution::Exact]);
    }

    #[test]
    fn exact_then_lowercase_then_created() {
        let entry = json!({"Tagline": "t", "slug": "s"});
        let out = apply_field_updates(
            &entry,
            &updates(&[("Tagline", "T2"), ("SLUG", "s2"), ("Rating", "5")]),
        );
        assert_eq!(out, json!({"Tagline": "T2", "slug": "s2", "Rating": "5"}));
        assert_eq!(
            resolutions(&entry, &[("Tagline", "x"), ("SLUG", "x"), ("Rating", "x")]),
            vec![
                FieldResolution::Exact,
                FieldResolution::Lowercase,
                FieldResolution::Created
            ]
        );
    }

    #[test]
    fn protected_keys_are_refused() {
        let entry = json!({"uid": "e1", "locale": "en-us", "title": "A"});
        let (out, reports) = apply_field_updates_with_report(
            &entry,
            &updates(&[("uid", "hacked"), ("locale", "fr"), ("title", "B")]),
            &ProtectedFields::default(),
        );
        assert_eq!(out, json!({"uid": "e1", "locale": "en-us", "title": "B"}));
        assert_eq!(reports[0].resolution, FieldResolution::Protected);
        assert_eq!(reports[1].resolution, FieldResolution::Protected);
        assert_eq!(reports[2].resolution, FieldResolution::Alias);
    }

    #[test]
    fn custom_protected_set() {
        let entry = json!({"uid": "e1"});
        let (out, _) = apply_field_updates_with_report(
            &entry,
            &updates(&[("uid", "e2")]),
            &ProtectedFields::none(),
        );
        assert_eq!(out, json!({"uid": "e2"}));
    }

    #[test]
    fn later_updates_see_earlier_writes() {
        let entry = json!({});
        let out = apply_field_updates(&entry, &updates(&[("Rating", "4"), ("rating", "5")]));
        // "rating" has no exact key, but the lowercase rule does not apply either:
        // "Rating" was created, "rating" is a separate key
        assert_eq!(out, json!({"Rating": "4", "rating": "5"}));
    }

    #[test]
    fn non_mapping_entry_is_unchanged() {
        let entry = json!(["not", "a", "record"]);
        let (out, reports) = apply_field_updates_with_report(
            &entry,
            &updates(&[("title", "x")]),
            &ProtectedFields::default(),
        );
        assert_eq!(out, entry);
        assert_eq!(reports[0].resolution, FieldResolution::Unsupported);
        assert_eq!(reports[0].resolved_key, None);
    }

    #[test]
    fn report_wire_format() {
        let report = FieldUpdateReport {
            requested: "heading".to_string(),
            resolved_key: Some("title".to_string()),
            resolution: FieldResolution::Alias,
        };
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"requested": "heading", "resolvedKey": "title", "resolution": "alias"})
        );
    }
}
