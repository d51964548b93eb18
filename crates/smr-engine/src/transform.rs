//! Deep replacement transformer
//!
//! Recursively rewrites an [`Entry`] for one literal find/replace pair.
//!
//! # Traversal
//!
//! - Non-string scalars pass through unchanged
//! - Sequences are rewritten element-wise (order and length preserved)
//! - Mappings keep every key; protected keys are copied without descending
//! - Strings go through three passes, in order:
//!   1. case-insensitive literal substitution of every occurrence
//!   2. entity matches (email, person, company) equal to the find text
//!   3. anchor rewrites: href equal to the find text, or link text equal to
//!      it (with the href following along when it contains the find text)
//!
//! # Idempotence
//!
//! Text written by an earlier pass is never matched again by a later pass
//! within the same call, so a span is replaced at most once even when the
//! replacement itself contains the find text.

use crate::entities::{EntityKind, EntityRecognizer, HeuristicEntities, LinkMatch};
use crate::entry::{Entry, ProtectedFields};
use crate::error::ValidationError;
use regex::{NoExpand, Regex, RegexBuilder};
use serde_json::Value;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Recursive find/replace over entry trees
///
/// The find text is always escaped before compilation; arbitrary user input
/// can neither be interpreted as a pattern nor break the matcher.
#[derive(Clone)]
pub struct DeepReplacer {
    find: String,
    replace: String,
    literal: Regex,
    protected: ProtectedFields,
    recognizer: Arc<dyn EntityRecognizer>,
}

impl DeepReplacer {
    /// Create replacer for a find/replace pair
    ///
    /// # Errors
    /// - `EmptyFindText` if `find` is empty
    /// - `FindTextTooLong` if the escaped pattern exceeds matcher limits
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Result<Self, ValidationError> {
        let find = find.into();
        if find.is_empty() {
            return Err(ValidationError::EmptyFindText);
        }

        let literal = RegexBuilder::new(&regex::escape(&find))
            .case_insensitive(true)
            .build()
            .map_err(|_| ValidationError::FindTextTooLong(find.len()))?;

        Ok(Self {
            find,
            replace: replace.into(),
            literal,
            protected: ProtectedFields::default(),
            recognizer: Arc::new(HeuristicEntities),
        })
    }

    /// Use a different protected-field set
    #[inline]
    #[must_use]
    pub fn with_protected(mut self, protected: ProtectedFields) -> Self {
        self.protected = protected;
        self
    }

    /// Use a different entity recognizer
    #[inline]
    #[must_use]
    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    /// Find text
    #[inline]
    #[must_use]
    pub fn find(&self) -> &str {
        &self.find
    }

    /// Replacement text
    #[inline]
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replace
    }

    /// Rewrite an entry tree, returning the new tree
    #[must_use]
    pub fn apply(&self, entry: &Entry) -> Entry {
        match entry {
            Value::String(s) => Value::String(self.rewrite(s)),
            Value::Array(items) => Value::Array(items.iter().map(|item| self.apply(item)).collect()),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, child)| {
                        let child = if self.protected.contains(key) {
                            child.clone()
                        } else {
                            self.apply(child)
                        };
                        (key.clone(), child)
                    })
                    .collect(),
            ),
            scalar => scalar.clone(),
        }
    }

    /// Rewrite a single string through all three passes
    #[must_use]
    pub fn rewrite(&self, text: &str) -> String {
        // Passes 2 and 3 need an exact occurrence, which implies a
        // case-insensitive one.
        if !self.literal.is_match(text) {
            return text.to_owned();
        }

        let mut rewrite = self.literal_pass(text);
        self.entity_pass(&mut rewrite);
        self.link_pass(&mut rewrite);
        rewrite.text
    }

    fn literal_pass(&self, text: &str) -> Rewrite {
        let mut out = String::with_capacity(text.len());
        let mut written = Vec::new();
        let mut last = 0;

        for m in self.literal.find_iter(text) {
            out.push_str(&text[last..m.start()]);
            let start = out.len();
            out.push_str(&self.replace);
            written.push(start..out.len());
            last = m.end();
        }
        out.push_str(&text[last..]);

        Rewrite { text: out, written }
    }

    fn entity_pass(&self, rewrite: &mut Rewrite) {
        for kind in EntityKind::ALL {
            let spans = self.recognizer.find(kind, &rewrite.text);
            // Back to front so earlier spans stay valid
            for span in spans.into_iter().rev() {
                if rewrite.text[span.clone()] == self.find && !rewrite.touches_written(&span) {
                    rewrite.splice(span, &self.replace);
                }
            }
        }
    }

    fn link_pass(&self, rewrite: &mut Rewrite) {
        let links = self.recognizer.links(&rewrite.text);
        for LinkMatch { href, text, .. } in links.into_iter().rev() {
            let href_value = rewrite.text[href.clone()].to_owned();

            if href_value == self.find {
                if !rewrite.touches_written(&href) {
                    rewrite.splice(href, &self.replace);
                }
            } else if rewrite.text[text.clone()] == self.find && !rewrite.touches_written(&text) {
                // Text follows href, so splicing it first keeps `href` valid
                rewrite.splice(text, &self.replace);

                let tracks_label = href_value
                    .to_lowercase()
                    .contains(&self.find.to_lowercase());
                if tracks_label && !rewrite.touches_written(&href) {
                    let renamed = self
                        .literal
                        .replace_all(&href_value, NoExpand(&self.replace))
                        .into_owned();
                    rewrite.splice(href, &renamed);
                }
            }
        }
    }
}

impl fmt::Debug for DeepReplacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepReplacer")
            .field("find", &self.find)
            .field("replace", &self.replace)
            .field("protected", &self.protected)
            .field("recognizer", &self.recognizer)
            .finish()
    }
}

/// Replace `find` with `replace` across an entry with default settings
///
/// # Errors
/// `EmptyFindText` if `find` is empty
pub fn deep_replace(entry: &Entry, find: &str, replace: &str) -> Result<Entry, ValidationError> {
    let replacer = DeepReplacer::new(find, replace)?;
    tracing::debug!(find_len = find.len(), replace_len = replace.len(), "deep replace");
    Ok(replacer.apply(entry))
}

/// String under rewrite plus the byte ranges already written
#[derive(Debug)]
struct Rewrite {
    text: String,
    written: Vec<Range<usize>>,
}

impl Rewrite {
    fn unwritten(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            written: Vec::new(),
        }
    }

    fn touches_written(&self, range: &Range<usize>) -> bool {
        self.written
            .iter()
            .any(|w| w.start < range.end && range.start < w.end)
    }

    fn splice(&mut self, range: Range<usize>, with: &str) {
        let removed = range.end - range.start;
        for w in &mut self.written {
            if w.start >= range.end {
                w.start = w.start - removed + with.len();
                w.end = w.end - removed + with.len();
            }
        }
        self.text.replace_range(range.clone(), with);
        self.written.push(range.start..range.start + with.len());
    }
}
