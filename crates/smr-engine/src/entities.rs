//! Entity pattern set
//!
//! Coarse heuristic matchers for emails, person names, company names and
//! hyperlink markup. These are intentionally not a named-entity recognizer:
//! false positives and negatives are acceptable for short marketing and
//! article copy. The [`EntityRecognizer`] trait is the seam for swapping in a
//! stronger classifier without touching the transformer.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\w.+-]+@[\w-]+(?:\.[\w-]+)*\.[A-Za-z]{2,}").expect("email pattern is valid")
});

static PERSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+ [A-Z][a-z]+\b").expect("person pattern is valid"));

static COMPANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[A-Z][A-Za-z]*\s+)+(?:Inc|Corp|LLC|Company|Ltd)\b")
        .expect("company pattern is valid")
});

static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#)
        .expect("link pattern is valid")
});

/// Kinds of text entity the transformer matches exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// `local@domain.tld`
    Email,
    /// Two capitalized words
    Person,
    /// Capitalized words ending in a legal suffix
    Company,
}

impl EntityKind {
    /// Kinds in the order the transformer applies them
    pub const ALL: [EntityKind; 3] = [EntityKind::Email, EntityKind::Person, EntityKind::Company];

    /// Human-readable name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Email => "email",
            EntityKind::Person => "person",
            EntityKind::Company => "company",
        }
    }
}

/// One anchor element found in text
///
/// All ranges are byte offsets into the searched string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// The whole `<a ...>...</a>` element
    pub element: Range<usize>,
    /// The `href` attribute value (without quotes)
    pub href: Range<usize>,
    /// The inner link text
    pub text: Range<usize>,
}

/// Source of entity and link spans
pub trait EntityRecognizer: Send + Sync + std::fmt::Debug {
    /// Non-overlapping spans of `kind` in `text`, in ascending order
    fn find(&self, kind: EntityKind, text: &str) -> Vec<Range<usize>>;

    /// Anchor elements in `text`, in ascending order
    fn links(&self, text: &str) -> Vec<LinkMatch>;
}

/// Regex heuristics for entities and links
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEntities;

impl HeuristicEntities {
    /// Create recognizer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn pattern(kind: EntityKind) -> &'static Regex {
        match kind {
            EntityKind::Email => &EMAIL,
            EntityKind::Person => &PERSON,
            EntityKind::Company => &COMPANY,
        }
    }
}

impl EntityRecognizer for HeuristicEntities {
    fn find(&self, kind: EntityKind, text: &str) -> Vec<Range<usize>> {
        Self::pattern(kind)
            .find_iter(text)
            .map(|m| m.range())
            .collect()
    }

    fn links(&self, text: &str) -> Vec<LinkMatch> {
        LINK.captures_iter(text)
            .filter_map(|caps| {
                Some(LinkMatch {
                    element: caps.get(0)?.range(),
                    href: caps.get(1)?.range(),
                    text: caps.get(2)?.range(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found<'a>(kind: EntityKind, text: &'a str) -> Vec<&'a str> {
        HeuristicEntities
            .find(kind, text)
            .into_iter()
            .map(|r| &text[r])
            .collect()
    }

    #[test]
    fn email_matches() {
        assert_eq!(
            found(EntityKind::Email, "Contact john.smith+news@mail.example.com today."),
            vec!["john.smith+news@mail.example.com"]
        );
        assert_eq!(found(EntityKind::Email, "ping john@x.com"), vec!["john@x.com"]);
    }

    #[test]
    fn email_requires_two_letter_tld() {
        assert!(found(EntityKind::Email, "user@host.c").is_empty());
        assert!(found(EntityKind::Email, "not an email @ all").is_empty());
    }

    #[test]
    fn person_matches_two_capitalized_words() {
        assert_eq!(
            found(EntityKind::Person, "Report by John Smith and jane doe"),
            vec!["John Smith"]
        );
        assert!(found(EntityKind::Person, "JOHN SMITH").is_empty());
        assert!(found(EntityKind::Person, "John  Smith").is_empty());
    }

    #[test]
    fn company_matches_suffix() {
        assert_eq!(found(EntityKind::Company, "We acquired Acme Widgets Inc last year"), vec![
            "Acme Widgets Inc"
        ]);
        assert_eq!(found(EntityKind::Company, "Globex Corp and Initech LLC"), vec![
            "Globex Corp",
            "Initech LLC"
        ]);
        assert!(found(EntityKind::Company, "acme inc").is_empty());
    }

    #[test]
    fn links_capture_href_and_text() {
        let text = r#"See <A class="x" HREF="/about-acme">About Acme</A> now"#;
        let links = HeuristicEntities.links(text);
        assert_eq!(links.len(), 1);
        assert_eq!(&text[links[0].href.clone()], "/about-acme");
        assert_eq!(&text[links[0].text.clone()], "About Acme");
        assert_eq!(&text[links[0].element.clone()], r#"<A class="x" HREF="/about-acme">About Acme</A>"#);
    }

    #[test]
    fn links_are_non_greedy() {
        let text = r#"<a href='/a'>A</a> and <a href="/b">B</a>"#;
        let links = HeuristicEntities.links(text);
        assert_eq!(links.len(), 2);
        assert_eq!(&text[links[1].text.clone()], "B");
    }

    #[test]
    fn kinds_order() {
        assert_eq!(EntityKind::ALL.map(|k| k.name()), ["email", "person", "company"]);
    }
}
