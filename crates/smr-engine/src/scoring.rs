//! Confidence scorer for replacement suggestions
//!
//! A deterministic heuristic, not a probability. Starting from a base of 50,
//! independent checks add or subtract points and the total is clamped to
//! [`MIN_SCORE`, `MAX_SCORE`]:
//!
//! | Check | Points |
//! |-------|--------|
//! | differs from the find text (case-insensitive) | +15 |
//! | context contains the suggestion (case-insensitive) | +20 |
//! | same word count as the find text | +10 |
//! | same leading-capital status as the find text | +5 |
//! | proper-noun shape | +5 |
//! | length within 0.5x-2x of the find text | +5 |
//! | single character | -30 |
//! | per suggestion word found as a whole word in context | +3 |
//!
//! Suggestions shorter than two characters short-circuit to
//! [`SHORT_SUGGESTION_SCORE`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Lowest score ever returned
pub const MIN_SCORE: u8 = 15;

/// Highest score ever returned
pub const MAX_SCORE: u8 = 95;

/// Score for missing or sub-two-character suggestions
pub const SHORT_SUGGESTION_SCORE: u8 = 25;

const BASE: i32 = 50;

static PROPER_NOUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+").expect("proper noun pattern is valid"));

/// Score a suggested replacement for `find_text`
///
/// Pure and total: identical inputs always produce the same score.
#[must_use]
pub fn score(suggestion: Option<&str>, context: Option<&str>, find_text: &str) -> u8 {
    let Some(suggestion) = suggestion.filter(|s| s.chars().count() >= 2) else {
        return SHORT_SUGGESTION_SCORE;
    };

    let suggestion_len = suggestion.chars().count();
    let find_len = find_text.chars().count();
    let suggestion_lower = suggestion.to_lowercase();

    let mut total = BASE;

    if suggestion_lower != find_text.to_lowercase() {
        total += 15;
    }
    if context.is_some_and(|c| c.to_lowercase().contains(&suggestion_lower)) {
        total += 20;
    }
    if suggestion.split(' ').count() == find_text.split(' ').count() {
        total += 10;
    }
    if starts_upper(suggestion) == starts_upper(find_text) {
        total += 5;
    }
    if PROPER_NOUN.is_match(suggestion) {
        total += 5;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio_ok = {
        let (s, f) = (suggestion_len as f64, find_len as f64);
        s >= f * 0.5 && s <= f * 2.0
    };
    if ratio_ok {
        total += 5;
    }
    // Dead while the short-circuit threshold is two characters
    if suggestion_len == 1 {
        total -= 30;
    }
    if let Some(context) = context {
        total += 3 * word_overlap(&suggestion_lower, context);
    }

    let clamped = total.clamp(i32::from(MIN_SCORE), i32::from(MAX_SCORE));
    u8::try_from(clamped).unwrap_or(MAX_SCORE)
}

fn starts_upper(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_uppercase)
}

/// Count suggestion words present as whole words in `context`
fn word_overlap(suggestion_lower: &str, context: &str) -> i32 {
    let context_words: HashSet<String> = context
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    let hits = suggestion_lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !(c.is_alphanumeric() || c == '_')))
        .filter(|w| !w.is_empty() && context_words.contains(*w))
        .count();
    i32::try_from(hits).unwrap_or(i32::MAX / 4)
}
