//! Natural-language command parser
//!
//! Recognizes three surface patterns, each applied exhaustively over the
//! whole input:
//!
//! 1. `replace "<find>" with "<replace>"` → [`Operation::Replace`]
//! 2. `(set|update|change) <field> to "<value>"` → [`Operation::FieldUpdate`]
//! 3. `and <field> to "<value>"` (chained clause) → [`Operation::FieldUpdate`]
//!
//! Results are concatenated by pattern, not by position in the input: every
//! replace first, then every pattern-2 update, then every pattern-3 update.
//! Quoted values use matching straight single or double quotes and cannot
//! contain their own quote character.

use crate::operation::{Operation, ParsedCommand};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static REPLACE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\breplace\s+(?:"([^"]+)"|'([^']+)')\s+with\s+(?:"([^"]+)"|'([^']+)')"#)
        .expect("replace pattern is valid")
});

static SET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:set|update|change)\s+(\w+)\s+to\s+(?:"([^"]+)"|'([^']+)')"#)
        .expect("set pattern is valid")
});

static CHAINED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\band\s+(\w+)\s+to\s+(?:"([^"]+)"|'([^']+)')"#)
        .expect("chained pattern is valid")
});

/// Free-text command parser
///
/// Never fails: an instruction with no recognizable pattern yields an empty,
/// invalid [`ParsedCommand`] for the caller to reject.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandParser;

impl CommandParser {
    /// Create new parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse instruction into ordered operations
    #[must_use]
    pub fn parse(&self, input: &str) -> ParsedCommand {
        let mut operations = Vec::new();

        for caps in REPLACE_PATTERN.captures_iter(input) {
            let find = quoted(&caps, 1, 2);
            if find.is_empty() {
                continue;
            }
            let replace = quoted(&caps, 3, 4);
            operations.push(Operation::Replace {
                find_text: find.to_string(),
                replace_text: (!replace.is_empty()).then(|| replace.to_string()),
            });
        }

        for pattern in [&*SET_PATTERN, &*CHAINED_PATTERN] {
            for caps in pattern.captures_iter(input) {
                let field = caps.get(1).map_or("", |m| m.as_str().trim());
                if field.is_empty() {
                    continue;
                }
                let value = quoted(&caps, 2, 3);
                operations.push(Operation::FieldUpdate {
                    field_name: field.to_string(),
                    new_value: (!value.is_empty()).then(|| value.to_string()),
                });
            }
        }

        tracing::debug!(
            operations = operations.len(),
            "parsed command"
        );

        ParsedCommand::new(input, operations)
    }
}

/// Parse instruction with the default parser
#[inline]
#[must_use]
pub fn parse(input: &str) -> ParsedCommand {
    CommandParser::new().parse(input)
}

/// Trimmed text of whichever quote alternative matched
fn quoted<'a>(caps: &Captures<'a>, double: usize, single: usize) -> &'a str {
    caps.get(double)
        .or_else(|| caps.get(single))
        .map_or("", |m| m.as_str().trim())
}
