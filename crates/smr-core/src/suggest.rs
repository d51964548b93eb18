//! Suggestion prompting
//!
//! Builds the prompt for an operation without a value and turns the
//! provider's reply into a usable replacement. Provider failures and blank
//! replies both degrade to [`Suggestion::Unavailable`]; they are never
//! errors.

use crate::collaborators::SuggestionProvider;
use smr_engine::{BrandStyleProfile, Operation};

/// Outcome of asking the provider for a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// Cleaned reply text
    Generated(String),
    /// No usable text
    Unavailable,
}

impl Suggestion {
    /// Suggested text, if any
    #[inline]
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Generated(text) => Some(text),
            Self::Unavailable => None,
        }
    }
}

/// Prompt asking for a single value for `operation`
#[must_use]
pub fn build_prompt(
    operation: &Operation,
    context: &str,
    profile: &BrandStyleProfile,
    max_context_chars: usize,
) -> String {
    let ask = match operation {
        Operation::Replace { find_text, .. } => {
            format!("Suggest one replacement for the text \"{find_text}\" that fits the content below.")
        }
        Operation::FieldUpdate { field_name, .. } => {
            format!("Suggest one new value for the field \"{field_name}\" that fits the content below.")
        }
    };
    let context: String = context.chars().take(max_context_chars).collect();

    format!(
        "{ask}\n\
         Brand style: {style}.\n\
         Reply with the replacement text only, without quotes or explanation.\n\
         \n\
         Content:\n\
         {context}",
        style = profile.describe(),
    )
}

/// Clean a raw provider reply
///
/// Takes the first non-blank line, trims it and strips one pair of
/// surrounding quotes. Returns `None` when nothing is left.
#[must_use]
pub fn clean_reply(reply: &str) -> Option<String> {
    let line = reply.lines().map(str::trim).find(|l| !l.is_empty())?;

    let stripped = [('"', '"'), ('\'', '\''), ('`', '`'), ('\u{201c}', '\u{201d}'), ('\u{2018}', '\u{2019}')]
        .iter()
        .find_map(|&(open, close)| {
            line.strip_prefix(open)
                .and_then(|rest| rest.strip_suffix(close))
        })
        .unwrap_or(line)
        .trim();

    (!stripped.is_empty()).then(|| stripped.to_string())
}

/// Ask the provider, degrading failures to [`Suggestion::Unavailable`]
pub async fn request_suggestion(provider: &dyn SuggestionProvider, prompt: &str) -> Suggestion {
    match provider.generate(prompt).await {
        Ok(reply) => match clean_reply(&reply) {
            Some(text) => Suggestion::Generated(text),
            None => {
                tracing::warn!("suggestion provider returned an empty reply");
                Suggestion::Unavailable
            }
        },
        Err(err) => {
            tracing::warn!(error = %err, "suggestion unavailable");
            Suggestion::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamError;
    use async_trait::async_trait;

    struct Fixed(Result<String, UpstreamError>);

    #[async_trait]
    impl SuggestionProvider for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<String, UpstreamError> {
            self.0.clone()
        }
    }

    #[test]
    fn prompt_mentions_target_and_style() {
        let prompt = build_prompt(
            &Operation::replace_unresolved("Acme"),
            "Acme makes widgets",
            &BrandStyleProfile::default(),
            2000,
        );
        assert!(prompt.contains("\"Acme\""));
        assert!(prompt.contains("formality 3/5"));
        assert!(prompt.ends_with("Acme makes widgets"));
    }

    #[test]
    fn prompt_truncates_context_on_char_boundary() {
        let context = "é".repeat(50);
        let prompt = build_prompt(
            &Operation::FieldUpdate {
                field_name: "title".into(),
                new_value: None,
            },
            &context,
            &BrandStyleProfile::default(),
            10,
        );
        assert!(prompt.contains("field \"title\""));
        assert!(prompt.ends_with(&"é".repeat(10)));
        assert!(!prompt.contains(&"é".repeat(11)));
    }

    #[test]
    fn clean_reply_strips_quotes_and_noise() {
        assert_eq!(clean_reply("  \"Globex\"  "), Some("Globex".to_string()));
        assert_eq!(clean_reply("'Globex Corp'"), Some("Globex Corp".to_string()));
        assert_eq!(clean_reply("\u{201c}Globex\u{201d}"), Some("Globex".to_string()));
        assert_eq!(clean_reply("\n\nGlobex\nbecause it fits"), Some("Globex".to_string()));
        assert_eq!(clean_reply("\"O'Neil"), Some("\"O'Neil".to_string()));
    }

    #[test]
    fn clean_reply_rejects_blank() {
        assert_eq!(clean_reply(""), None);
        assert_eq!(clean_reply("   \n  "), None);
        assert_eq!(clean_reply("\"\""), None);
    }

    #[tokio::test]
    async fn provider_failure_degrades() {
        let provider = Fixed(Err(UpstreamError::Provider("rate limited".into())));
        assert_eq!(request_suggestion(&provider, "p").await, Suggestion::Unavailable);

        let provider = Fixed(Ok("  ".into()));
        assert_eq!(request_suggestion(&provider, "p").await, Suggestion::Unavailable);

        let provider = Fixed(Ok("\"Globex\"".into()));
        assert_eq!(
            request_suggestion(&provider, "p").await.text(),
            Some("Globex")
        );
    }
}
