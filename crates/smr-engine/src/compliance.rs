//! Brand compliance validation
//!
//! A coarse keyword gate comparing candidate text with a numeric
//! [`BrandStyleProfile`]. Text of three words or fewer is exempt; longer text
//! earns one point per matching style signal and passes with two or more:
//!
//! - formal brand (`formality_level > 3`) and a politeness marker
//! - casual brand (`formality_level <= 2`) and a casual marker
//! - measured tone (`tone == 2`) and neither `!` nor `?`
//! - playful brand (`humor_level > 3`) and a levity marker
//! - complex brand (`complexity_level > 3`) and more than ten words
//!
//! The gate sits behind [`ComplianceValidator`] so a stronger classifier can
//! replace [`HeuristicComplianceValidator`] without touching callers.

use crate::error::{ComplianceError, ValidationError};
use serde::{Deserialize, Serialize};

/// Word count at or below which text is accepted unconditionally
pub const EXEMPT_WORD_COUNT: usize = 3;

/// Style points needed to pass
pub const PASSING_SCORE: u32 = 2;

const POLITE_MARKERS: &[&str] = &[
    "please",
    "thank you",
    "thanks",
    "kindly",
    "regards",
    "sincerely",
    "appreciate",
];

const CASUAL_MARKERS: &[&str] = &[
    "hey", "hi", "gonna", "wanna", "cool", "awesome", "yeah", "stuff", "folks",
];

const LEVITY_MARKERS: &[&str] = &["fun", "funny", "haha", "lol", "joke", "wink", "silly", "playful"];

/// Numeric brand voice, loaded once per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandStyleProfile {
    /// 1 (casual) to 5 (formal)
    pub formality_level: u8,
    /// Tone selector; 2 is the measured, non-exclamatory tone
    pub tone: i32,
    /// 1 (serious) to 5 (playful)
    pub humor_level: u8,
    /// 1 (plain) to 5 (elaborate)
    pub complexity_level: u8,
}

impl Default for BrandStyleProfile {
    fn default() -> Self {
        Self {
            formality_level: 3,
            tone: 1,
            humor_level: 3,
            complexity_level: 3,
        }
    }
}

impl BrandStyleProfile {
    /// Create profile from its four levels
    #[inline]
    #[must_use]
    pub fn new(formality_level: u8, tone: i32, humor_level: u8, complexity_level: u8) -> Self {
        Self {
            formality_level,
            tone,
            humor_level,
            complexity_level,
        }
    }

    /// Check the 1..=5 levels
    ///
    /// # Errors
    /// `OutOfRange` naming the first level outside 1..=5
    pub fn check(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("formality_level", self.formality_level),
            ("humor_level", self.humor_level),
            ("complexity_level", self.complexity_level),
        ] {
            if !(1..=5).contains(&value) {
                return Err(ValidationError::out_of_range(field, i64::from(value), 1, 5));
            }
        }
        Ok(())
    }

    /// One-line description for suggestion prompts
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "formality {}/5, tone {}, humor {}/5, complexity {}/5",
            self.formality_level, self.tone, self.humor_level, self.complexity_level
        )
    }
}

/// Accept/reject decision with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    /// Whether the text passed
    pub accepted: bool,
    /// Why it passed or failed
    pub reason: String,
}

impl ComplianceVerdict {
    /// Create accepting verdict
    #[inline]
    #[must_use]
    pub fn accept(reason: impl Into<String>) -> Self {
        Self {
            accepted: true,
            reason: reason.into(),
        }
    }

    /// Create rejecting verdict
    #[inline]
    #[must_use]
    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: reason.into(),
        }
    }

    /// Convert to a fail-fast result
    ///
    /// # Errors
    /// `ComplianceError` carrying the reason when rejected
    pub fn into_result(self) -> Result<(), ComplianceError> {
        if self.accepted {
            Ok(())
        } else {
            Err(ComplianceError::new(self.reason))
        }
    }
}

/// Brand compliance check
pub trait ComplianceValidator: Send + Sync + std::fmt::Debug {
    /// Judge `text` against `profile`
    fn validate(&self, text: &str, profile: &BrandStyleProfile) -> ComplianceVerdict;
}

/// Keyword-marker heuristic
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicComplianceValidator;

impl HeuristicComplianceValidator {
    /// Create validator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Style points `text` earns against `profile`
    #[must_use]
    pub fn style_points(text: &str, profile: &BrandStyleProfile) -> u32 {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|w| !w.is_empty())
            .collect();
        let has_marker = |markers: &[&str]| {
            markers.iter().any(|marker| {
                if marker.contains(' ') {
                    lower.contains(marker)
                } else {
                    words.contains(marker)
                }
            })
        };

        let checks = [
            profile.formality_level > 3 && has_marker(POLITE_MARKERS),
            profile.formality_level <= 2 && has_marker(CASUAL_MARKERS),
            profile.tone == 2 && !text.contains('!') && !text.contains('?'),
            profile.humor_level > 3 && has_marker(LEVITY_MARKERS),
            profile.complexity_level > 3 && text.split_whitespace().count() > 10,
        ];
        checks.iter().map(|&passed| u32::from(passed)).sum()
    }
}

impl ComplianceValidator for HeuristicComplianceValidator {
    fn validate(&self, text: &str, profile: &BrandStyleProfile) -> ComplianceVerdict {
        let word_count = text.split_whitespace().count();
        if word_count <= EXEMPT_WORD_COUNT {
            return ComplianceVerdict::accept("short text is exempt from style review");
        }

        let points = Self::style_points(text, profile);
        if points >= PASSING_SCORE {
            ComplianceVerdict::accept(format!("matches brand communication style ({points} style signals)"))
        } else {
            tracing::debug!(points, word_count, "compliance rejected");
            ComplianceVerdict::reject(format!(
                "text does not match the brand communication style ({}; {points} of {PASSING_SCORE} required style signals)",
                profile.describe()
            ))
        }
    }
}

/// Validate with the keyword heuristic
#[must_use]
pub fn validate(text: &str, profile: &BrandStyleProfile) -> ComplianceVerdict {
    HeuristicComplianceValidator.validate(text, profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn short_text_always_accepted() {
        for profile in [
            BrandStyleProfile::default(),
            BrandStyleProfile::new(5, 2, 5, 5),
            BrandStyleProfile::new(1, 0, 1, 1),
        ] {
            assert!(validate("ok", &profile).accepted);
            assert!(validate("three word text", &profile).accepted);
        }
    }

    #[test]
    fn neutral_profile_rejects_long_text() {
        let verdict = validate("This is a perfectly ordinary sentence", &BrandStyleProfile::default());
        assert!(!verdict.accepted);
        assert!(verdict.reason.contains("brand communication style"));
    }

    #[test]
    fn formal_measured_text_passes() {
        let profile = BrandStyleProfile::new(5, 2, 1, 1);
        let verdict = validate("Please review the attached quarterly report", &profile);
        assert!(verdict.accepted, "{}", verdict.reason);
    }

    #[test]
    fn exclamation_breaks_measured_tone() {
        let profile = BrandStyleProfile::new(5, 2, 1, 1);
        assert_eq!(
            HeuristicComplianceValidator::style_points("Please review the attached report!", &profile),
            1
        );
        assert!(!validate("Please review the attached report!", &profile).accepted);
    }

    #[test]
    fn casual_playful_text_passes() {
        let profile = BrandStyleProfile::new(1, 1, 5, 1);
        assert!(validate("Hey folks, this launch is gonna be fun", &profile).accepted);
    }

    #[test]
    fn markers_match_whole_words() {
        let profile = BrandStyleProfile::new(1, 1, 5, 1);
        // "functional" and "they" contain markers but are not markers
        assert_eq!(
            HeuristicComplianceValidator::style_points("they ship functional software daily", &profile),
            0
        );
    }

    #[test]
    fn complexity_needs_more_than_ten_words() {
        let profile = BrandStyleProfile::new(3, 2, 3, 5);
        let ten = "one two three four five six seven eight nine ten";
        let eleven = "one two three four five six seven eight nine ten eleven";
        assert_eq!(HeuristicComplianceValidator::style_points(ten, &profile), 1);
        assert_eq!(HeuristicComplianceValidator::style_points(eleven, &profile), 2);
    }

    #[test]
    fn profile_range_check() {
        assert!(BrandStyleProfile::default().check().is_ok());
        assert_eq!(
            BrandStyleProfile::new(3, 9, 0, 3).check(),
            Err(ValidationError::out_of_range("humor_level", 0, 1, 5))
        );
    }

    #[test]
    fn profile_wire_format() {
        let profile: BrandStyleProfile = serde_json::from_value(json!({
            "formality_level": 4, "tone": 2, "humor_level": 1, "complexity_level": 3
        }))
        .unwrap();
        assert_eq!(profile, BrandStyleProfile::new(4, 2, 1, 3));
    }

    #[test]
    fn verdict_into_result() {
        assert!(ComplianceVerdict::accept("fine").into_result().is_ok());
        let err = ComplianceVerdict::reject("too casual").into_result().unwrap_err();
        assert_eq!(err.reason, "too casual");
    }
}
