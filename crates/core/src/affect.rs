//! The closed set of emotion labels a reply can carry.
//!
//! Labels are produced in two ways: extracted from the bracketed tag the
//! model is instructed to append to its reply, or inferred by the fallback
//! classifier when the tag is missing. Both paths normalize into this enum.

use serde::{Deserialize, Serialize};

/// An emotional-affect label from the closed tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffectLabel {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Neutral,
    Concern,
}

impl AffectLabel {
    /// Every allowed label, in the order they are enumerated in the prompt.
    pub const ALL: [AffectLabel; 8] = [
        AffectLabel::Joy,
        AffectLabel::Sadness,
        AffectLabel::Anger,
        AffectLabel::Fear,
        AffectLabel::Surprise,
        AffectLabel::Disgust,
        AffectLabel::Neutral,
        AffectLabel::Concern,
    ];

    /// The lowercase wire representation (matches the serde rename).
    pub fn as_str(&self) -> &'static str {
        match self {
            AffectLabel::Joy => "joy",
            AffectLabel::Sadness => "sadness",
            AffectLabel::Anger => "anger",
            AffectLabel::Fear => "fear",
            AffectLabel::Surprise => "surprise",
            AffectLabel::Disgust => "disgust",
            AffectLabel::Neutral => "neutral",
            AffectLabel::Concern => "concern",
        }
    }

    /// Parse an exact closed-set tag, case-insensitively.
    ///
    /// Returns `None` for anything outside the closed set — a bracketed word
    /// the model invented does not count as a tag.
    pub fn parse_tag(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "joy" => Some(AffectLabel::Joy),
            "sadness" => Some(AffectLabel::Sadness),
            "anger" => Some(AffectLabel::Anger),
            "fear" => Some(AffectLabel::Fear),
            "surprise" => Some(AffectLabel::Surprise),
            "disgust" => Some(AffectLabel::Disgust),
            "neutral" => Some(AffectLabel::Neutral),
            "concern" => Some(AffectLabel::Concern),
            _ => None,
        }
    }

    /// Normalize a raw classifier label into the closed set.
    ///
    /// Classifier models emit their own label vocabulary; known labels map
    /// through an explicit alias table, anything unmapped resolves to
    /// `Neutral` rather than erroring.
    pub fn from_raw(raw: &str) -> Self {
        if let Some(label) = Self::parse_tag(raw) {
            return label;
        }
        match raw.to_ascii_lowercase().as_str() {
            "happiness" | "love" | "amusement" | "excitement" | "optimism" => AffectLabel::Joy,
            "grief" | "disappointment" | "remorse" => AffectLabel::Sadness,
            "annoyance" | "rage" => AffectLabel::Anger,
            "nervousness" | "worry" | "anxiety" => AffectLabel::Concern,
            "caring" => AffectLabel::Concern,
            "realization" | "curiosity" => AffectLabel::Surprise,
            "disapproval" => AffectLabel::Disgust,
            _ => AffectLabel::Neutral,
        }
    }
}

impl std::fmt::Display for AffectLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
