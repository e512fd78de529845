//! Affect-tag extraction with classifier fallback.
//!
//! The model is instructed, but not guaranteed, to end its reply with a
//! bracketed tag. `extract` pulls the tag off the end of the raw reply;
//! `resolve` falls back to the emotion classifier when the tag is absent
//! or not from the closed set.

use std::sync::LazyLock;

use regex_lite::Regex;

use moodmate_core::affect::AffectLabel;
use moodmate_core::classifier::EmotionClassifier;

// A bracketed word token anchored at the end, trailing whitespace allowed.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\w+)\]\s*$").expect("tag pattern is valid"));

/// Split a raw reply into clean text and an optional trailing affect tag.
///
/// A bracketed word outside the closed set does not count as a tag: the
/// text is left intact and the caller's fallback decides the mood.
pub fn extract(raw: &str) -> (String, Option<AffectLabel>) {
    if let Some(caps) = TAG_RE.captures(raw) {
        if let Some(label) = AffectLabel::parse_tag(&caps[1]) {
            let mat = caps.get(0).expect("whole-match group always present");
            let clean = raw[..mat.start()].trim().to_string();
            return (clean, Some(label));
        }
    }
    (raw.trim().to_string(), None)
}

/// Resolve the affect label of a raw reply, consulting the classifier only
/// when extraction found no tag. The clean text always comes from
/// [`extract`], regardless of which path produced the label.
pub async fn resolve(raw: &str, classifier: &dyn EmotionClassifier) -> (String, AffectLabel) {
    let (clean, tag) = extract(raw);
    let label = match tag {
        Some(label) => label,
        None => {
            tracing::debug!("Reply carried no tag, falling back to classifier");
            classifier.classify(raw).await
        }
    };
    (clean, label)
}
