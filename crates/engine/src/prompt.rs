//! Prompt composition.
//!
//! One canonical template for the system instruction and tag grammar —
//! the tag list is generated from [`AffectLabel::ALL`] so the prompt and
//! the parser can never drift apart.

use moodmate_core::affect::AffectLabel;
use moodmate_core::completion::PromptMessage;
use moodmate_core::turn::ConversationTurn;

/// Fixed trailing nudge reinforcing the tag grammar.
const REINFORCEMENT: &str = "Remember to end your reply with an emotion tag from the list.";

/// Build the system instruction for a turn.
///
/// Enumerates all eight allowed tags and states that exactly one tag, as
/// the literal final token of the reply, is mandatory.
pub fn system_instructions(region: &str) -> String {
    let tags = AffectLabel::ALL
        .iter()
        .map(|l| format!("[{l}]"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a friendly and concise chatbot that acts as the user's friend. \
         Your replies should be brief and to the point. Your crucial task is to \
         ALWAYS end your reply with exactly one emotion tag from this list: {tags}. \
         The tag must be the very last thing in your reply, on the same line. \
         Do not forget or skip the tag. For example: \"I understand how you feel. [concern]\". \
         The tag should tell the overall emotion of your whole message.\n\n\
         When providing helpline or resource information, ensure it is relevant \
         to the user's specified region: {region}."
    )
}

/// Compose the exact message sequence handed to the completion client.
///
/// The current user message is the last entry of `trimmed` — orchestration
/// appends it to the working history before trimming, and it must appear in
/// the composed sequence exactly once, so nothing here re-appends it.
pub fn compose(system_instructions: &str, trimmed: &[ConversationTurn]) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(trimmed.len() + 2);
    messages.push(PromptMessage::system(system_instructions));
    messages.extend(trimmed.iter().map(PromptMessage::from));
    messages.push(PromptMessage::assistant(REINFORCEMENT));
    messages
}
