//! Context-window trimming.
//!
//! Long conversations would overflow the completion service's input limit,
//! so only a bounded recent suffix of the history is sent per turn. The
//! full history is still persisted — trimming affects the model's context
//! only.

use moodmate_core::turn::ConversationTurn;

/// Default budget, in word-units.
pub const DEFAULT_CONTEXT_BUDGET: usize = 15_000;

/// Bound `history` to `budget` word-units, keeping the most recent turns.
///
/// Scans newest to oldest, including a turn only while the running total
/// stays strictly under the budget; stops at the first exclusion, so the
/// result is always a contiguous recent suffix in original order. A single
/// turn whose own cost already reaches the budget is silently dropped.
///
/// Pure: same inputs always yield the same slice.
pub fn trim_history(history: &[ConversationTurn], budget: usize) -> &[ConversationTurn] {
    let mut total = 0usize;
    let mut start = history.len();

    for (i, turn) in history.iter().enumerate().rev() {
        let cost = turn.word_count();
        if total + cost < budget {
            total += cost;
            start = i;
        } else {
            break;
        }
    }

    &history[start..]
}
