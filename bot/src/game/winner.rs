use std::cmp::Reverse;

use crate::thread::{ReplyId, Thread};

use super::GameRules;

/// Picks the goodbye with the highest score among those reaching
/// `min_score`.
///
/// On equal scores the earliest goodbye wins, and if they were also created at
/// the same instant the first one in `goodbyes` does.
pub fn select_winner(thread: &Thread, rules: &GameRules, goodbyes: &[ReplyId]) -> Option<ReplyId> {
    goodbyes
        .iter()
        .copied()
        .filter(|id| thread[*id].score >= rules.min_score)
        .min_by_key(|id| (Reverse(thread[*id].score), thread[*id].created_at))
}

/// Spells the answer leading to `goodbye`: the bodies of its ancestors, from
/// the reply to the post down to the goodbye's parent.
pub fn reconstruct_answer(thread: &Thread, goodbye: ReplyId) -> String {
    let mut letters = Vec::new();
    let mut cursor = thread.parent_of(goodbye);
    while let Some(id) = cursor {
        letters.push(thread[id].body.as_str());
        cursor = thread.parent_of(id);
    }
    letters.into_iter().rev().collect()
}

/// Some clients turn spaces into `#` when submitting a single character.
pub fn render_answer(answer: &str) -> String {
    answer.replace('#', " ")
}
