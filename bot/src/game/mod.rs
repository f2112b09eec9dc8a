//! Reconciliation of an ouija board comment tree.
//!
//! Players spell an answer one letter per reply, and a reply opening with the
//! terminal marker says goodbye and closes its branch. A scan removes illegal
//! moves, walks the surviving tree breadth-first, and writes the best-scoring
//! answer into the post flair.

mod rules;
mod scan;
mod validity;
mod walker;
mod winner;

pub use scan::{ScanReport, Verdict, process_post};
pub use validity::{classify, is_present};
pub use winner::{reconstruct_answer, render_answer, select_winner};

use crate::{
    backend::ActionSink,
    constants::{
        DUPLICATE_REPLY_REASON, INVALID_REPLY_REASON, LABEL_PREFIX, MIN_WINNING_SCORE,
        SELF_PARTICIPATION_REASON, SELF_REPLY_REASON, TERMINAL_MARKER,
    },
    thread::Thread,
};

/// Removal reason ids, opaque to the game and handed as-is to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalReasons {
    pub invalid_reply: String,
    pub self_reply: String,
    pub self_participation: String,
    pub duplicate_reply: String,
}

impl Default for RemovalReasons {
    fn default() -> Self {
        Self {
            invalid_reply: INVALID_REPLY_REASON.into(),
            self_reply: SELF_REPLY_REASON.into(),
            self_participation: SELF_PARTICIPATION_REASON.into(),
            duplicate_reply: DUPLICATE_REPLY_REASON.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRules {
    pub terminal_marker: String,
    /// A goodbye needs at least this score to win
    pub min_score: i64,
    pub label_prefix: String,
    /// Also remove invalid replies below the top level instead of only
    /// skipping them
    pub remove_nested_invalid: bool,
    pub reasons: RemovalReasons,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            terminal_marker: TERMINAL_MARKER.into(),
            min_score: MIN_WINNING_SCORE,
            label_prefix: LABEL_PREFIX.into(),
            remove_nested_invalid: false,
            reasons: RemovalReasons::default(),
        }
    }
}

impl GameRules {
    /// Case and content sensitive prefix match against the terminal marker.
    pub fn is_goodbye(&self, body: &str) -> bool {
        body.starts_with(&self.terminal_marker)
    }

    pub fn label(&self, answer: &str) -> String {
        format!("{}{}", self.label_prefix, answer)
    }
}

/// State of one pass over a thread: what it reads, where removals go, and how
/// many were issued.
pub(crate) struct Reconciler<'a, S: ?Sized> {
    thread: &'a Thread,
    rules: &'a GameRules,
    sink: &'a S,
    removed: usize,
}

impl<'a, S: ActionSink + ?Sized> Reconciler<'a, S> {
    pub(crate) fn new(thread: &'a Thread, rules: &'a GameRules, sink: &'a S) -> Self {
        Self {
            thread,
            rules,
            sink,
            removed: 0,
        }
    }

    pub(crate) fn removed(&self) -> usize {
        self.removed
    }
}
