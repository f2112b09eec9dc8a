use std::collections::VecDeque;

use crate::{backend::ActionSink, error::Error, thread::ReplyId};

use super::{Reconciler, classify, is_present};

impl<S: ActionSink + ?Sized> Reconciler<'_, S> {
    /// Walks the thread breadth-first and returns every goodbye reached, in
    /// the order they were dequeued.
    ///
    /// Illegal top-level replies are removed. Replies to the post itself are
    /// exempt from the game rules, which only govern answers to a letter. A
    /// goodbye ends its branch, so nothing below it is looked at.
    pub(crate) async fn collect_goodbyes(&mut self) -> Result<Vec<ReplyId>, Error> {
        let thread = self.thread;
        let rules = self.rules;

        let top_level: Vec<ReplyId> = thread
            .top_level()
            .iter()
            .copied()
            .filter(|id| is_present(&thread[*id]))
            .collect();
        let mut queue: VecDeque<ReplyId> = self
            .leave_only(
                top_level,
                |r| classify(rules, r),
                &rules.reasons.invalid_reply,
            )
            .await?
            .into();

        let mut goodbyes = Vec::new();
        while let Some(id) = queue.pop_front() {
            if rules.is_goodbye(&thread[id].body) {
                goodbyes.push(id);
                continue;
            }

            let children = self.valid_children(id).await?;
            let survivors = self.enforce_rules(id, children).await?;
            queue.extend(survivors);
        }

        tracing::debug!(goodbyes = goodbyes.len(), "Finished walking the thread");
        Ok(goodbyes)
    }
}
