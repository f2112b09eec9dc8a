use crate::{
    backend::ActionSink,
    error::Error,
    thread::{Reply, ReplyId},
};

use super::{GameRules, Reconciler};

/// A legal move is a single letter, or a goodbye.
///
/// Length is counted in characters, so an empty body is a legal move as well.
pub fn classify(rules: &GameRules, reply: &Reply) -> bool {
    reply.body.chars().count() <= 1 || rules.is_goodbye(&reply.body)
}

/// Replies already removed, or whose author deleted their account, are
/// skipped without issuing anything against them.
pub fn is_present(reply: &Reply) -> bool {
    !reply.removed && reply.author.is_some()
}

impl<S: ActionSink + ?Sized> Reconciler<'_, S> {
    /// Keeps the replies matching `keep`, in their original order, and removes
    /// every other one with `reason_id`.
    pub(crate) async fn leave_only<P>(
        &mut self,
        replies: Vec<ReplyId>,
        keep: P,
        reason_id: &str,
    ) -> Result<Vec<ReplyId>, Error>
    where
        P: Fn(&Reply) -> bool,
    {
        let thread = self.thread;
        let (kept, rejected): (Vec<ReplyId>, Vec<ReplyId>) =
            replies.into_iter().partition(|id| keep(&thread[*id]));

        for id in rejected {
            self.remove(id, reason_id).await?;
        }

        Ok(kept)
    }

    pub(crate) async fn remove(&mut self, id: ReplyId, reason_id: &str) -> Result<(), Error> {
        let reply = &self.thread[id];
        let permalink = self
            .thread
            .permalink(id)
            .map(String::from)
            .unwrap_or_default();
        tracing::info!(
            reason = %reason_id,
            reply = %reply.id,
            %permalink,
            body = %reply.body,
            "Removing reply"
        );
        self.sink.remove(reply, reason_id).await?;
        self.removed += 1;
        Ok(())
    }

    /// Children of `parent` that still exist and make a legal move.
    ///
    /// Illegal ones are skipped, or removed when the rules ask for it.
    pub(crate) async fn valid_children(&mut self, parent: ReplyId) -> Result<Vec<ReplyId>, Error> {
        let thread = self.thread;
        let rules = self.rules;
        let present: Vec<ReplyId> = thread
            .children_of(parent)
            .iter()
            .copied()
            .filter(|id| is_present(&thread[*id]))
            .collect();

        if rules.remove_nested_invalid {
            self.leave_only(present, |r| classify(rules, r), &rules.reasons.invalid_reply)
                .await
        } else {
            Ok(present
                .into_iter()
                .filter(|id| classify(rules, &thread[*id]))
                .collect())
        }
    }
}
