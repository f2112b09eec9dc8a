use std::collections::HashMap;

use crate::{
    backend::ActionSink,
    error::Error,
    thread::{ReplyId, Thread},
};

use super::Reconciler;

impl<S: ActionSink + ?Sized> Reconciler<'_, S> {
    /// Applies the game rules to the legal children of `parent`.
    ///
    /// Nobody answers themselves, the post author may only say goodbye, and
    /// the same answer given twice only counts for whoever was first.
    pub(crate) async fn enforce_rules(
        &mut self,
        parent: ReplyId,
        children: Vec<ReplyId>,
    ) -> Result<Vec<ReplyId>, Error> {
        let thread = self.thread;
        let rules = self.rules;
        let parent_author = &thread[parent].author;
        let post_author = &thread.submission.author;

        let children = self
            .leave_only(
                children,
                |r| r.author != *parent_author,
                &rules.reasons.self_reply,
            )
            .await?;

        let children = self
            .leave_only(
                children,
                |r| r.author != *post_author || rules.is_goodbye(&r.body),
                &rules.reasons.self_participation,
            )
            .await?;

        self.remove_duplicates(children).await
    }

    async fn remove_duplicates(&mut self, children: Vec<ReplyId>) -> Result<Vec<ReplyId>, Error> {
        let rules = self.rules;
        let (originals, copycats) = split_duplicates(self.thread, children);
        for id in copycats {
            self.remove(id, &rules.reasons.duplicate_reply).await?;
        }
        Ok(originals)
    }
}

/// Groups siblings by their exact body and separates the earliest reply of
/// each group from the later copies.
///
/// Originals come out in the order their group was first seen. Replies created
/// at the same instant keep their sibling order.
fn split_duplicates(thread: &Thread, children: Vec<ReplyId>) -> (Vec<ReplyId>, Vec<ReplyId>) {
    let mut groups: Vec<Vec<ReplyId>> = Vec::new();
    let mut by_body = HashMap::<&str, usize>::new();

    for id in children {
        let body = thread[id].body.as_str();
        match by_body.get(body) {
            Some(&group) => groups[group].push(id),
            None => {
                by_body.insert(body, groups.len());
                groups.push(vec![id]);
            }
        }
    }

    let mut originals = Vec::with_capacity(groups.len());
    let mut copycats = Vec::new();
    for mut group in groups {
        group.sort_by_key(|id| thread[*id].created_at);
        let mut group = group.into_iter();
        originals.extend(group.next());
        copycats.extend(group);
    }

    (originals, copycats)
}
