use std::{collections::HashMap, ops::Index};

use chrono::{DateTime, Utc};
use url::Url;

use crate::constants::REDDIT_WEB_BASE;

/// Position of a reply inside its [`Thread`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReplyId(usize);

/// The post at the root of a comment tree.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    /// Moderator-assigned flair text
    pub flair: Option<String>,
    pub stickied: bool,
}

impl Submission {
    pub fn permalink(&self) -> Result<Url, url::ParseError> {
        Url::parse(REDDIT_WEB_BASE)?.join(&format!("comments/{}/", self.id))
    }
}

/// A reply as it comes out of the backend, pointing at its parent by id.
#[derive(Debug, Clone)]
pub struct NewReply {
    pub id: String,
    /// `None` for a reply to the post itself
    pub parent_id: Option<String>,
    pub body: String,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    pub score: i64,
    /// Already removed by a moderator or by the platform
    pub removed: bool,
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub id: String,
    pub body: String,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    pub score: i64,
    pub removed: bool,
    parent: Option<ReplyId>,
    children: Vec<ReplyId>,
}

/// A submission and every reply below it.
///
/// Replies live in a flat arena. Children are owned through index lists and
/// the parent link is a plain index used for walking upwards, so the tree
/// never holds a reference cycle.
#[derive(Debug, Clone)]
pub struct Thread {
    pub submission: Submission,
    replies: Vec<Reply>,
    top_level: Vec<ReplyId>,
}

impl Thread {
    /// Builds the tree from replies listed in any order.
    ///
    /// Siblings keep the relative order they had in `replies`. A repeated id
    /// keeps its first occurrence, and a reply whose parent is unknown can't
    /// be reached from the post, so it's left out of the tree.
    pub fn from_flat(submission: Submission, replies: Vec<NewReply>) -> Self {
        let mut index = HashMap::<String, ReplyId>::with_capacity(replies.len());
        let mut arena = Vec::with_capacity(replies.len());
        let mut parents = Vec::with_capacity(replies.len());

        for reply in replies {
            if index.contains_key(&reply.id) {
                continue;
            }
            index.insert(reply.id.clone(), ReplyId(arena.len()));
            parents.push(reply.parent_id);
            arena.push(Reply {
                id: reply.id,
                body: reply.body,
                author: reply.author,
                created_at: reply.created_at,
                score: reply.score,
                removed: reply.removed,
                parent: None,
                children: Vec::new(),
            });
        }

        let mut top_level = Vec::new();
        for (position, parent_id) in parents.into_iter().enumerate() {
            let id = ReplyId(position);
            match parent_id {
                None => top_level.push(id),
                Some(parent_id) => match index.get(&parent_id) {
                    Some(&parent) if parent != id => {
                        arena[position].parent = Some(parent);
                        arena[parent.0].children.push(id);
                    }
                    _ => {
                        tracing::debug!(
                            reply = %arena[position].id,
                            parent = %parent_id,
                            "Dropping reply with unknown parent"
                        );
                    }
                },
            }
        }

        Thread {
            submission,
            replies: arena,
            top_level,
        }
    }

    /// Replies to the post itself, in backend order.
    pub fn top_level(&self) -> &[ReplyId] {
        &self.top_level
    }

    pub fn children_of(&self, id: ReplyId) -> &[ReplyId] {
        &self.replies[id.0].children
    }

    /// `None` when the reply answers the post directly.
    pub fn parent_of(&self, id: ReplyId) -> Option<ReplyId> {
        self.replies[id.0].parent
    }

    pub fn find(&self, reply_id: &str) -> Option<ReplyId> {
        self.replies
            .iter()
            .position(|r| r.id == reply_id)
            .map(ReplyId)
    }

    pub fn permalink(&self, id: ReplyId) -> Result<Url, url::ParseError> {
        self.submission
            .permalink()?
            .join(&format!("_/{}/", self.replies[id.0].id))
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

impl Index<ReplyId> for Thread {
    type Output = Reply;

    fn index(&self, id: ReplyId) -> &Reply {
        &self.replies[id.0]
    }
}
