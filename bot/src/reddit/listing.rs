//! Reddit's JSON shapes for links, comments and "load more" placeholders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::thread::{NewReply, Submission};

#[derive(Debug, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
pub struct ListingData<T> {
    pub children: Vec<T>,
}

/// A thing whose kind is implied by the endpoint it came from.
#[derive(Debug, Deserialize)]
pub struct Wrapped<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CommentThing {
    #[serde(rename = "t1")]
    Comment(Box<CommentData>),
    #[serde(rename = "more")]
    More(MoreData),
}

#[derive(Debug, Deserialize)]
pub struct LinkData {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub link_flair_text: Option<String>,
    #[serde(default)]
    pub stickied: bool,
}

#[derive(Debug, Deserialize)]
pub struct CommentData {
    pub id: String,
    /// Fullname of the parent: `t1_` for a comment, `t3_` for the link
    pub parent_id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(deserialize_with = "utc_from_float")]
    pub created_utc: DateTime<Utc>,
    #[serde(default)]
    pub score: i64,
    /// Moderator name, or `true` when the spam filter took it down
    #[serde(default)]
    pub banned_by: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "replies_or_empty")]
    pub replies: Vec<CommentThing>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoreData {
    pub id: String,
    pub parent_id: String,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub count: u64,
}

impl MoreData {
    /// "Continue this thread" links carry no ids, only the parent to open.
    pub fn is_continuation(&self) -> bool {
        self.children.is_empty()
    }
}

/// Body of `/api/morechildren?api_type=json`.
#[derive(Debug, Deserialize)]
pub struct MoreChildrenResponse {
    pub json: MoreChildrenJson,
}

#[derive(Debug, Deserialize)]
pub struct MoreChildrenJson {
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    #[serde(default)]
    pub data: Option<MoreChildrenData>,
}

#[derive(Debug, Deserialize)]
pub struct MoreChildrenData {
    #[serde(default)]
    pub things: Vec<CommentThing>,
}

#[derive(Debug, Deserialize)]
pub struct RemovalReasonsResponse {
    pub data: std::collections::HashMap<String, RemovalReason>,
    #[serde(default)]
    pub order: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemovalReason {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
}

fn utc_from_float<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = f64::deserialize(deserializer)?;
    DateTime::from_timestamp(seconds.trunc() as i64, (seconds.fract() * 1e9) as u32)
        .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {seconds}")))
}

/// `replies` is an empty string when a comment has none.
fn replies_or_empty<'de, D>(deserializer: D) -> Result<Vec<CommentThing>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Replies {
        Listing(Listing<CommentThing>),
        Empty(serde::de::IgnoredAny),
    }

    Ok(match Replies::deserialize(deserializer)? {
        Replies::Listing(listing) => listing.data.children,
        Replies::Empty(_) => Vec::new(),
    })
}

/// Accounts that were deleted show up as `[deleted]`.
fn real_author(author: Option<String>) -> Option<String> {
    author.filter(|a| a != "[deleted]")
}

impl From<LinkData> for Submission {
    fn from(link: LinkData) -> Self {
        Submission {
            id: link.id,
            title: link.title,
            author: real_author(link.author),
            flair: link.link_flair_text,
            stickied: link.stickied,
        }
    }
}

/// Flattens a comment forest depth-first, appending comments to `replies` and
/// placeholders to `more`.
pub fn flatten(things: Vec<CommentThing>, replies: &mut Vec<NewReply>, more: &mut Vec<MoreData>) {
    let mut stack: Vec<CommentThing> = things.into_iter().rev().collect();
    while let Some(thing) = stack.pop() {
        match thing {
            CommentThing::More(placeholder) => more.push(placeholder),
            CommentThing::Comment(comment) => {
                let CommentData {
                    id,
                    parent_id,
                    body,
                    author,
                    created_utc,
                    score,
                    banned_by,
                    replies: children,
                } = *comment;
                replies.push(NewReply {
                    id,
                    parent_id: comment_parent(&parent_id),
                    body,
                    author: real_author(author),
                    created_at: created_utc,
                    score,
                    removed: banned_by.is_some_and(|b| !b.is_null() && b != false),
                });
                stack.extend(children.into_iter().rev());
            }
        }
    }
}

/// Short id of the parent comment, `None` when the parent is the link.
pub fn comment_parent(fullname: &str) -> Option<String> {
    fullname.strip_prefix("t1_").map(String::from)
}
