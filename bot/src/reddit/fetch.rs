use std::collections::HashSet;

use async_trait::async_trait;

use crate::{
    backend::Fetcher,
    constants::{COMMENT_PAGE_LIMIT, MORECHILDREN_BATCH},
    error::Error,
    thread::{NewReply, Submission, Thread},
};

use super::{
    RedditClient,
    listing::{
        CommentThing, LinkData, Listing, MoreChildrenResponse, MoreData, Wrapped, comment_parent,
        flatten,
    },
};

type CommentPage = (Listing<Wrapped<LinkData>>, Listing<CommentThing>);

/// Where the comments hidden behind "load more" placeholders come from.
#[async_trait]
trait CommentSource: Send + Sync {
    /// The link and comment listing at `path`, a `/comments/...` page.
    async fn comment_page(
        &self,
        path: &str,
    ) -> Result<(Option<LinkData>, Vec<CommentThing>), Error>;

    async fn more_children(
        &self,
        post_id: &str,
        ids: &[String],
    ) -> Result<Vec<CommentThing>, Error>;
}

#[async_trait]
impl CommentSource for RedditClient {
    async fn comment_page(
        &self,
        path: &str,
    ) -> Result<(Option<LinkData>, Vec<CommentThing>), Error> {
        let limit = COMMENT_PAGE_LIMIT.to_string();
        let (link, comments): CommentPage = self.get(path, &[("limit", limit.as_str())]).await?;
        let link = link.data.children.into_iter().next().map(|w| w.data);
        Ok((link, comments.data.children))
    }

    async fn more_children(
        &self,
        post_id: &str,
        ids: &[String],
    ) -> Result<Vec<CommentThing>, Error> {
        let link_id = format!("t3_{post_id}");
        let children = ids.join(",");
        let resp: MoreChildrenResponse = self
            .get(
                "/api/morechildren",
                &[
                    ("api_type", "json"),
                    ("link_id", link_id.as_str()),
                    ("children", children.as_str()),
                    ("limit_children", "false"),
                ],
            )
            .await?;

        if !resp.json.errors.is_empty() {
            return Err(Error::payload(
                "/api/morechildren",
                serde_json::Value::Array(resp.json.errors),
            ));
        }
        Ok(resp.json.data.map(|d| d.things).unwrap_or_default())
    }
}

/// Replaces every "load more" placeholder with the comments behind it,
/// including placeholders that show up while resolving others.
async fn resolve_more<C: CommentSource + ?Sized>(
    source: &C,
    post_id: &str,
    replies: &mut Vec<NewReply>,
    mut pending: Vec<MoreData>,
) -> Result<(), Error> {
    let mut resolved = HashSet::new();
    let mut next = 0;

    while next < pending.len() {
        let more = pending[next].clone();
        next += 1;

        let key = if more.is_continuation() {
            more.parent_id.clone()
        } else {
            more.id.clone()
        };
        if !resolved.insert(key) {
            continue;
        }

        tracing::debug!(
            parent = %more.parent_id,
            count = more.count,
            ids = more.children.len(),
            "Loading more comments"
        );

        let mut things = Vec::new();
        if more.is_continuation() {
            let Some(parent) = comment_parent(&more.parent_id) else {
                continue;
            };
            let (_, page) = source
                .comment_page(&format!("/comments/{post_id}/_/{parent}"))
                .await?;
            // The page is rooted at the parent, which is already known.
            for thing in page {
                match thing {
                    CommentThing::Comment(comment) if comment.id == parent => {
                        things.extend(comment.replies)
                    }
                    other => things.push(other),
                }
            }
        } else {
            for batch in more.children.chunks(MORECHILDREN_BATCH) {
                things.extend(source.more_children(post_id, batch).await?);
            }
        }

        flatten(things, replies, &mut pending);
    }

    Ok(())
}

impl RedditClient {
    async fn links(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<Submission>, Error> {
        let listing: Listing<Wrapped<LinkData>> = self.get(path, query).await?;
        Ok(listing
            .data
            .children
            .into_iter()
            .map(|w| w.data.into())
            .collect())
    }
}

#[async_trait]
impl Fetcher for RedditClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_thread(&self, post_id: &str) -> Result<Thread, Error> {
        let (link, things) = self.comment_page(&format!("/comments/{post_id}")).await?;
        let link = link.ok_or_else(|| Error::MissingPost(post_id.to_string()))?;

        let mut replies = Vec::new();
        let mut pending = Vec::new();
        flatten(things, &mut replies, &mut pending);
        resolve_more(self, post_id, &mut replies, pending).await?;

        tracing::debug!(replies = replies.len(), "Fetched comment forest");
        Ok(Thread::from_flat(link.into(), replies))
    }

    async fn hot_posts(&self, limit: usize) -> Result<Vec<Submission>, Error> {
        let limit = limit.to_string();
        self.links(&format!("/r/{}/hot", self.subreddit), &[("limit", limit.as_str())])
            .await
    }

    async fn reported_posts(&self) -> Result<Vec<Submission>, Error> {
        self.links(
            &format!("/r/{}/about/reports", self.subreddit),
            &[("only", "links"), ("limit", "100")],
        )
        .await
    }
}
