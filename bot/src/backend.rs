//! Seams between the game and the forum it moderates.

use async_trait::async_trait;

use crate::{
    error::Error,
    thread::{Reply, Submission, Thread},
};

/// Read side of the forum.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// The post with its entire comment forest, every "load more" placeholder
    /// already resolved.
    async fn fetch_thread(&self, post_id: &str) -> Result<Thread, Error>;

    async fn hot_posts(&self, limit: usize) -> Result<Vec<Submission>, Error>;

    /// Posts currently sitting in the moderation reports queue.
    async fn reported_posts(&self) -> Result<Vec<Submission>, Error>;
}

/// Moderator actions the game issues against the forum.
#[async_trait]
pub trait ActionSink: Send + Sync {
    async fn remove(&self, reply: &Reply, reason_id: &str) -> Result<(), Error>;

    /// Overwrites the post flair.
    async fn set_label(&self, submission: &Submission, text: &str) -> Result<(), Error>;

    async fn approve(&self, submission: &Submission) -> Result<(), Error>;
}

/// Logs what would have been done and leaves the forum untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRun;

#[async_trait]
impl ActionSink for DryRun {
    async fn remove(&self, reply: &Reply, reason_id: &str) -> Result<(), Error> {
        tracing::info!(reply = %reply.id, reason = %reason_id, "Dry run, not removing");
        Ok(())
    }

    async fn set_label(&self, submission: &Submission, text: &str) -> Result<(), Error> {
        tracing::info!(post = %submission.id, %text, "Dry run, not setting flair");
        Ok(())
    }

    async fn approve(&self, submission: &Submission) -> Result<(), Error> {
        tracing::info!(post = %submission.id, "Dry run, not approving");
        Ok(())
    }
}
