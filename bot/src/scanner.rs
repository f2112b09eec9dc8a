//! Periodic sweep over the subreddit.

use std::{future::Future, time::Duration};

use crate::{
    backend::{ActionSink, Fetcher},
    error::Error,
    game::{GameRules, ScanReport, process_post},
    thread::Submission,
};

pub struct Scanner<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub sink: &'a dyn ActionSink,
    pub rules: &'a GameRules,
    pub hot_limit: usize,
    pub check_reports: bool,
    pub interval: Duration,
}

impl Scanner<'_> {
    #[tracing::instrument(skip(self))]
    pub async fn scan_post(&self, post_id: &str) -> Result<ScanReport, Error> {
        let thread = self.fetcher.fetch_thread(post_id).await?;
        process_post(&thread, self.rules, self.sink).await
    }

    /// Scans the current hot posts, pinned ones excluded.
    pub async fn check_hot(&self) -> Result<Vec<ScanReport>, Error> {
        let posts = self.fetcher.hot_posts(self.hot_limit).await?;
        tracing::debug!(posts = posts.len(), "Checking hot posts");

        let mut reports = Vec::with_capacity(posts.len());
        for post in posts.iter().filter(|p| !p.stickied) {
            reports.push(self.scan_post(&post.id).await?);
        }
        Ok(reports)
    }

    /// Scans every reported post and approves it, clearing the report.
    pub async fn check_reports(&self) -> Result<Vec<ScanReport>, Error> {
        let posts: Vec<Submission> = self.fetcher.reported_posts().await?;
        tracing::debug!(posts = posts.len(), "Checking reported posts");

        let mut reports = Vec::with_capacity(posts.len());
        for post in &posts {
            reports.push(self.scan_post(&post.id).await?);
            tracing::info!(post = %post.id, "Approving reported post");
            self.sink.approve(post).await?;
        }
        Ok(reports)
    }

    pub async fn cycle(&self) -> Result<Vec<ScanReport>, Error> {
        let mut reports = self.check_hot().await?;
        if self.check_reports {
            reports.extend(self.check_reports().await?);
        }

        let removed: usize = reports.iter().map(|r| r.removed).sum();
        tracing::info!(posts = reports.len(), removed, "Cycle finished");
        Ok(reports)
    }

    /// Runs cycles until `shutdown` resolves, pausing `interval` after each.
    ///
    /// A transient backend fault only costs the current cycle, anything else
    /// is returned.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tracing::info!("Starting cycle");
            match self.cycle().await {
                Ok(_) => {}
                Err(err) if err.is_transient() => {
                    tracing::warn!(?err, "Cycle failed, retrying after the pause");
                }
                Err(err) => return Err(err),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    tracing::info!("Shutting down");
                    return Ok(());
                }
            }
        }
    }
}
