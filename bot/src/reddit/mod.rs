//! Reddit API client used as both the fetcher and the action sink.

mod actions;
mod auth;
mod fetch;
pub mod listing;

use std::sync::Arc;

use arc_swap::ArcSwap;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::de::DeserializeOwned;

use crate::{
    config::RedditConfig,
    constants::{REDDIT_API_BASE, REQUEST_TIMEOUT},
    error::Error,
};

pub use auth::AccessToken;
pub use listing::RemovalReason;

pub struct RedditClient {
    http: reqwest::Client,
    config: RedditConfig,
    subreddit: String,
    token: ArcSwap<Option<AccessToken>>,
    limiter: DefaultDirectRateLimiter,
}

impl RedditClient {
    pub fn new(config: RedditConfig, subreddit: impl Into<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            limiter: RateLimiter::direct(Quota::per_minute(config.requests_per_minute)),
            config,
            subreddit: subreddit.into(),
            token: ArcSwap::new(Arc::new(None)),
        })
    }

    /// A bearer token that is still good, requesting a new one when needed.
    async fn bearer(&self) -> Result<String, Error> {
        let current = self.token.load_full();
        if let Some(token) = &*current {
            if token.is_fresh() {
                return Ok(token.value.clone());
            }
        }

        self.limiter.until_ready().await;
        let token = auth::request_token(&self.http, &self.config).await?;
        let value = token.value.clone();
        self.token.store(Arc::new(Some(token)));
        Ok(value)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, Error> {
        let bearer = self.bearer().await?;
        self.limiter.until_ready().await;

        tracing::trace!(path, "GET");
        let resp = self
            .http
            .get(format!("{REDDIT_API_BASE}{path}"))
            .bearer_auth(bearer)
            .query(&[("raw_json", "1")])
            .query(query)
            .send()
            .await?;

        decode(path, resp).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, Error> {
        let bearer = self.bearer().await?;
        self.limiter.until_ready().await;

        tracing::trace!(path, "POST");
        let resp = self
            .http
            .post(format!("{REDDIT_API_BASE}{path}"))
            .bearer_auth(bearer)
            .form(form)
            .send()
            .await?;

        decode(path, resp).await
    }

    pub async fn removal_reasons(&self) -> Result<Vec<RemovalReason>, Error> {
        let path = format!("/api/v1/{}/removal_reasons", self.subreddit);
        let mut resp: listing::RemovalReasonsResponse = self.get(&path, &[]).await?;

        // Reddit keeps the moderator-defined order separately from the map.
        let mut reasons: Vec<RemovalReason> = resp
            .order
            .iter()
            .filter_map(|id| resp.data.remove(id))
            .collect();
        reasons.extend(resp.data.into_values());
        Ok(reasons)
    }
}

async fn decode<T: DeserializeOwned>(endpoint: &str, resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Status {
            endpoint: endpoint.to_string(),
            status,
        });
    }

    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| Error::payload(endpoint, e))
}
