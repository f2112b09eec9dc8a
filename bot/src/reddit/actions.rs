use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    backend::ActionSink,
    error::Error,
    thread::{Reply, Submission},
};

use super::RedditClient;

#[async_trait]
impl ActionSink for RedditClient {
    /// Removes the comment, then attaches the removal reason to it.
    async fn remove(&self, reply: &Reply, reason_id: &str) -> Result<(), Error> {
        let fullname = format!("t1_{}", reply.id);
        let _: Value = self
            .post_form("/api/remove", &[("id", fullname.as_str()), ("spam", "false")])
            .await?;

        let reason = json!({
            "item_ids": [fullname],
            "mod_note": "",
            "reason_id": reason_id,
        })
        .to_string();
        let _: Value = self
            .post_form("/api/v1/modactions/removal_reasons", &[("json", reason.as_str())])
            .await?;
        Ok(())
    }

    async fn set_label(&self, submission: &Submission, text: &str) -> Result<(), Error> {
        let link = format!("t3_{}", submission.id);
        let resp: Value = self
            .post_form(
                &format!("/r/{}/api/flair", self.subreddit),
                &[("api_type", "json"), ("link", link.as_str()), ("text", text)],
            )
            .await?;
        api_errors("/api/flair", &resp)
    }

    async fn approve(&self, submission: &Submission) -> Result<(), Error> {
        let fullname = format!("t3_{}", submission.id);
        let _: Value = self
            .post_form("/api/approve", &[("id", fullname.as_str())])
            .await?;
        Ok(())
    }
}

/// Endpoints called with `api_type=json` report failures inside a 200.
fn api_errors(endpoint: &str, resp: &Value) -> Result<(), Error> {
    match resp.pointer("/json/errors").and_then(Value::as_array) {
        Some(errors) if !errors.is_empty() => {
            Err(Error::payload(endpoint, Value::Array(errors.clone())))
        }
        _ => Ok(()),
    }
}
