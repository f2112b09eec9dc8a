//! Fixtures shared by the unit tests.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::{
    backend::{ActionSink, Fetcher},
    error::Error,
    game::{GameRules, RemovalReasons},
    thread::{NewReply, Reply, Submission, Thread},
};

pub fn rules() -> GameRules {
    GameRules {
        reasons: RemovalReasons {
            invalid_reply: "invalid".into(),
            self_reply: "self-reply".into(),
            self_participation: "self-participation".into(),
            duplicate_reply: "duplicate".into(),
        },
        ..GameRules::default()
    }
}

pub fn submission(author: &str) -> Submission {
    Submission {
        id: "post".into(),
        title: "מה השם שלי?".into(),
        author: Some(author.into()),
        flair: None,
        stickied: false,
    }
}

fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_600_000_000, 0).unwrap()
}

pub fn new_reply(
    id: &str,
    parent_id: Option<&str>,
    author: &str,
    body: &str,
    score: i64,
    seconds: i64,
) -> NewReply {
    NewReply {
        id: id.into(),
        parent_id: parent_id.map(String::from),
        body: body.into(),
        author: Some(author.into()),
        created_at: epoch() + Duration::try_seconds(seconds).unwrap(),
        score,
        removed: false,
    }
}

pub fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

/// Keeps every action in memory instead of sending it anywhere.
#[derive(Default)]
pub struct RecordingSink {
    removals: Mutex<Vec<(String, String)>>,
    labels: Mutex<Vec<(String, String)>>,
    approvals: Mutex<Vec<String>>,
}

impl RecordingSink {
    /// `(reply id, reason id)` in the order they were issued
    pub fn removals(&self) -> Vec<(String, String)> {
        self.removals.lock().unwrap().clone()
    }

    /// `(post id, flair text)`
    pub fn labels(&self) -> Vec<(String, String)> {
        self.labels.lock().unwrap().clone()
    }

    pub fn approvals(&self) -> Vec<String> {
        self.approvals.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionSink for RecordingSink {
    async fn remove(&self, reply: &Reply, reason_id: &str) -> Result<(), Error> {
        self.removals
            .lock()
            .unwrap()
            .push((reply.id.clone(), reason_id.to_string()));
        Ok(())
    }

    async fn set_label(&self, submission: &Submission, text: &str) -> Result<(), Error> {
        self.labels
            .lock()
            .unwrap()
            .push((submission.id.clone(), text.to_string()));
        Ok(())
    }

    async fn approve(&self, submission: &Submission) -> Result<(), Error> {
        self.approvals.lock().unwrap().push(submission.id.clone());
        Ok(())
    }
}

/// Serves threads from memory. Unknown posts answer with a server error.
#[derive(Default)]
pub struct FakeFetcher {
    pub threads: HashMap<String, Thread>,
    pub hot: Vec<Submission>,
    pub reported: Vec<Submission>,
}

impl FakeFetcher {
    pub fn with_thread(mut self, thread: Thread) -> Self {
        self.hot.push(thread.submission.clone());
        self.threads.insert(thread.submission.id.clone(), thread);
        self
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch_thread(&self, post_id: &str) -> Result<Thread, Error> {
        self.threads
            .get(post_id)
            .cloned()
            .ok_or_else(|| Error::Status {
                endpoint: format!("/comments/{post_id}"),
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            })
    }

    async fn hot_posts(&self, limit: usize) -> Result<Vec<Submission>, Error> {
        Ok(self.hot.iter().take(limit).cloned().collect())
    }

    async fn reported_posts(&self) -> Result<Vec<Submission>, Error> {
        Ok(self.reported.clone())
    }
}
