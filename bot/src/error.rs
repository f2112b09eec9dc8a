use reqwest::StatusCode;

/// Faults raised while talking to the forum backend.
///
/// Rule violations found in a comment tree are never errors: they turn into
/// removals and the traversal carries on. Only the backend can make a scan
/// fail.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("request to reddit failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("reddit answered {status} for `{endpoint}`")]
    Status {
        endpoint: String,
        status: StatusCode,
    },

    #[error("couldn't obtain an access token: {0}")]
    Auth(String),

    #[error("unexpected response from `{endpoint}`: {reason}")]
    Payload { endpoint: String, reason: String },

    #[error("post {0} has no comment listing")]
    MissingPost(String),
}

impl Error {
    /// Whether retrying the whole scan cycle later has a chance to succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Request(e) => e.is_timeout() || e.is_connect(),
            Error::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Error::Auth(_) | Error::Payload { .. } | Error::MissingPost(_) => false,
        }
    }

    pub(crate) fn payload(endpoint: &str, reason: impl ToString) -> Self {
        Error::Payload {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }
}
