use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::{
    config::RedditConfig,
    constants::{REDDIT_TOKEN_URL, TOKEN_REFRESH_MARGIN},
    error::Error,
};

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    /// Refresh deadline, already moved ahead of reddit's expiry by a margin
    pub refresh_at: Instant,
}

impl AccessToken {
    pub fn is_fresh(&self) -> bool {
        Instant::now() < self.refresh_at
    }
}

/// Reddit answers a failed password grant with a 200 and an `error` field.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
}

/// Password grant for a "script" application.
#[tracing::instrument(skip_all, fields(username = %config.username))]
pub async fn request_token(
    http: &reqwest::Client,
    config: &RedditConfig,
) -> Result<AccessToken, Error> {
    tracing::debug!("Requesting a new access token");

    let resp = http
        .post(REDDIT_TOKEN_URL)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[
            ("grant_type", "password"),
            ("username", config.username.as_str()),
            ("password", config.password.as_str()),
        ])
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Status {
            endpoint: REDDIT_TOKEN_URL.to_string(),
            status,
        });
    }

    let bytes = resp.bytes().await?;
    let body: TokenResponse =
        serde_json::from_slice(&bytes).map_err(|e| Error::payload(REDDIT_TOKEN_URL, e))?;
    token_from_response(body, Instant::now())
}

fn token_from_response(body: TokenResponse, now: Instant) -> Result<AccessToken, Error> {
    match body {
        TokenResponse {
            access_token: Some(value),
            expires_in,
            ..
        } => {
            let lifetime = Duration::from_secs(expires_in.unwrap_or(3600));
            Ok(AccessToken {
                value,
                refresh_at: now + lifetime.saturating_sub(TOKEN_REFRESH_MARGIN),
            })
        }
        TokenResponse {
            error: Some(error), ..
        } => Err(Error::Auth(error)),
        _ => Err(Error::Auth("response carried neither a token nor an error".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<AccessToken, Error> {
        token_from_response(serde_json::from_str(json).unwrap(), Instant::now())
    }

    #[test]
    fn token_refreshes_before_expiry() {
        let now = Instant::now();
        let token = token_from_response(
            serde_json::from_str(
                r#"{"access_token": "abc", "token_type": "bearer", "expires_in": 86400, "scope": "*"}"#,
            )
            .unwrap(),
            now,
        )
        .unwrap();

        assert_eq!(token.value, "abc");
        assert_eq!(token.refresh_at, now + Duration::from_secs(86400 - 60));
        assert!(token.is_fresh());
    }

    #[test]
    fn invalid_grant_is_an_auth_error() {
        let err = parse(r#"{"error": "invalid_grant"}"#).unwrap_err();
        assert!(matches!(err, Error::Auth(ref e) if e == "invalid_grant"));
    }

    #[test]
    fn empty_response_is_an_auth_error() {
        assert!(matches!(parse("{}"), Err(Error::Auth(_))));
    }
}
