use std::{env::VarError, fmt::Display, num::NonZeroU32, str::FromStr, time::Duration};

use crate::{
    constants::{
        DEFAULT_SUBREDDIT, HOT_LIMIT, REQUESTS_PER_MINUTE, SCAN_INTERVAL, USER_AGENT_PREFIX,
    },
    game::{GameRules, RemovalReasons},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Dev,
    Staging,
    Production,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable `{0}` is required")]
    Missing(&'static str),

    #[error("environment variable `{0}` is not valid unicode")]
    NotUnicode(&'static str),

    #[error("environment variable `{key}` has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
    pub requests_per_minute: NonZeroU32,
}

impl std::fmt::Debug for RedditConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditConfig")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("user_agent", &self.user_agent)
            .field("requests_per_minute", &self.requests_per_minute)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub env: Env,
    pub reddit: RedditConfig,
    pub subreddit: String,
    /// Only log the moderator actions instead of issuing them
    pub dry_run: bool,
    pub hot_limit: usize,
    pub scan_interval: Duration,
    /// Also go through the reported posts on each cycle
    pub check_reports: bool,
    pub rules: GameRules,
}

/// Where variables are read from, `std::env::var` outside of tests.
type Lookup<'a> = &'a dyn Fn(&str) -> Result<String, VarError>;

fn var(lookup: Lookup, key: &'static str) -> Result<Option<String>, ConfigError> {
    match lookup(key) {
        Ok(val) => Ok(Some(val)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key)),
    }
}

fn required_var(lookup: Lookup, key: &'static str) -> Result<String, ConfigError> {
    var(lookup, key)?.ok_or(ConfigError::Missing(key))
}

fn var_or(lookup: Lookup, key: &'static str, default: &str) -> Result<String, ConfigError> {
    Ok(var(lookup, key)?.unwrap_or_else(|| default.to_string()))
}

fn parsed_var<T>(lookup: Lookup, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match var(lookup, key)? {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

fn flag_var(lookup: Lookup, key: &'static str) -> Result<bool, ConfigError> {
    match var(lookup, key)? {
        None => Ok(false),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" | "" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key,
                value,
                reason: "expected true/yes/1 or false/no/0".into(),
            }),
        },
    }
}

impl BotConfig {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| std::env::var(key))
    }

    pub fn from_lookup(lookup: Lookup) -> Result<Self, ConfigError> {
        let username = required_var(lookup, "REDDIT_USERNAME")?;
        let user_agent = match var(lookup, "REDDIT_USER_AGENT")? {
            Some(agent) => agent,
            None => format!("{USER_AGENT_PREFIX} (by /u/{username})"),
        };

        let reddit = RedditConfig {
            client_id: required_var(lookup, "REDDIT_CLIENT_ID")?,
            client_secret: required_var(lookup, "REDDIT_CLIENT_SECRET")?,
            password: required_var(lookup, "REDDIT_PASSWORD")?,
            username,
            user_agent,
            requests_per_minute: parsed_var(
                lookup,
                "REQUESTS_PER_MINUTE",
                NonZeroU32::new(REQUESTS_PER_MINUTE).unwrap_or(NonZeroU32::MIN),
            )?,
        };

        let defaults = GameRules::default();
        let terminal_marker = var_or(lookup, "OUIJA_TERMINAL_MARKER", &defaults.terminal_marker)?;
        // Every body would start with an empty marker
        if terminal_marker.is_empty() {
            return Err(ConfigError::Invalid {
                key: "OUIJA_TERMINAL_MARKER",
                value: terminal_marker,
                reason: "must not be empty".into(),
            });
        }

        let rules = GameRules {
            terminal_marker,
            min_score: parsed_var(lookup, "OUIJA_MIN_SCORE", defaults.min_score)?,
            label_prefix: var_or(lookup, "OUIJA_LABEL_PREFIX", &defaults.label_prefix)?,
            remove_nested_invalid: flag_var(lookup, "OUIJA_REMOVE_NESTED_INVALID")?,
            reasons: RemovalReasons {
                invalid_reply: var_or(
                    lookup,
                    "REASON_INVALID_REPLY",
                    &defaults.reasons.invalid_reply,
                )?,
                self_reply: var_or(lookup, "REASON_SELF_REPLY", &defaults.reasons.self_reply)?,
                self_participation: var_or(
                    lookup,
                    "REASON_SELF_PARTICIPATION",
                    &defaults.reasons.self_participation,
                )?,
                duplicate_reply: var_or(
                    lookup,
                    "REASON_DUPLICATE_REPLY",
                    &defaults.reasons.duplicate_reply,
                )?,
            },
        };

        Ok(BotConfig {
            env: match var(lookup, "ENVIRONMENT")? {
                None => Env::Dev,
                Some(env) => match env.as_str() {
                    "dev" => Env::Dev,
                    "staging" => Env::Staging,
                    "production" => Env::Production,
                    _ => {
                        return Err(ConfigError::Invalid {
                            key: "ENVIRONMENT",
                            value: env,
                            reason: "expected dev, staging or production".into(),
                        });
                    }
                },
            },
            reddit,
            subreddit: var_or(lookup, "SUBREDDIT", DEFAULT_SUBREDDIT)?,
            dry_run: flag_var(lookup, "DRY_RUN")?,
            hot_limit: parsed_var(lookup, "HOT_LIMIT", HOT_LIMIT)?,
            scan_interval: Duration::from_secs(parsed_var(
                lookup,
                "SCAN_INTERVAL_SECS",
                SCAN_INTERVAL.as_secs(),
            )?),
            check_reports: flag_var(lookup, "CHECK_REPORTS")?,
            rules,
        })
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<BotConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(&|key: &str| vars.get(key).cloned().ok_or(VarError::NotPresent))
    }

    const CREDENTIALS: [(&str, &str); 4] = [
        ("REDDIT_CLIENT_ID", "id"),
        ("REDDIT_CLIENT_SECRET", "secret"),
        ("REDDIT_USERNAME", "ouija-bot"),
        ("REDDIT_PASSWORD", "hunter2"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&CREDENTIALS).unwrap();

        assert_eq!(config.env, Env::Dev);
        assert_eq!(config.subreddit, "ouijew");
        assert_eq!(config.hot_limit, 30);
        assert_eq!(config.scan_interval, Duration::from_secs(120));
        assert!(!config.dry_run);
        assert!(!config.check_reports);
        assert_eq!(config.rules, GameRules::default());
        assert_eq!(config.reddit.requests_per_minute.get(), 60);
        assert_eq!(
            config.reddit.user_agent,
            format!(
                "linux:ouija-bot:v{} (by /u/ouija-bot)",
                env!("CARGO_PKG_VERSION")
            )
        );
    }

    #[test]
    fn test_missing_credentials() {
        let err = load(&CREDENTIALS[..3]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("REDDIT_PASSWORD")));
    }

    #[test]
    fn test_overrides() {
        let mut vars = CREDENTIALS.to_vec();
        vars.extend([
            ("ENVIRONMENT", "production"),
            ("DRY_RUN", "yes"),
            ("CHECK_REPORTS", "1"),
            ("HOT_LIMIT", "5"),
            ("SCAN_INTERVAL_SECS", " 10 "),
            ("OUIJA_MIN_SCORE", "-3"),
            ("OUIJA_REMOVE_NESTED_INVALID", "true"),
            ("OUIJA_TERMINAL_MARKER", "goodbye"),
            ("REASON_DUPLICATE_REPLY", "dup"),
        ]);
        let config = load(&vars).unwrap();

        assert_eq!(config.env, Env::Production);
        assert!(config.dry_run);
        assert!(config.check_reports);
        assert_eq!(config.hot_limit, 5);
        assert_eq!(config.scan_interval, Duration::from_secs(10));
        assert_eq!(config.rules.min_score, -3);
        assert!(config.rules.remove_nested_invalid);
        assert_eq!(config.rules.terminal_marker, "goodbye");
        assert_eq!(config.rules.reasons.duplicate_reply, "dup");
        assert_eq!(
            config.rules.reasons.invalid_reply,
            RemovalReasons::default().invalid_reply
        );
    }

    #[test]
    fn test_malformed_values() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("HOT_LIMIT", "lots"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { key: "HOT_LIMIT", .. })
        ));

        let mut vars = CREDENTIALS.to_vec();
        vars.push(("REQUESTS_PER_MINUTE", "0"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { key: "REQUESTS_PER_MINUTE", .. })
        ));

        let mut vars = CREDENTIALS.to_vec();
        vars.push(("DRY_RUN", "maybe"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { key: "DRY_RUN", .. })
        ));
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("ENVIRONMENT", "prod"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { key: "ENVIRONMENT", ref value, .. }) if value == "prod"
        ));

        let mut vars = CREDENTIALS.to_vec();
        vars.push(("ENVIRONMENT", "staging"));
        assert_eq!(load(&vars).unwrap().env, Env::Staging);
    }

    #[test]
    fn test_empty_terminal_marker_is_rejected() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("OUIJA_TERMINAL_MARKER", ""));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { key: "OUIJA_TERMINAL_MARKER", .. })
        ));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = load(&CREDENTIALS).unwrap();
        let debug = format!("{:?}", config.reddit);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("secret"));
    }
}
