use const_format::formatcp;
use std::time::Duration;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_SUBREDDIT: &str = "ouijew";

/// Opening token of a "goodbye" reply, the move that ends a game branch
pub const TERMINAL_MARKER: &str = "להתראות";
/// Prepended to the spelled answer when it's written into the post flair
pub const LABEL_PREFIX: &str = "ויג'ו אומר: ";
pub const MIN_WINNING_SCORE: i64 = 2; // Minimum goodbye score to get into a flair

// Removal reason ids configured on the subreddit
pub const INVALID_REPLY_REASON: &str = "15raefp55ha4t";
pub const SELF_REPLY_REASON: &str = "15ra9m24jua4q";
pub const SELF_PARTICIPATION_REASON: &str = "15ra7m8a91qzb";
pub const DUPLICATE_REPLY_REASON: &str = "15rab3ega9l4j";

pub const HOT_LIMIT: usize = 30; // Number of posts checked on each iteration
pub const SCAN_INTERVAL: Duration = Duration::from_secs(120);

pub const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const REDDIT_API_BASE: &str = "https://oauth.reddit.com";
pub const REDDIT_WEB_BASE: &str = "https://www.reddit.com";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Reddit allows 100 requests per minute for OAuth clients, stay well below
pub const REQUESTS_PER_MINUTE: u32 = 60;
/// Refresh the access token this long before reddit says it expires
pub const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);
pub const COMMENT_PAGE_LIMIT: u32 = 500;
/// `/api/morechildren` accepts at most 100 ids per call
pub const MORECHILDREN_BATCH: usize = 100;

pub const USER_AGENT_PREFIX: &str = formatcp!("linux:ouija-bot:v{VERSION}");
