use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::WrapErr;
use mimalloc::MiMalloc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ouija_bot::{
    backend::{ActionSink, DryRun},
    config::{BotConfig, Env},
    reddit::RedditClient,
    scanner::Scanner,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Moderation bot for an ouija board subreddit", long_about = None)]
struct Cli {
    /// Only log moderator actions, regardless of DRY_RUN
    #[arg(long = "dry-run", global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan the subreddit until interrupted (default)
    Run,
    /// Run a single scan cycle and exit
    Scan,
    /// Scan one post and print the outcome as JSON
    Post {
        /// Post id, without the `t3_` prefix
        id: String,
    },
    /// List the removal reasons configured on the subreddit
    Reasons,
}

fn init_tracing(env: Env) {
    let json = matches!(env, Env::Production);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(?err, "Couldn't listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let config = BotConfig::new_from_env().wrap_err("invalid configuration")?;
    init_tracing(config.env);

    let client = RedditClient::new(config.reddit.clone(), config.subreddit.clone())
        .wrap_err("couldn't build the reddit client")?;
    let dry_run = cli.dry_run || config.dry_run;
    let sink: &dyn ActionSink = if dry_run { &DryRun } else { &client };

    let scanner = Scanner {
        fetcher: &client,
        sink,
        rules: &config.rules,
        hot_limit: config.hot_limit,
        check_reports: config.check_reports,
        interval: config.scan_interval,
    };

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            tracing::info!(
                subreddit = %config.subreddit,
                dry_run,
                interval = ?config.scan_interval,
                "Starting ouija bot"
            );
            scanner.run_until(interrupted()).await?;
        }
        Command::Scan => {
            scanner.cycle().await?;
        }
        Command::Post { id } => {
            let report = scanner.scan_post(&id).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Reasons => {
            for reason in client.removal_reasons().await? {
                println!("{}\t{}\t{}", reason.id, reason.title, reason.message);
            }
        }
    }

    Ok(())
}
