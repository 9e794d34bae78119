// ghtimeline command-line entry point.
// Loads configuration, builds the timeline loader and prints the result.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ghtimeline::timeline::{TimelineData, render_timeline};
use ghtimeline::{Clock, Config, HttpSource, Result, SystemClock, TimelineLoader, TtlCache};

#[derive(Debug, Parser)]
#[command(name = "ghtimeline", version, about = "Timeline of a GitHub account's repositories")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GitHub account to list (overrides config and environment)
    #[arg(long, global = true)]
    account: Option<String>,

    /// Print JSON instead of the text timeline
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the timeline once and print it
    Show,
    /// Reload the timeline on an interval, reusing the in-process cache
    Watch {
        /// Seconds between loads
        #[arg(long, default_value_t = 60)]
        interval: u64,
        /// Stop after this many loads
        #[arg(long)]
        iterations: Option<u64>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ghtimeline=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(account) = cli.account {
        config.account = account;
        config.validate()?;
    }
    debug!(account = %config.account, per_page = config.per_page, "configuration loaded");

    match cli.command.unwrap_or(Command::Show) {
        Command::Config => print!("{}", config.to_toml()?),
        Command::Show => {
            let loader = build_loader(&config)?;
            let data = loader.load().await;
            print_timeline(&data, cli.json)?;
        }
        Command::Watch {
            interval,
            iterations,
        } => {
            let loader = build_loader(&config)?;
            let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
            let mut count = 0u64;
            loop {
                ticker.tick().await;
                let data = loader.load().await;
                info!(
                    repos = data.repos.len(),
                    from_cache = data.from_cache,
                    rate_limit_remaining = loader.source().github().rate_limit().remaining,
                    "timeline loaded"
                );
                print_timeline(&data, cli.json)?;

                count += 1;
                if iterations.is_some_and(|max| count >= max) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn build_loader(config: &Config) -> Result<TimelineLoader<HttpSource>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache = Arc::new(TtlCache::new(config.cache_ttl(), clock.clone()));
    let source = HttpSource::from_config(config)?;

    info!(account = %config.account, "building repository timeline");
    Ok(
        TimelineLoader::new(source, cache, clock, config.account.clone())
            .with_max_concurrency(config.max_concurrency),
    )
}

fn print_timeline(data: &TimelineData, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        print!("{}", render_timeline(data));
    }
    Ok(())
}
