use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use homework_bot::{
    config::Config,
    poller::{CycleOutcome, Poller},
    practicum::{self, PracticumClient},
    telegram::TelegramBot,
};

/// Watches homework review statuses and reports changes to Telegram.
#[derive(Debug, Parser)]
#[command(name = "homework-bot", version)]
struct Cli {
    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,

    /// Unix timestamp to start polling from (defaults to now minus POLL_LOOKBACK)
    #[arg(long, value_name = "TIMESTAMP")]
    from_date: Option<i64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "homework_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Cannot start: {}", err);
            return Err(err.into());
        }
    };

    let cursor = cli
        .from_date
        .unwrap_or_else(|| config.start_cursor(Utc::now().timestamp()));

    let client = practicum::build_client(&config).context("Failed to build HTTP client")?;
    let source = PracticumClient::new(client.clone(), &config);
    let bot = TelegramBot::new(client, &config);
    let mut poller = Poller::new(source, bot, config.retry_period, cursor);

    if cli.once {
        info!("Running a single poll cycle from {}", cursor);
        if let CycleOutcome::Failed(err) = poller.run_cycle() {
            info!("Single cycle finished with an error: {}", err);
        }
        info!("Next from_date would be {}", poller.state().cursor);
        return Ok(());
    }

    poller.run()
}
