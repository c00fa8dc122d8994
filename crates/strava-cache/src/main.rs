use std::path::PathBuf;

use clap::Parser;

use strava_cache::client::{AccessToken, StravaClient};
use strava_cache::config::{self, CachePaths};
use strava_cache::sync::SyncEngine;
use strava_cache::Result;

#[derive(Parser)]
#[command(name = "strava-cache")]
#[command(version, about = "Incremental local cache for Strava activities and telemetry streams", long_about = None)]
struct Cli {
    /// Activity ledger CSV path
    #[arg(long, default_value = config::DEFAULT_LEDGER_FILE)]
    ledger: PathBuf,

    /// Telemetry archive Parquet path
    #[arg(long, default_value = config::DEFAULT_ARCHIVE_FILE)]
    archive: PathBuf,

    /// Access token file; only its first line is read
    #[arg(long, default_value = config::DEFAULT_TOKEN_FILE)]
    token_file: PathBuf,

    /// Access token, overriding the token file
    #[arg(long, env = "STRAVA_ACCESS_TOKEN")]
    access_token: Option<String>,

    /// Cap on how many not-yet-synced activities get their streams fetched
    #[arg(long)]
    max: Option<usize>,

    /// Sync the activity ledger only, skipping telemetry streams
    #[arg(long)]
    activities_only: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let token = match cli.access_token {
        Some(raw) => AccessToken::new(raw),
        None => config::load_token(&cli.token_file)?,
    };

    // Validate the token before touching either store.
    let client = StravaClient::new();
    client.get_athlete(&token).await?;

    let paths = CachePaths {
        ledger: cli.ledger,
        archive: cli.archive,
    };
    let mut engine = SyncEngine::new(client, token, paths);

    engine.sync_activities().await?;
    if !cli.activities_only {
        let report = engine.sync_streams(cli.max).await?;
        println!("Stream sync complete: {}", report);
    }

    Ok(())
}
