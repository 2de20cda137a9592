// hmtracker entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, env-filtered)
// 2. Load config
// 3. Build the HTTP valuation service
// 4. Open an analytics session on the configured team
// 5. Fetch the player directory and the baseline evolution
// 6. Print a summary of the team value trajectory

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use hmtracker::config;
use hmtracker::service::{HttpValuationService, ValuationService};
use hmtracker::session::AnalyticsSession;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("hmtracker starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: api={}, team={}",
        config.api.base_url, config.team.code
    );

    // 3. Build the HTTP valuation service
    let service: Arc<dyn ValuationService> =
        Arc::new(HttpValuationService::new(config.api.base_url.clone()));

    // 4. Open the analytics session
    let (event_tx, mut event_rx) = mpsc::channel(64);
    let mut session = AnalyticsSession::new(
        config.team.code.clone(),
        config.credentials.clone(),
        Arc::clone(&service),
        event_tx,
    );

    // 5. Fetch the player directory, then the baseline evolution
    match service.latest_players().await {
        Ok(directory) => {
            info!("Loaded {} players from the directory", directory.len());
            session.set_directory(directory);
        }
        Err(e) => {
            // The session still works without names; rows fall back to ids.
            error!("Failed to load the player directory: {}", e);
        }
    }

    session.refresh_baseline();
    let event = event_rx
        .recv()
        .await
        .context("fetch channel closed before the baseline arrived")?;
    session.handle_fetch_event(event);

    // 6. Print the summary
    let state = session.display_state();
    if let Some(message) = &state.baseline.error {
        error!("Baseline evolution fetch failed: {}", message);
        anyhow::bail!("could not fetch the team value evolution: {message}");
    }

    println!("Team {}", state.team_code);
    println!("  {} sampled days", state.chart.dates.len());
    for series in &state.chart.series {
        let last = series.values.last().copied().unwrap_or(0.0);
        println!("  {:<32} latest {:.1}", series.label, last);
    }

    info!("hmtracker done");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hmtracker=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
