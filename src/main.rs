use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{error, info};

use wickline::WicklineError;
use wickline::chart::ChartStyle;
use wickline::config::{AppConfig, fetch_config};
use wickline::feed::{DataFeed, RestFeed, SyntheticFeed};
use wickline::tui::event::{spawn_event_reader, spawn_fetch, spawn_tick_timer, update};
use wickline::tui::{Action, App, RefreshTimer, TerminalGuard, render};

/// UI housekeeping tick (error expiry, "updated Ns ago").
const UI_TICK_MS: u64 = 250;

#[tokio::main]
async fn main() -> Result<(), WicklineError> {
    let config = fetch_config()?;
    init_logging(&config.log_path)?;

    let style = match &config.style_path {
        Some(path) => ChartStyle::load(path)?,
        None => ChartStyle::default(),
    };

    info!(
        symbol = %config.chart.symbol,
        timeframe = %config.chart.timeframe,
        offline = config.feed.offline,
        "Starting wickline"
    );

    let result = if config.feed.offline {
        run(Arc::new(SyntheticFeed::new(config.feed.seed)), &config, style).await
    } else {
        let feed = RestFeed::new(config.feed.rest_url.clone())?;
        run(Arc::new(feed), &config, style).await
    };

    if let Err(ref e) = result {
        error!(error = %e, "Exited with error");
    }
    result
}

/// Sends structured logs to a file; the terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<(), WicklineError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| WicklineError::Config(format!("cannot open log file {}: {e}", path.display())))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run<F>(feed: Arc<F>, config: &AppConfig, style: ChartStyle) -> Result<(), WicklineError>
where
    F: DataFeed + 'static,
{
    feed.open().await?;

    let mut app = App::new(&config.chart, style, config.feed.seed);
    let limit = app.controller.capacity();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut guard = TerminalGuard::enter()?;

    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx.clone(), UI_TICK_MS);
    let refresh_timer = RefreshTimer::start(tx.clone(), config.feed.refresh_interval);

    spawn_fetch(Arc::clone(&feed), app.controller.mount(), limit, tx.clone());

    while !app.should_quit {
        guard
            .terminal()
            .draw(|frame| render(frame, &app))
            .map_err(|e| WicklineError::Io(format!("failed to draw: {e}")))?;

        let Some(message) = rx.recv().await else {
            break;
        };
        if let Some(Action::Fetch(ticket)) = update(&mut app, message) {
            spawn_fetch(Arc::clone(&feed), ticket, limit, tx.clone());
        }
    }

    drop(refresh_timer);
    feed.close();
    guard.restore()?;
    info!("Shut down cleanly");
    Ok(())
}
