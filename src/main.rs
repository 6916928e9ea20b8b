// Gift exchange assistant entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open the history store and load recorded years
// 4. Create mpsc channels
// 5. Spawn app logic task
// 6. Run the TUI event loop (blocking until user quits)
// 7. Cleanup on exit

use gift_exchange::app;
use gift_exchange::config;
use gift_exchange::exchange::Year;
use gift_exchange::store::HistoryStore;
use gift_exchange::tui;

use anyhow::Context;
use chrono::Datelike;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Gift exchange assistant starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: exchange={}, {} participants, attempt ceiling {}",
        config.exchange.name,
        config.exchange.participants.len(),
        config.exchange.max_attempts
    );

    // 3. Open the history store and load recorded years
    let store = HistoryStore::new(&config.history_path);
    let history = store.load().context("failed to load history")?;
    info!(
        "History loaded: {} years recorded at {}",
        history.len(),
        config.history_path
    );

    // Suggest the year after the newest recorded one, or the current
    // calendar year for an empty record.
    let initial_year = history
        .latest_year()
        .map(|y| y + 1)
        .unwrap_or_else(|| chrono::Local::now().year() as Year);

    // 4. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // Create the application state
    let app_state = app::AppState::new(config, history, store);

    // 5. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. Run the TUI event loop (blocking until user quits)
    info!("Application ready");
    if let Err(e) = tui::run(ui_rx, cmd_tx, initial_year).await {
        error!("TUI error: {}", e);
    }

    // 7. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Gift exchange assistant shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("gift-exchange.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gift_exchange=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
