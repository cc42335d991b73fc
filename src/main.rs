//! Standup Timer - a rotating multi-participant meeting timer
//! 
//! This is the main entry point: it loads persisted settings, drives the timer
//! engine's scheduler and serves the HTTP control surface.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use standup_timer::{
    api::create_router,
    clock::SystemClock,
    config::Config,
    engine::{Scheduler, TimerEngine},
    state::AppState,
    storage::JsonFileStore,
    tasks::{attach_event_logger, ticker_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("standup_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting standup-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, settings={}, tick={}ms",
          config.host, config.port, config.settings_file.display(), config.tick_ms);

    // Build the engine and load persisted settings
    let store = Arc::new(JsonFileStore::new(&config.settings_file));
    let mut engine = TimerEngine::new(store, Arc::new(SystemClock))
        .with_scheduler(Scheduler::new(config.tick_period()));
    if let Err(e) = engine.initialize().await {
        tracing::warn!("Failed to load settings, using defaults: {}", e);
    }
    attach_event_logger(&mut engine);

    if config.autostart {
        engine.start();
        if !engine.is_running() {
            tracing::warn!("Autostart skipped: no participants configured");
        }
    }

    // Create application state
    let state = AppState::new(engine, config.port, config.host.clone());

    // Start the scheduler driver
    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        ticker_task(ticker_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start /stop /pause /resume /toggle-pause");
    info!("  POST /next /previous /reset /reset-all /minimize");
    info!("  GET  /state /display /summary /settings /status /health");
    info!("  PUT  /settings       - Update settings");
    info!("  GET  /host-match?url - Check a page against the configured host");
    info!("  GET  /events         - Server-sent timer events");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
