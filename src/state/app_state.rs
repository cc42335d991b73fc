//! Shared application state for the HTTP server

use std::{sync::Arc, time::Instant};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::warn;

use crate::{
    engine::TimerEngine,
    events::{EventKind, TimerEvent},
};

/// Everything the handlers and background tasks share
pub struct AppState {
    /// The single timer this server hosts
    engine: Mutex<TimerEngine>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: std::sync::Mutex<Option<(String, DateTime<Utc>)>>,
    /// Fan-out of engine events to streaming clients
    pub event_tx: broadcast::Sender<TimerEvent>,
}

impl AppState {
    /// Wrap an engine, forwarding every non-tick event to `event_tx`
    pub fn new(mut engine: TimerEngine, port: u16, host: String) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(100);
        for kind in EventKind::ALL {
            if kind == EventKind::Tick {
                continue;
            }
            let tx = event_tx.clone();
            engine.on(kind, move |event| {
                // No subscribers is fine
                tx.send(event.clone()).ok();
            });
        }

        Arc::new(Self {
            engine: Mutex::new(engine),
            start_time: Instant::now(),
            port,
            host,
            last_action: std::sync::Mutex::new(None),
            event_tx,
        })
    }

    /// Lock the engine for the duration of one operation
    pub async fn engine(&self) -> MutexGuard<'_, TimerEngine> {
        self.engine.lock().await
    }

    /// Run a timer operation and record it as the last action
    pub async fn act<F, T>(&self, action: &str, op: F) -> T
    where
        F: FnOnce(&mut TimerEngine) -> T,
    {
        let result = {
            let mut engine = self.engine.lock().await;
            op(&mut *engine)
        };
        self.record_action(action);
        result
    }

    pub fn record_action(&self, action: &str) {
        match self.last_action.lock() {
            Ok(mut last) => *last = Some((action.to_string(), Utc::now())),
            Err(e) => warn!("Failed to record last action: {}", e),
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|last| last.clone()) {
            Some((action, at)) => (Some(action), Some(at)),
            None => (None, None),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
