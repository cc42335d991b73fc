//! Scheduler driver: delivers periodic ticks to the engine

use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::{engine::TickOutcome, state::AppState};

/// Background task that ticks the engine at its configured period.
///
/// Missed ticks are skipped rather than replayed; the engine recomputes
/// elapsed time from timestamps, so nothing is lost.
pub async fn ticker_task(state: Arc<AppState>) {
    let period = state.engine().await.tick_period();
    info!("Starting ticker task with a {:?} period", period);

    let mut ticks = interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticks.tick().await;

        let outcome = state.engine().await.tick();
        if let TickOutcome::Rotated { from, to } = outcome {
            debug!("Countdown rotated turn from #{} to #{}", from, to);
            state.record_action("auto-rotate");
        }
    }
}
