//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{
    engine::{DisplayTime, ParticipantSummary, TimerEngine},
    settings::SettingsPatch,
    state::AppState,
    utils::matches_host,
};
use super::responses::{
    ApiResponse, HealthResponse, HostMatchQuery, HostMatchResponse, SettingsResponse,
    StatusResponse, TimerSnapshot,
};

/// Apply a timer operation and answer with the resulting snapshot
async fn control<F>(state: &AppState, action: &str, message: &str, op: F) -> Json<ApiResponse>
where
    F: FnOnce(&mut TimerEngine),
{
    let snapshot = state
        .act(action, |engine| {
            op(engine);
            TimerSnapshot::capture(engine)
        })
        .await;
    info!("{} endpoint called", action);
    Json(ApiResponse::new(message, snapshot))
}

/// Handle POST /start - Start the meeting from the first participant
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    control(&state, "start", "Timer started", TimerEngine::start).await
}

/// Handle POST /stop - Stop ticking
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    control(&state, "stop", "Timer stopped", TimerEngine::stop).await
}

/// Handle POST /pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    control(&state, "pause", "Timer paused", TimerEngine::pause).await
}

/// Handle POST /resume
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    control(&state, "resume", "Timer resumed", TimerEngine::resume).await
}

/// Handle POST /toggle-pause
pub async fn toggle_pause_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    control(&state, "toggle-pause", "Pause toggled", TimerEngine::toggle_pause).await
}

/// Handle POST /next - Pass the turn forward
pub async fn next_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    control(&state, "next", "Moved to next participant", TimerEngine::next_participant).await
}

/// Handle POST /previous - Pass the turn back
pub async fn previous_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    control(&state, "previous", "Moved to previous participant", TimerEngine::previous_participant).await
}

/// Handle POST /reset - Zero the current participant
pub async fn reset_current_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    control(&state, "reset", "Current participant reset", TimerEngine::reset_current_participant).await
}

/// Handle POST /reset-all - Zero everyone and return to the first participant
pub async fn reset_all_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    control(&state, "reset-all", "All participants reset", TimerEngine::reset_all).await
}

/// Handle POST /minimize - Flip the minimized flag
pub async fn minimize_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    control(&state, "minimize", "Minimized state toggled", TimerEngine::toggle_minimized).await
}

/// Handle GET /state - Current timer snapshot
pub async fn state_handler(State(state): State<Arc<AppState>>) -> Json<TimerSnapshot> {
    let engine = state.engine().await;
    Json(TimerSnapshot::capture(&engine))
}

/// Handle GET /display
pub async fn display_handler(State(state): State<Arc<AppState>>) -> Json<DisplayTime> {
    Json(state.engine().await.get_display_time())
}

/// Handle GET /summary - Per-participant report
pub async fn summary_handler(State(state): State<Arc<AppState>>) -> Json<Vec<ParticipantSummary>> {
    Json(state.engine().await.get_summary())
}

/// Handle GET /settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    let engine = state.engine().await;
    Json(SettingsResponse {
        settings: engine.get_settings(),
        time_per_participant: engine.get_time_per_participant(),
        timestamp: chrono::Utc::now(),
    })
}

/// Handle PUT /settings - Validate, persist and apply a partial update
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<SettingsResponse>, StatusCode> {
    let patch = match patch.validate() {
        Ok(patch) => patch,
        Err(e) => {
            warn!("Rejected settings update: {}", e);
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
    };

    let mut engine = state.engine().await;
    if let Err(e) = engine.update_settings(patch).await {
        error!("Failed to persist settings: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let response = SettingsResponse {
        settings: engine.get_settings(),
        time_per_participant: engine.get_time_per_participant(),
        timestamp: chrono::Utc::now(),
    };
    drop(engine);

    state.record_action("update-settings");
    Ok(Json(response))
}

/// Handle GET /host-match?url= - Whether the timer belongs on a page
pub async fn host_match_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HostMatchQuery>,
) -> Json<HostMatchResponse> {
    let settings = state.engine().await.get_settings();
    Json(HostMatchResponse {
        matches: matches_host(&query.url, &settings.host_url),
        url: query.url,
        host_url: settings.host_url,
        show_timer: settings.show_timer,
    })
}

/// Handle GET /events - Server-sent stream of timer events (ticks excluded)
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_tx.subscribe();
    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let sse = match Event::default().event(event.kind.as_str()).json_data(&event) {
                        Ok(sse) => sse,
                        Err(e) => {
                            error!("Failed to encode timer event: {}", e);
                            continue;
                        }
                    };
                    return Some((Ok(sse), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} event(s)", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /status - Return current server and timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = {
        let engine = state.engine().await;
        TimerSnapshot::capture(&engine)
    };
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
