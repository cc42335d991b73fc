//! HTTP control surface tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use standup_timer::{
    create_router,
    storage::StoredValues,
    AppState, ManualClock, MemoryStore, SettingsPatch, SettingsStore, StorageError, TimerEngine,
    TimerMode,
};

/// Store that reads as empty and refuses every write
struct ReadOnlyStore;

#[async_trait::async_trait]
impl SettingsStore for ReadOnlyStore {
    async fn get(&self, _keys: &[&str]) -> Result<StoredValues, StorageError> {
        Ok(StoredValues::new())
    }

    async fn set(&self, _values: StoredValues) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("read-only volume".into()))
    }
}

fn app_with(store: Arc<dyn SettingsStore>, clock: ManualClock) -> (Router, Arc<AppState>) {
    let engine = TimerEngine::new(store, Arc::new(clock)).with_settings(&SettingsPatch {
        participants: Some(vec!["Ann".into(), "Bo".into()]),
        total_time: Some(2.0),
        timer_mode: Some(TimerMode::Countup),
        ..Default::default()
    });
    let state = AppState::new(engine, 0, "127.0.0.1".into());
    (create_router(Arc::clone(&state)), state)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn start_next_and_summary_flow() {
    let clock = ManualClock::new(0);
    let (app, state) = app_with(Arc::new(MemoryStore::new()), clock.clone());

    let (status, body) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["currentParticipant"], "Ann");

    clock.advance_secs(10);
    let (_, body) = call(&app, "POST", "/next", None).await;
    assert_eq!(body["timer"]["currentParticipant"], "Bo");
    assert_eq!(body["timer"]["state"]["participantTimeTracker"]["Ann"], 10);

    let (status, summary) = call(&app, "GET", "/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary[0]["name"], "Ann");
    assert_eq!(summary[0]["timeTaken"], 10);
    assert_eq!(summary[0]["percentage"], 17);
    assert_eq!(summary[1]["isCurrent"], true);

    assert_eq!(state.get_last_action().0.as_deref(), Some("next"));
}

#[tokio::test]
async fn pause_reports_paused_status() {
    let (app, _state) = app_with(Arc::new(MemoryStore::new()), ManualClock::new(0));
    call(&app, "POST", "/start", None).await;

    let (_, body) = call(&app, "POST", "/toggle-pause", None).await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["timer"]["state"]["isPaused"], true);

    let (_, body) = call(&app, "POST", "/resume", None).await;
    assert_eq!(body["status"], "running");
}

#[tokio::test]
async fn settings_update_is_validated_and_persisted() {
    let store = Arc::new(MemoryStore::new());
    let (app, _state) = app_with(store.clone(), ManualClock::new(0));

    let (status, _) = call(&app, "PUT", "/settings", Some(json!({ "totalTime": 0 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(
        &app,
        "PUT",
        "/settings",
        Some(json!({ "participants": ["Ann", "  "] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = call(
        &app,
        "PUT",
        "/settings",
        Some(json!({ "participants": [" Ann ", "Bo", "Cy"], "totalTime": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["participants"], json!(["Ann", "Bo", "Cy"]));
    assert_eq!(body["timePerParticipant"], 60);

    let persisted = store.get(&["participants", "totalTime"]).await.unwrap();
    assert_eq!(persisted["participants"], json!(["Ann", "Bo", "Cy"]));
}

#[tokio::test]
async fn host_match_uses_configured_host() {
    let (app, _state) = app_with(Arc::new(MemoryStore::new()), ManualClock::new(0));

    let (_, body) = call(&app, "GET", "/host-match?url=https://www.linear.app/team", None).await;
    assert_eq!(body["matches"], true);
    assert_eq!(body["hostUrl"], "linear.app");

    let (_, body) = call(&app, "GET", "/host-match?url=not-a-url", None).await;
    assert_eq!(body["matches"], false);
}

#[tokio::test]
async fn display_and_health_endpoints() {
    let clock = ManualClock::new(0);
    let (app, _state) = app_with(Arc::new(MemoryStore::new()), clock.clone());
    call(&app, "POST", "/start", None).await;
    clock.advance_secs(65);

    let (_, display) = call(&app, "GET", "/display", None).await;
    assert_eq!(display["time"], "01:05");
    assert_eq!(display["isWarning"], false);

    let (status, health) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn settings_update_reports_storage_failure() {
    let (app, state) = app_with(Arc::new(ReadOnlyStore), ManualClock::new(0));

    let (status, _) = call(
        &app,
        "PUT",
        "/settings",
        Some(json!({ "participants": ["Cy"], "totalTime": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = call(&app, "GET", "/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["participants"], json!(["Ann", "Bo"]));
    assert_eq!(body["settings"]["totalTime"], 2.0);
    assert_eq!(state.get_last_action().0, None);
}
