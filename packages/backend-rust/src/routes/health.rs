use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/info", get(info))
        .route("/live", get(live))
}

async fn root(State(state): State<AppState>) -> Response {
    let db_status = database_check(&state).await;
    let ok = matches!(db_status, DbCheckStatus::Connected { .. });
    let latency_ms = match db_status {
        DbCheckStatus::Connected { latency_ms } => Some(latency_ms),
        _ => None,
    };

    let response = HealthResponse {
        database: db_status.as_str(),
        database_latency_ms: latency_ms,
        timestamp: now_iso(),
        status: if ok { "ok" } else { "degraded" },
    };

    let status_code = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response)).into_response()
}

async fn info(State(state): State<AppState>) -> Response {
    let response = HealthInfoResponse {
        service: "smart-tutor-backend",
        version: std::env::var("APP_VERSION")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
        environment: std::env::var("APP_ENV")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "development".to_string()),
        start_time: system_time_iso(state.started_at_system()),
        uptime: state.uptime_seconds(),
    };

    Json(response).into_response()
}

async fn live(State(state): State<AppState>) -> Response {
    let memory_healthy = check_memory_health(0.9);

    let response = LivenessResponse {
        status: if memory_healthy { "healthy" } else { "unhealthy" },
        timestamp: now_iso(),
        uptime: state.uptime_seconds(),
        checks: LivenessChecks {
            process: true,
            memory: memory_healthy,
        },
    };

    let status_code = if memory_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response)).into_response()
}

/// Which external services this instance can reach
pub(super) async fn api_status(State(state): State<AppState>) -> Response {
    Json(ServiceStatusResponse {
        llm: state.llm().is_available(),
        speech_to_text: state.stt().is_available(),
        elevenlabs_tts: state.tts().is_available(),
        browser_tts: true,
        database: state.store().is_some(),
    })
    .into_response()
}

/// Which backend serves poem and narration requests
pub(super) async fn model_status(State(state): State<AppState>) -> Response {
    let llm = state.llm().is_available();
    let elevenlabs = state.tts().is_available();
    Json(ModelStatusResponse {
        poem_generation: PoemGenerationStatus {
            llm,
            recommendation: if llm { "llm" } else { "unavailable" },
        },
        audio_generation: AudioGenerationStatus {
            elevenlabs_tts: elevenlabs,
            browser_tts: true,
            recommendation: if elevenlabs { "elevenlabs_tts" } else { "browser_tts" },
        },
    })
    .into_response()
}

enum DbCheckStatus {
    Connected { latency_ms: u64 },
    Timeout,
    Disconnected,
}

impl DbCheckStatus {
    fn as_str(&self) -> &'static str {
        match self {
            DbCheckStatus::Connected { .. } => "connected",
            DbCheckStatus::Timeout => "timeout",
            DbCheckStatus::Disconnected => "disconnected",
        }
    }
}

async fn database_check(state: &AppState) -> DbCheckStatus {
    let Some(store) = state.store() else {
        return DbCheckStatus::Disconnected;
    };

    match tokio::time::timeout(DB_CHECK_TIMEOUT, store.ping()).await {
        Ok(Ok(latency)) => DbCheckStatus::Connected {
            latency_ms: latency.as_millis() as u64,
        },
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "database health check failed");
            DbCheckStatus::Disconnected
        }
        Err(_) => DbCheckStatus::Timeout,
    }
}

fn system_time_iso(time: std::time::SystemTime) -> String {
    let datetime: chrono::DateTime<chrono::Utc> = time.into();
    datetime.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn check_memory_health(threshold: f64) -> bool {
    let rss = read_proc_self_status_kb("VmRSS").unwrap_or(0) * 1024;
    if rss == 0 {
        return true;
    }

    let limit = 1_400_000_000f64;
    (rss as f64) / limit < threshold
}

fn read_proc_self_status_kb(prefix: &str) -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    status
        .lines()
        .map(str::trim_start)
        .find(|line| line.starts_with(prefix))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|value| value.parse().ok())
}

#[derive(Serialize)]
struct HealthResponse {
    database: &'static str,
    #[serde(rename = "databaseLatencyMs", skip_serializing_if = "Option::is_none")]
    database_latency_ms: Option<u64>,
    timestamp: String,
    status: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthInfoResponse {
    service: &'static str,
    version: String,
    environment: String,
    start_time: String,
    uptime: u64,
}

#[derive(Serialize)]
struct LivenessResponse {
    status: &'static str,
    timestamp: String,
    uptime: u64,
    checks: LivenessChecks,
}

#[derive(Serialize)]
struct LivenessChecks {
    process: bool,
    memory: bool,
}

#[derive(Serialize)]
struct ServiceStatusResponse {
    llm: bool,
    speech_to_text: bool,
    elevenlabs_tts: bool,
    browser_tts: bool,
    database: bool,
}

#[derive(Serialize)]
struct ModelStatusResponse {
    poem_generation: PoemGenerationStatus,
    audio_generation: AudioGenerationStatus,
}

#[derive(Serialize)]
struct PoemGenerationStatus {
    llm: bool,
    recommendation: &'static str,
}

#[derive(Serialize)]
struct AudioGenerationStatus {
    elevenlabs_tts: bool,
    browser_tts: bool,
    recommendation: &'static str,
}
