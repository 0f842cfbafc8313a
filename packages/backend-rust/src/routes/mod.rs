mod accounts;
mod health;
mod progress;
mod quiz;
mod speech;
mod tutor;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::response::{json_error, AppError};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let healthcheck_endpoint = normalize_healthcheck_endpoint(
        std::env::var("HEALTHCHECK_ENDPOINT")
            .ok()
            .as_deref()
            .unwrap_or("/health"),
    );

    let mut app = Router::new()
        .merge(accounts::router())
        .merge(progress::router())
        .merge(speech::router())
        .merge(quiz::router())
        .merge(tutor::router())
        .route(
            "/api/status",
            get(health::api_status).fallback(fallback_handler),
        )
        .route(
            "/api/model-status",
            get(health::model_status).fallback(fallback_handler),
        );

    app = app.nest("/health", health::router());
    if healthcheck_endpoint != "/health" && healthcheck_endpoint != "/" {
        app = app.nest(healthcheck_endpoint.as_str(), health::router());
    }

    app.fallback(fallback_handler).with_state(state)
}

/// JSON body or a 400, whatever the content type header says
pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|_| AppError::validation("Invalid JSON body"))
}

/// Trimmed value, or `None` when absent or blank
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// User ids are UUIDs, anything else is a client error
pub(crate) fn parse_user_id(raw: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| AppError::bad_request("Invalid user ID format"))
}

fn normalize_healthcheck_endpoint(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "/health".to_string();
    }

    let with_slash = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };

    if with_slash != "/" {
        with_slash.trim_end_matches('/').to_string()
    } else {
        "/".to_string()
    }
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Endpoint not found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_healthcheck_endpoint() {
        assert_eq!(normalize_healthcheck_endpoint(""), "/health");
        assert_eq!(normalize_healthcheck_endpoint("status/"), "/status");
        assert_eq!(normalize_healthcheck_endpoint("/ready//"), "/ready");
        assert_eq!(normalize_healthcheck_endpoint("/"), "/");
    }

    #[test]
    fn test_parse_user_id() {
        let id = Uuid::new_v4().to_string();
        assert_eq!(parse_user_id(&format!(" {id} ")).ok(), Some(id));
        let err = parse_user_id("not-an-id").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_required_drops_blank() {
        assert_eq!(required(Some("  ".into())), None);
        assert_eq!(required(None), None);
        assert_eq!(required(Some(" abc ".into())), Some("abc".into()));
    }

    #[test]
    fn test_parse_json_rejects_garbage() {
        let body = Bytes::from_static(b"{not json");
        let err = parse_json::<serde_json::Value>(&body).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
