use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::operations::{
    get_progress_summary, is_lesson_category, list_progress_summaries, mark_item_complete,
    MarkOutcome, LESSON_CATEGORIES,
};
use crate::response::AppError;
use crate::routes::{parse_json, required};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/progress/summary/:user_id", get(summary))
        .route("/api/progress/all_children", get(all_children))
        .route("/api/progress/mark_item_complete", put(mark_complete))
}

#[derive(Debug, Deserialize)]
struct MarkItemRequest {
    user_id: Option<String>,
    category: Option<String>,
    item: Option<String>,
}

#[derive(Serialize)]
struct MarkItemResponse {
    success: bool,
    message: &'static str,
    category: String,
    item: String,
}

async fn summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.require_store()?;
    match get_progress_summary(&store, user_id.trim()).await? {
        Some(summary) => Ok(Json(summary)),
        None => Err(AppError::not_found("Progress not found")),
    }
}

async fn all_children(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let store = state.require_store()?;
    Ok(Json(list_progress_summaries(&store).await?))
}

async fn mark_complete(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: MarkItemRequest = parse_json(&body)?;

    let (Some(user_id), Some(category), Some(item)) = (
        required(payload.user_id),
        required(payload.category).map(|c| c.to_lowercase()),
        required(payload.item),
    ) else {
        return Err(AppError::validation("user_id, category and item are required"));
    };

    if !is_lesson_category(&category) {
        return Err(AppError::validation(format!(
            "Invalid category, expected one of: {}",
            LESSON_CATEGORIES.join(", ")
        )));
    }

    let store = state.require_store()?;
    let message = match mark_item_complete(&store, &user_id, &category, &item).await? {
        MarkOutcome::Added => "Item marked as complete",
        MarkOutcome::AlreadyCompleted => "Item already completed",
        MarkOutcome::MissingProfile => return Err(AppError::not_found("Progress not found")),
    };

    tracing::debug!(%user_id, %category, %item, outcome = message, "lesson item update");

    Ok(Json(MarkItemResponse {
        success: true,
        message,
        category,
        item,
    }))
}
