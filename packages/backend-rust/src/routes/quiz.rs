use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tutor_algo::QuizAttemptRecord;

use crate::db::operations::{
    completed_items, find_user_by_id, insert_quiz_attempt, list_children, list_quiz_attempts,
    NewQuizAttempt,
};
use crate::response::AppError;
use crate::routes::{parse_json, parse_user_id, required};
use crate::services::analytics::quiz_analytics;
use crate::services::quiz_generator::{
    generate_quiz, QuizQuestion, QuizSource, DEFAULT_DIFFICULTY, DEFAULT_TOPIC,
};
use crate::state::AppState;

const UNKNOWN_STUDENT: &str = "Unknown Student";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/assessments/submit", post(submit_assessment))
        .route("/api/students", get(students))
        .route("/api/recommendation/:user_id", get(recommendation))
        .route("/api/quiz-analytics/:user_id", get(analytics))
        .route("/api/generate-ai-quiz", post(generate_ai_quiz))
}

#[derive(Debug, Deserialize)]
struct SubmitRequest {
    user_id: Option<String>,
    category: Option<String>,
    questions: Option<serde_json::Value>,
    score: Option<f64>,
    total_questions: Option<f64>,
    percentage: Option<f64>,
    #[serde(rename = "timeElapsed")]
    time_elapsed: Option<f64>,
    #[serde(rename = "completedAt")]
    completed_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateQuizRequest {
    topic: Option<String>,
    difficulty: Option<String>,
}

#[derive(Serialize)]
struct SubmitResponse {
    success: bool,
    message: &'static str,
    assessment_id: String,
}

#[derive(Serialize)]
struct StudentEntry {
    #[serde(rename = "_id")]
    id: String,
    child_name: String,
}

#[derive(Serialize)]
struct StudentsResponse {
    students: Vec<StudentEntry>,
}

#[derive(Serialize)]
struct RecommendationResponse {
    message: &'static str,
    focus_areas: Vec<String>,
}

#[derive(Serialize)]
struct GeneratedQuizResponse {
    message: &'static str,
    questions: Vec<QuizQuestion>,
    topic: String,
    source: QuizSource,
}

async fn submit_assessment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: SubmitRequest = parse_json(&body)?;

    let (Some(raw_user_id), Some(category), Some(questions), Some(score), Some(total_questions)) = (
        required(payload.user_id),
        required(payload.category),
        payload.questions.filter(|q| !q.is_null()),
        payload.score,
        payload.total_questions,
    ) else {
        return Err(AppError::validation("Missing required fields"));
    };
    let user_id = parse_user_id(&raw_user_id)?;

    let store = state.require_store()?;
    let assessment_id = insert_quiz_attempt(
        &store,
        &NewQuizAttempt {
            user_id,
            category: category.to_lowercase(),
            questions,
            score,
            total_questions,
            percentage: payload.percentage,
            time_elapsed: payload.time_elapsed,
            completed_at: required(payload.completed_at),
        },
    )
    .await?;

    tracing::info!(%assessment_id, %category, score, total_questions, "assessment stored");

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            message: "Assessment submitted",
            assessment_id,
        }),
    ))
}

async fn students(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let store = state.require_store()?;
    let children = list_children(&store).await?;
    let students: Vec<StudentEntry> = children
        .into_iter()
        .map(|user| {
            let name = user.full_name();
            StudentEntry {
                child_name: if name.is_empty() {
                    UNKNOWN_STUDENT.to_string()
                } else {
                    name
                },
                id: user.id,
            }
        })
        .collect();
    Ok(Json(StudentsResponse { students }))
}

async fn recommendation(
    State(state): State<AppState>,
    Path(raw_user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_user_id(&raw_user_id)?;
    let store = state.require_store()?;

    if find_user_by_id(&store, &user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let history: Vec<QuizAttemptRecord> = match list_quiz_attempts(&store, &user_id).await {
        Ok(attempts) => attempts.iter().map(|a| a.to_record()).collect(),
        Err(err) => {
            tracing::warn!(%user_id, error = %err, "quiz history unavailable, using fallback topics");
            return Ok(Json(RecommendationResponse {
                message: "AI Recommendations Generated",
                focus_areas: state.selector().fallback_topics(),
            }));
        }
    };

    let selected = {
        let mut rng = rand::rng();
        state.selector().select_topics(&history, &mut rng)
    };
    let focus_areas = selected.unwrap_or_else(|err| {
        tracing::warn!(%user_id, error = %err, "topic selection failed, using fallback topics");
        state.selector().fallback_topics()
    });

    Ok(Json(RecommendationResponse {
        message: "AI Recommendations Generated",
        focus_areas,
    }))
}

async fn analytics(
    State(state): State<AppState>,
    Path(raw_user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_user_id(&raw_user_id)?;
    let store = state.require_store()?;

    if find_user_by_id(&store, &user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let history = list_quiz_attempts(&store, &user_id).await?;
    let completed = completed_items(&store, &user_id).await?;

    Ok(Json(quiz_analytics(
        history,
        &state.selector().config().categories,
        &completed,
    )))
}

async fn generate_ai_quiz(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: GenerateQuizRequest = if body.iter().all(u8::is_ascii_whitespace) {
        GenerateQuizRequest::default()
    } else {
        parse_json(&body)?
    };

    let topic = required(payload.topic)
        .map(|t| t.to_lowercase())
        .unwrap_or_else(|| DEFAULT_TOPIC.to_string());
    let difficulty = required(payload.difficulty).unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string());

    let quiz = generate_quiz(state.llm(), &topic, &difficulty).await;

    Ok(Json(GeneratedQuizResponse {
        message: "Quiz Generated",
        questions: quiz.questions,
        topic,
        source: quiz.source,
    }))
}
