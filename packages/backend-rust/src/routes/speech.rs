use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use serde::Serialize;

use crate::db::now_iso;
use crate::db::operations::{list_speech_attempts, record_speech_attempt};
use crate::response::AppError;
use crate::routes::parse_user_id;
use crate::services::analytics::speech_analytics;
use crate::services::pronunciation::{analyze, SpeechAnalysis, DEFAULT_LESSON_TYPE, MIN_AUDIO_BYTES};
use crate::services::speech_to_text::SttError;
use crate::state::AppState;

/// Upload cap for one recorded clip
const MAX_AUDIO_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const NO_SPEECH_REWARD: &str = "🎤 I didn’t hear anything! Try again!";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/analyze_speech",
            post(analyze_speech).layer(DefaultBodyLimit::max(MAX_AUDIO_UPLOAD_BYTES)),
        )
        .route("/api/speech-analytics/:user_id", get(analytics))
}

#[derive(Default)]
struct SpeechUpload {
    audio: Option<Bytes>,
    audio_content_type: Option<String>,
    expected_text: Option<String>,
    user_id: Option<String>,
    lesson_type: Option<String>,
}

impl SpeechUpload {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut upload = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| AppError::bad_request(format!("Invalid multipart body: {err}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "audio" => {
                    upload.audio_content_type = field.content_type().map(str::to_string);
                    upload.audio = Some(field.bytes().await.map_err(|err| {
                        AppError::bad_request(format!("Failed to read audio: {err}"))
                    })?);
                }
                "expected_text" | "user_id" | "lesson_type" => {
                    let value = field.text().await.map_err(|err| {
                        AppError::bad_request(format!("Failed to read {name}: {err}"))
                    })?;
                    let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                    match name.as_str() {
                        "expected_text" => upload.expected_text = value,
                        "user_id" => upload.user_id = value,
                        _ => upload.lesson_type = value,
                    }
                }
                _ => {}
            }
        }
        Ok(upload)
    }
}

#[derive(Serialize)]
struct NoSpeechResponse {
    success: bool,
    error: &'static str,
    expected_text: String,
    recognized_text: &'static str,
    accuracy: f64,
    stars: u8,
    points_added: i64,
    reward: &'static str,
}

#[derive(Serialize)]
struct SpeechResponse {
    success: bool,
    expected_text: String,
    recognized_text: String,
    accuracy: f64,
    match_type: &'static str,
    reward: &'static str,
    stars: u8,
    reward_audio: Option<String>,
    use_browser_tts: bool,
    tts_text: String,
    points_added: i64,
    lesson_type: String,
}

#[derive(Serialize)]
struct NoDataResponse {
    error: &'static str,
}

async fn analyze_speech(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload = SpeechUpload::read(multipart).await?;

    let Some(audio) = upload.audio else {
        return Err(AppError::bad_request("No audio file provided"));
    };
    let Some(expected_text) = upload.expected_text else {
        return Err(AppError::bad_request("Expected text is required"));
    };
    if audio.len() < MIN_AUDIO_BYTES {
        return Err(AppError::bad_request("Audio too short, please speak longer"));
    }
    if !state.stt().is_available() {
        return Err(AppError::not_configured("Speech recognition is not configured"));
    }

    let lesson_type = upload
        .lesson_type
        .map(|l| l.to_lowercase())
        .unwrap_or_else(|| DEFAULT_LESSON_TYPE.to_string());

    let recognized = state
        .stt()
        .transcribe(audio, upload.audio_content_type.as_deref())
        .await
        .map_err(|err| match err {
            SttError::NotConfigured(_) => {
                AppError::not_configured("Speech recognition is not configured")
            }
            other => {
                tracing::warn!(error = %other, "speech recognition failed");
                AppError::bad_gateway("Speech recognition failed")
            }
        })?;

    let Some(analysis) = analyze(&expected_text, &recognized) else {
        tracing::debug!(expected = %expected_text, "no speech detected");
        return Ok(Json(NoSpeechResponse {
            success: false,
            error: "No speech detected",
            expected_text,
            recognized_text: "Silent",
            accuracy: 0.0,
            stars: 0,
            points_added: 0,
            reward: NO_SPEECH_REWARD,
        })
        .into_response());
    };

    if let Some(raw_user_id) = upload.user_id.as_deref() {
        persist_attempt(&state, raw_user_id, &analysis, &lesson_type, &expected_text, &recognized)
            .await;
    }

    let reward_audio = synthesize_reward(&state, &analysis.tts_text).await;

    tracing::info!(
        expected = %expected_text,
        recognized = %recognized,
        accuracy = analysis.result.score,
        match_type = analysis.result.category.as_str(),
        "speech analyzed"
    );

    Ok(Json(SpeechResponse {
        success: true,
        expected_text,
        recognized_text: recognized,
        accuracy: analysis.result.score,
        match_type: analysis.result.category.as_str(),
        reward: analysis.reward(),
        stars: analysis.stars(),
        use_browser_tts: reward_audio.is_none(),
        reward_audio,
        tts_text: analysis.tts_text.clone(),
        points_added: analysis.points(),
        lesson_type,
    })
    .into_response())
}

/// History and points are best effort, the child still gets feedback
async fn persist_attempt(
    state: &AppState,
    raw_user_id: &str,
    analysis: &SpeechAnalysis,
    lesson_type: &str,
    expected: &str,
    recognized: &str,
) {
    let user_id = match parse_user_id(raw_user_id) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!(user_id = raw_user_id, "invalid user id, speech attempt not saved");
            return;
        }
    };
    let Some(store) = state.store() else {
        tracing::warn!(%user_id, "database unavailable, speech attempt not saved");
        return;
    };

    let attempt = analysis.to_attempt(lesson_type, expected, recognized, now_iso());
    if let Err(err) = record_speech_attempt(&store, &user_id, &attempt).await {
        tracing::warn!(%user_id, error = %err, "failed to save speech attempt");
    }
}

/// Base64 MP3, or `None` when the browser has to speak instead
async fn synthesize_reward(state: &AppState, text: &str) -> Option<String> {
    if !state.tts().is_available() {
        return None;
    }
    match state.tts().synthesize(text).await {
        Ok(audio) => Some(base64::engine::general_purpose::STANDARD.encode(&audio)),
        Err(err) => {
            tracing::warn!(error = %err, "reward speech synthesis failed, falling back to browser TTS");
            None
        }
    }
}

async fn analytics(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, AppError> {
    let store = state.require_store()?;
    let history = list_speech_attempts(&store, user_id.trim()).await?;

    match speech_analytics(history) {
        Some(analytics) => Ok(Json(analytics).into_response()),
        None => Ok(Json(NoDataResponse {
            error: "No speech data found",
        })
        .into_response()),
    }
}
