use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::response::{json_error, AppError};
use crate::routes::{parse_json, required};
use crate::services::http::HttpError;
use crate::services::llm_provider::{ChatMessage, ChatOptions, LLMError};
use crate::services::text_to_speech::{TtsError, AUDIO_MIME_TYPE};
use crate::services::tutor::{
    chat_system_prompt, keyword_reply, make_text_baby_friendly, poem_prompt, usable_answer,
    CHAT_DEFAULT_REPLY, FALLBACK_ANSWER, TUTOR_SYSTEM_PROMPT,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ai", get(ask_tutor))
        .route("/api/tts", get(speak))
        .route("/generate-audio", post(generate_audio))
        .route("/api/chat", post(chat))
        .route("/generate-poem", post(generate_poem))
}

#[derive(Debug, Deserialize)]
struct AskQuery {
    question: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpeakQuery {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AudioRequest {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: Option<String>,
    #[serde(default)]
    context: ChatContext,
}

#[derive(Debug, Default, Deserialize)]
struct ChatContext {
    current_page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PoemRequest {
    topic: Option<String>,
}

#[derive(Serialize)]
struct ChatReply {
    reply: String,
    source: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct PoemResponse {
    poem: String,
    source: &'static str,
}

#[derive(Serialize)]
struct TutorAnswer {
    text: String,
    source: &'static str,
}

#[derive(Serialize)]
struct AudioResponse {
    audio_data: String,
    mime_type: &'static str,
    source: &'static str,
}

async fn ask_tutor(
    State(state): State<AppState>,
    Query(query): Query<AskQuery>,
) -> Result<impl IntoResponse, AppError> {
    let Some(question) = required(query.question) else {
        return Err(AppError::bad_request("Missing 'question' parameter"));
    };

    let options = ChatOptions {
        temperature: Some(0.5),
        max_tokens: Some(200),
        json_mode: false,
    };

    let answer = match state
        .llm()
        .complete_with_system(TUTOR_SYSTEM_PROMPT, &question, options)
        .await
    {
        Ok(raw) => usable_answer(&raw),
        Err(err) => {
            tracing::warn!(error = %err, "tutor completion failed");
            None
        }
    };

    Ok(Json(match answer {
        Some(text) => TutorAnswer { text, source: "llm" },
        None => TutorAnswer {
            text: FALLBACK_ANSWER.to_string(),
            source: "error_fallback",
        },
    }))
}

async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: ChatRequest = parse_json(&body)?;
    let Some(message) = required(payload.message) else {
        return Err(AppError::bad_request("No message provided"));
    };

    let llm = state.llm();
    if llm.is_available() {
        let system = chat_system_prompt(payload.context.current_page.as_deref());
        let options = ChatOptions {
            temperature: Some(0.7),
            max_tokens: Some(150),
            json_mode: false,
        };
        match llm.complete_with_system(&system, &message, options).await {
            Ok(raw) if !raw.trim().is_empty() => {
                return Ok(Json(ChatReply {
                    reply: raw.trim().to_string(),
                    source: "llm",
                    kind: "ai",
                }));
            }
            Ok(_) => tracing::warn!("chat completion was empty"),
            Err(err) => tracing::warn!(error = %err, "chat completion failed"),
        }
    }

    Ok(Json(match keyword_reply(&message) {
        Some(reply) => ChatReply {
            reply: reply.to_string(),
            source: "rule_based",
            kind: "system",
        },
        None => ChatReply {
            reply: CHAT_DEFAULT_REPLY.to_string(),
            source: "default",
            kind: "system",
        },
    }))
}

async fn generate_poem(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: PoemRequest = parse_json(&body)?;
    let Some(topic) = required(payload.topic) else {
        return Err(AppError::bad_request("No topic provided"));
    };

    let options = ChatOptions {
        temperature: Some(0.8),
        max_tokens: Some(200),
        json_mode: false,
    };
    let poem = state
        .llm()
        .complete(&[ChatMessage::user(poem_prompt(&topic))], options)
        .await
        .map_err(|err| match err {
            LLMError::NotConfigured(_) => AppError::not_configured("LLM is not configured on the server"),
            LLMError::EmptyChoices => no_poem(),
            LLMError::Http(HttpError::HttpStatus { status, .. }) if status.as_u16() == 429 => {
                json_error(
                    StatusCode::TOO_MANY_REQUESTS,
                    "RATE_LIMITED",
                    "⏰ Daily limit reached. Please wait or use a predefined rhyme.",
                )
            }
            other => {
                tracing::warn!(error = %other, %topic, "poem generation failed");
                AppError::bad_gateway("Poem generation failed")
            }
        })?;

    let poem = poem.trim();
    if poem.is_empty() {
        return Err(no_poem());
    }

    Ok(Json(PoemResponse {
        poem: poem.to_string(),
        source: "llm",
    }))
}

fn no_poem() -> AppError {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "EMPTY_RESPONSE",
        "No poem generated.",
    )
}

async fn speak(
    State(state): State<AppState>,
    Query(query): Query<SpeakQuery>,
) -> Result<Response, AppError> {
    let Some(text) = required(query.text) else {
        return Err(AppError::bad_request("Missing 'text' parameter"));
    };

    let audio = synthesize(&state, &text).await?;
    Ok((
        [
            (header::CONTENT_TYPE, AUDIO_MIME_TYPE),
            (header::CONTENT_DISPOSITION, "inline; filename=\"speech.mp3\""),
        ],
        Body::from(audio),
    )
        .into_response())
}

async fn generate_audio(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: AudioRequest = parse_json(&body)?;
    let Some(text) = required(payload.text) else {
        return Err(AppError::bad_request("No text provided"));
    };

    let audio = synthesize(&state, &make_text_baby_friendly(&text)).await?;
    Ok(Json(AudioResponse {
        audio_data: base64::engine::general_purpose::STANDARD.encode(&audio),
        mime_type: AUDIO_MIME_TYPE,
        source: "elevenlabs",
    }))
}

async fn synthesize(state: &AppState, text: &str) -> Result<Bytes, AppError> {
    state.tts().synthesize(text).await.map_err(|err| match err {
        TtsError::NotConfigured(_) => AppError::not_configured("TTS keys are not configured on the server"),
        other => {
            tracing::warn!(error = %other, "speech synthesis failed");
            AppError::bad_gateway("Speech synthesis failed")
        }
    })
}
