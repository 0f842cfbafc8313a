#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use serde_json::Value;
use tutor_algo::CurriculumConfig;

use smart_tutor_backend::create_app_with;
use smart_tutor_backend::db::ProgressStore;
use smart_tutor_backend::services::llm_provider::{LLMConfig, LLMProvider};
use smart_tutor_backend::services::speech_to_text::{SpeechToText, SttConfig};
use smart_tutor_backend::services::text_to_speech::{TextToSpeech, TtsConfig};
use smart_tutor_backend::services::Services;
use smart_tutor_backend::state::AppState;

pub const TEST_BCRYPT_COST: u32 = 4;
pub const MULTIPART_BOUNDARY: &str = "tutor-test-boundary";

pub fn llm(endpoint: Option<String>) -> LLMProvider {
    LLMProvider::new(LLMConfig {
        api_key: endpoint.as_ref().map(|_| "llm-key".to_string()),
        model: "test-model".into(),
        api_endpoint: endpoint.map(|e| format!("{e}/v1")).unwrap_or_else(|| "http://127.0.0.1:9/v1".into()),
        timeout: Duration::from_secs(5),
    })
}

pub fn stt(endpoint: Option<String>) -> SpeechToText {
    SpeechToText::new(SttConfig {
        api_key: endpoint.as_ref().map(|_| "dg-key".to_string()),
        model: "nova-2".into(),
        endpoint: endpoint.unwrap_or_else(|| "http://127.0.0.1:9".into()),
        timeout: Duration::from_secs(5),
    })
}

pub fn tts(endpoint: Option<String>) -> TextToSpeech {
    TextToSpeech::new(TtsConfig {
        api_key: endpoint.as_ref().map(|_| "xi-key".to_string()),
        voice_id: "voice-1".into(),
        model: "eleven_multilingual_v2".into(),
        endpoint: endpoint.unwrap_or_else(|| "http://127.0.0.1:9".into()),
        timeout: Duration::from_secs(5),
    })
}

/// No upstream service configured
pub fn offline_services() -> Services {
    Services {
        llm: llm(None),
        stt: stt(None),
        tts: tts(None),
    }
}

pub async fn create_test_app() -> Router {
    create_test_app_with(offline_services()).await
}

pub async fn create_test_app_with(services: Services) -> Router {
    let store = ProgressStore::in_memory().await.unwrap();
    let state = AppState::new(
        Some(store),
        CurriculumConfig::default(),
        services,
        TEST_BCRYPT_COST,
    );
    create_app_with(state)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// multipart/form-data with text fields plus an optional `audio` file part
pub fn speech_upload(fields: &[(&str, &str)], audio: Option<&[u8]>) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(audio) = audio {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"clip.webm\"\r\nContent-Type: audio/webm\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(audio);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/analyze_speech")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Registers a child and returns its user id
pub async fn register_child(app: &Router, username: &str, password: &str) -> String {
    use tower::ServiceExt;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/register",
            serde_json::json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "username": username,
                "password": password,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    read_json(response).await["user_id"]
        .as_str()
        .unwrap()
        .to_string()
}
