//! Deepgram pre-recorded transcription client

use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;

use crate::services::http::{build_client, env_string, env_u64, send_with_retry, HttpError};

const DEFAULT_MODEL: &str = "nova-2";
const DEFAULT_ENDPOINT: &str = "https://api.deepgram.com";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_CONTENT_TYPE: &str = "audio/webm";
const TRANSCRIPT_POINTER: &str = "/results/channels/0/alternatives/0/transcript";

#[derive(Debug, Clone)]
pub struct SttConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl SttConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env_string("DEEPGRAM_API_KEY"),
            model: env_string("DEEPGRAM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: env_string("DEEPGRAM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: Duration::from_millis(env_u64("STT_TIMEOUT").unwrap_or(DEFAULT_TIMEOUT_MS)),
        }
    }
}

#[derive(Debug, Error)]
pub enum SttError {
    #[error("speech-to-text not configured: {0}")]
    NotConfigured(&'static str),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct SpeechToText {
    config: SttConfig,
    client: reqwest::Client,
}

impl SpeechToText {
    pub fn new(config: SttConfig) -> Self {
        let client = build_client(config.timeout);
        Self { config, client }
    }

    pub fn from_env() -> Self {
        Self::new(SttConfig::from_env())
    }

    pub fn is_available(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    /// Transcribe one clip. A response without a transcript yields `""`.
    pub async fn transcribe(&self, audio: Bytes, content_type: Option<&str>) -> Result<String, SttError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(SttError::NotConfigured("DEEPGRAM_API_KEY"))?;

        let url = format!("{}/v1/listen", self.config.endpoint.trim_end_matches('/'));
        let content_type = content_type
            .filter(|v| v.starts_with("audio/") || v.starts_with("video/"))
            .unwrap_or(DEFAULT_CONTENT_TYPE);
        let query = [
            ("model", self.config.model.as_str()),
            ("language", "en"),
            ("punctuate", "false"),
            ("smart_format", "false"),
        ];

        let resp = send_with_retry("speech_to_text", || {
            self.client
                .post(&url)
                .query(&query)
                .header(reqwest::header::AUTHORIZATION, format!("Token {api_key}"))
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(audio.clone())
        })
        .await?;

        let bytes = resp.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        Ok(extract_transcript(&value))
    }
}

pub fn extract_transcript(value: &serde_json::Value) -> String {
    value
        .pointer(TRANSCRIPT_POINTER)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
