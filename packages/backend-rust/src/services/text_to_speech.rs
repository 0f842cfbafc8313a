//! ElevenLabs speech synthesis client

use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;

use crate::services::http::{build_client, env_string, env_u64, send_with_retry, HttpError};

/// "Bella", a soft voice that suits young children
const DEFAULT_VOICE_ID: &str = "EXAVITQu4vr4xnSDxMaL";
const DEFAULT_MODEL: &str = "eleven_multilingual_v2";
const DEFAULT_ENDPOINT: &str = "https://api.elevenlabs.io";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

#[derive(Debug, Clone)]
pub struct TtsConfig {
    pub api_key: Option<String>,
    pub voice_id: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl TtsConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env_string("ELEVENLABS_API_KEY"),
            voice_id: env_string("ELEVENLABS_VOICE_ID").unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
            model: env_string("ELEVENLABS_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: env_string("ELEVENLABS_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: Duration::from_millis(env_u64("TTS_TIMEOUT").unwrap_or(DEFAULT_TIMEOUT_MS)),
        }
    }
}

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("text-to-speech not configured: {0}")]
    NotConfigured(&'static str),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("empty audio response")]
    EmptyAudio,
}

#[derive(Clone)]
pub struct TextToSpeech {
    config: TtsConfig,
    client: reqwest::Client,
}

impl TextToSpeech {
    pub fn new(config: TtsConfig) -> Self {
        let client = build_client(config.timeout);
        Self { config, client }
    }

    pub fn from_env() -> Self {
        Self::new(TtsConfig::from_env())
    }

    pub fn is_available(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    /// MP3 audio for `text`
    pub async fn synthesize(&self, text: &str) -> Result<Bytes, TtsError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(TtsError::NotConfigured("ELEVENLABS_API_KEY"))?;

        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.voice_id
        );
        let payload = serde_json::json!({
            "text": text,
            "model_id": self.config.model,
            "voice_settings": {
                "stability": 0.5,
                "similarity_boost": 0.8
            }
        });

        let resp = send_with_retry("text_to_speech", || {
            self.client
                .post(&url)
                .header("xi-api-key", api_key)
                .header(reqwest::header::ACCEPT, AUDIO_MIME_TYPE)
                .json(&payload)
        })
        .await?;

        let audio = resp.bytes().await?;
        if audio.is_empty() {
            return Err(TtsError::EmptyAudio);
        }
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_synthesize_returns_audio() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/voice-1"))
            .and(header("xi-api-key", "el-key"))
            .and(body_partial_json(serde_json::json!({"text": "Great job!"})))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x49, 0x44, 0x33]))
            .mount(&server)
            .await;

        let tts = TextToSpeech::new(TtsConfig {
            api_key: Some("el-key".into()),
            voice_id: "voice-1".into(),
            model: DEFAULT_MODEL.into(),
            endpoint: server.uri(),
            timeout: Duration::from_secs(5),
        });
        let audio = tts.synthesize("Great job!").await.unwrap();
        assert_eq!(&audio[..], b"ID3");
    }

    #[tokio::test]
    async fn test_unconfigured() {
        let tts = TextToSpeech::new(TtsConfig {
            api_key: Some("  ".into()),
            voice_id: "v".into(),
            model: "m".into(),
            endpoint: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(1),
        });
        assert!(!tts.is_available());
        assert!(matches!(
            tts.synthesize("hi").await,
            Err(TtsError::NotConfigured(_))
        ));
    }
}
