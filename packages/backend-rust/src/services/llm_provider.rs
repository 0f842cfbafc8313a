use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::http::{build_client, env_string, env_u64, send_with_retry, HttpError};

const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_API_ENDPOINT: &str = "https://api.groq.com/openai/v1";
const DEFAULT_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone)]
pub struct LLMConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_endpoint: String,
    pub timeout: Duration,
}

impl LLMConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env_string("LLM_API_KEY"),
            model: env_string("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_endpoint: normalize_endpoint(
                env_string("LLM_API_ENDPOINT")
                    .or_else(|| env_string("LLM_BASE_URL"))
                    .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
            ),
            timeout: Duration::from_millis(env_u64("LLM_TIMEOUT").unwrap_or(DEFAULT_TIMEOUT_MS)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Sampling knobs passed through to the completion endpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub json_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub model: Option<String>,
    pub choices: Vec<ChatChoice>,
    pub usage: Option<ChatUsage>,
}

impl ChatResponse {
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: Option<i64>,
    pub completion_tokens: Option<i64>,
    pub total_tokens: Option<i64>,
}

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("LLM not configured: {0}")]
    NotConfigured(&'static str),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("empty response")]
    EmptyChoices,
}

#[derive(Clone)]
pub struct LLMProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

impl LLMProvider {
    pub fn new(config: LLMConfig) -> Self {
        let client = build_client(config.timeout);
        Self { config, client }
    }

    pub fn from_env() -> Self {
        Self::new(LLMConfig::from_env())
    }

    pub fn is_available(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|v| !v.trim().is_empty())
            && !self.config.model.trim().is_empty()
            && !self.config.api_endpoint.trim().is_empty()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> Result<ChatResponse, LLMError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(LLMError::NotConfigured("LLM_API_KEY"))?;

        let url = format!(
            "{}/chat/completions",
            self.config.api_endpoint.trim_end_matches('/')
        );
        let mut payload = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "stream": false
        });
        if let Some(temperature) = options.temperature {
            payload["temperature"] = serde_json::json!(temperature);
        }
        if let Some(max_tokens) = options.max_tokens {
            payload["max_tokens"] = serde_json::json!(max_tokens);
        }
        if options.json_mode {
            payload["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        let resp = send_with_retry("llm", || {
            self.client.post(&url).bearer_auth(api_key).json(&payload)
        })
        .await?;

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %String::from_utf8_lossy(&bytes),
                "failed to parse LLM response JSON"
            );
            LLMError::Json(e)
        })
    }

    /// First choice text of a completion over `messages`
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> Result<String, LLMError> {
        let response = self.chat(messages, options).await?;
        response
            .first_content()
            .map(|s| s.to_string())
            .ok_or(LLMError::EmptyChoices)
    }

    pub async fn complete_with_system(
        &self,
        system: &str,
        user: &str,
        options: ChatOptions,
    ) -> Result<String, LLMError> {
        let messages = [ChatMessage::system(system), ChatMessage::user(user)];
        self.complete(&messages, options).await
    }
}

fn normalize_endpoint(endpoint: String) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.ends_with("/v1") || trimmed.contains("/v1/") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/v1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(endpoint: String, api_key: Option<&str>) -> LLMProvider {
        LLMProvider::new(LLMConfig {
            api_key: api_key.map(str::to_string),
            model: "test-model".into(),
            api_endpoint: normalize_endpoint(endpoint),
            timeout: Duration::from_secs(5),
        })
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(
            normalize_endpoint("https://api.groq.com/openai/v1/".into()),
            "https://api.groq.com/openai/v1"
        );
        assert_eq!(
            normalize_endpoint("http://localhost:8080".into()),
            "http://localhost:8080/v1"
        );
    }

    #[tokio::test]
    async fn test_complete_with_system() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "model": "test-model",
            "choices": [{"message": {"role": "assistant", "content": "A is for Apple 🍎"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 6, "total_tokens": 18}
        });
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({"model": "test-model", "max_tokens": 200})))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let llm = provider(server.uri(), Some("test-key"));
        assert!(llm.is_available());
        let text = llm
            .complete_with_system(
                "teacher",
                "what is A?",
                ChatOptions {
                    max_tokens: Some(200),
                    ..ChatOptions::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(text, "A is for Apple 🍎");
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let llm = provider("http://127.0.0.1:9".into(), None);
        assert!(!llm.is_available());
        let err = llm
            .complete_with_system("s", "u", ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let llm = provider(server.uri(), Some("k"));
        let err = llm
            .complete(&[ChatMessage::user("hi")], ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::EmptyChoices));
    }
}
