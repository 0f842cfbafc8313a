pub mod analytics;
pub mod http;
pub mod llm_provider;
pub mod pronunciation;
pub mod quiz_generator;
pub mod speech_to_text;
pub mod text_to_speech;
pub mod tutor;

use crate::services::llm_provider::LLMProvider;
use crate::services::speech_to_text::SpeechToText;
use crate::services::text_to_speech::TextToSpeech;

/// Upstream clients shared by the handlers
#[derive(Clone)]
pub struct Services {
    pub llm: LLMProvider,
    pub stt: SpeechToText,
    pub tts: TextToSpeech,
}

impl Services {
    pub fn from_env() -> Self {
        Self {
            llm: LLMProvider::from_env(),
            stt: SpeechToText::from_env(),
            tts: TextToSpeech::from_env(),
        }
    }
}
