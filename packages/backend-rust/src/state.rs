use std::sync::Arc;
use std::time::{Instant, SystemTime};

use tutor_algo::{CurriculumConfig, TopicSelector};

use crate::db::ProgressStore;
use crate::response::AppError;
use crate::services::llm_provider::LLMProvider;
use crate::services::speech_to_text::SpeechToText;
use crate::services::text_to_speech::TextToSpeech;
use crate::services::Services;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    store: Option<Arc<ProgressStore>>,
    selector: Arc<TopicSelector>,
    services: Arc<Services>,
    password_cost: u32,
}

impl AppState {
    pub fn new(
        store: Option<ProgressStore>,
        curriculum: CurriculumConfig,
        services: Services,
        password_cost: u32,
    ) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            store: store.map(Arc::new),
            selector: Arc::new(TopicSelector::new(curriculum)),
            services: Arc::new(services),
            password_cost,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn store(&self) -> Option<Arc<ProgressStore>> {
        self.store.clone()
    }

    /// Store or a 503 for handlers that cannot work without it
    pub fn require_store(&self) -> Result<Arc<ProgressStore>, AppError> {
        self.store()
            .ok_or_else(|| AppError::service_unavailable("Database connection failed"))
    }

    pub fn selector(&self) -> &TopicSelector {
        &self.selector
    }

    pub fn llm(&self) -> &LLMProvider {
        &self.services.llm
    }

    pub fn stt(&self) -> &SpeechToText {
        &self.services.stt
    }

    pub fn tts(&self) -> &TextToSpeech {
        &self.services.tts
    }

    pub fn password_cost(&self) -> u32 {
        self.password_cost
    }
}
