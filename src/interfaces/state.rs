use crate::application::{AdvisoryUseCase, AuthUseCase, ChatSuggestionUseCase, SensorUseCase};
use crate::infrastructure::db::sensor_readings::SensorReadingRepository;
use std::sync::Arc;

pub struct AppState {
    pub auth_use_case: AuthUseCase,
    pub sensor_use_case: SensorUseCase,
    pub advisory_use_case: AdvisoryUseCase,
    pub chat_suggestion_use_case: ChatSuggestionUseCase,
    pub sensor_repository: Arc<SensorReadingRepository>,
}
