pub mod use_cases;

pub use use_cases::advisory::AdvisoryUseCase;
pub use use_cases::auth::AuthUseCase;
pub use use_cases::chat_suggestion::ChatSuggestionUseCase;
pub use use_cases::sensors::SensorUseCase;
