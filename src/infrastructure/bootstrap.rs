use std::sync::Arc;

use crate::application::{AdvisoryUseCase, AuthUseCase, ChatSuggestionUseCase, SensorUseCase};
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::chat_suggestions::ChatSuggestionRepository;
use crate::infrastructure::db::connection::init_db;
use crate::infrastructure::db::sensor_readings::SensorReadingRepository;
use crate::infrastructure::db::users::UserRepository;
use crate::infrastructure::llm_clients::{LLMClient, RouterClient};
use crate::infrastructure::security::password::PasswordHasher;
use crate::infrastructure::security::tokens::TokenService;
use crate::interfaces::state::AppState;

/// Wires repositories and use cases around the given model client.
pub async fn build_state(
    config: &AppConfig,
    llm_client: Arc<dyn LLMClient + Send + Sync>,
) -> Result<AppState> {
    let pool = init_db(&config.database).await?;

    let user_repository = Arc::new(UserRepository::new(pool.clone()));
    let sensor_repository = Arc::new(SensorReadingRepository::new(pool.clone()));
    let chat_repository = Arc::new(ChatSuggestionRepository::new(pool));

    let auth_use_case = AuthUseCase::new(
        user_repository,
        PasswordHasher::new(config.auth.bcrypt_cost),
        TokenService::new(&config.auth)?,
    );
    let sensor_use_case = SensorUseCase::new(sensor_repository.clone());
    let advisory_use_case = AdvisoryUseCase::new(sensor_repository.clone());
    let chat_suggestion_use_case =
        ChatSuggestionUseCase::new(llm_client, chat_repository, config.llm.clone());

    Ok(AppState {
        auth_use_case,
        sensor_use_case,
        advisory_use_case,
        chat_suggestion_use_case,
        sensor_repository,
    })
}

pub async fn setup(config: &AppConfig) -> Result<AppState> {
    build_state(config, Arc::new(RouterClient::new())).await
}
