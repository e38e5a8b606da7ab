mod prompts;

use crate::domain::chat::{ChatSuggestionRecord, ChatSuggestionRequest};
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::db::chat_suggestions::ChatSuggestionRepository;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_llm_response;
use prompts::{build_user_prompt, prompt_hash, safe_text, SYSTEM_PROMPT};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const MAX_HISTORY: i64 = 50;

/// Turns a farmer's question plus the dashboard context into advice.
pub struct ChatSuggestionUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    repository: Arc<ChatSuggestionRepository>,
    config: LLMConfig,
}

impl ChatSuggestionUseCase {
    pub fn new(
        llm_client: Arc<dyn LLMClient + Send + Sync>,
        repository: Arc<ChatSuggestionRepository>,
        config: LLMConfig,
    ) -> Self {
        Self {
            llm_client,
            repository,
            config,
        }
    }

    /// An empty question is still answered from the sensor and footprint context.
    pub async fn execute(&self, username: &str, request: &ChatSuggestionRequest) -> Result<String> {
        let question = safe_text(&request.user_input);
        let user_prompt =
            build_user_prompt(&request.user_input, &request.sensors, request.footprint.as_ref());
        let hash = prompt_hash(SYSTEM_PROMPT, &user_prompt);

        info!(
            username,
            prompt_hash = %hash,
            provider = ?self.config.provider,
            model = %self.config.model,
            "Generating chat suggestion"
        );

        let raw = self
            .llm_client
            .generate(&self.config, SYSTEM_PROMPT, &user_prompt)
            .await
            .map_err(|e| {
                error!(prompt_hash = %hash, "Text generation failed: {}", e);
                e
            })?;
        let answer = clean_llm_response(&raw);

        let mut record =
            ChatSuggestionRecord::new(username.to_string(), question, hash, answer.clone());
        if let Err(e) = self.repository.save(&mut record).await {
            warn!("Chat suggestion not stored: {}", e);
        }

        Ok(answer)
    }

    pub async fn history(&self, username: &str, limit: Option<i64>) -> Result<Vec<ChatSuggestionRecord>> {
        let limit = limit.unwrap_or(10).clamp(1, MAX_HISTORY);
        self.repository.history(username, limit).await
    }
}
