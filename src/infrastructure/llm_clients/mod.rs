pub mod huggingface;
pub mod openai;

use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::domain::llm_config::LLMProvider;
use async_trait::async_trait;
use huggingface::HuggingFaceClient;
use openai::OpenAICompatibleClient;

#[async_trait]
pub trait LLMClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String>;
}

pub struct RouterClient {
    openai: OpenAICompatibleClient,
    huggingface: HuggingFaceClient,
}

impl RouterClient {
    pub fn new() -> Self {
        Self {
            openai: OpenAICompatibleClient::new(),
            huggingface: HuggingFaceClient::new(),
        }
    }
}

#[async_trait]
impl LLMClient for RouterClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String> {
        match config.provider {
            LLMProvider::HuggingFace => self.huggingface.generate(config, system, user).await,
            LLMProvider::Local | LLMProvider::OpenAI => {
                self.openai.generate(config, system, user).await
            }
        }
    }
}
