use super::LLMClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{ChatMessage, LLMConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct TextGenerationRequest<'a> {
    inputs: &'a str,
    parameters: TextGenerationParameters,
}

#[derive(Serialize)]
struct TextGenerationParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_new_tokens: Option<u32>,
    do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// The hosted API answers with a list, a bare TGI `/generate` with an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextGenerationResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

/// Zephyr-style template used by TinyLlama-Chat.
pub fn apply_chat_template(messages: &[ChatMessage]) -> String {
    let mut prompt = String::new();
    for message in messages {
        prompt.push_str(&format!("<|{}|>\n{}</s>\n", message.role, message.content));
    }
    prompt.push_str("<|assistant|>\n");
    prompt
}

/// Removes the prompt when the endpoint echoes it back.
pub fn strip_prompt_echo(generated: &str, prompt: &str) -> String {
    generated
        .strip_prefix(prompt)
        .unwrap_or(generated)
        .trim()
        .to_string()
}

pub struct HuggingFaceClient {
    client: reqwest::Client,
}

impl HuggingFaceClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(config: &LLMConfig) -> String {
        let base_url = config.base_url.trim_end_matches('/');
        let model = config.model.trim().trim_matches('/');
        if model.is_empty() || base_url.ends_with(model) {
            base_url.to_string()
        } else {
            format!("{}/{}", base_url, model)
        }
    }
}

#[async_trait]
impl LLMClient for HuggingFaceClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String> {
        let prompt = apply_chat_template(&[ChatMessage::system(system), ChatMessage::user(user)]);
        let body = TextGenerationRequest {
            inputs: &prompt,
            parameters: TextGenerationParameters {
                max_new_tokens: config.max_tokens,
                do_sample: true,
                temperature: config.temperature,
                top_k: config.top_k,
                top_p: config.top_p,
                return_full_text: false,
            },
        };

        let mut request = self
            .client
            .post(Self::endpoint(config))
            .timeout(Duration::from_secs(config.timeout_secs))
            .json(&body);
        if let Some(api_key) = &config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::LLMError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: TextGenerationResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))?;

        let generated = match json {
            TextGenerationResponse::Batch(items) => items.into_iter().next(),
            TextGenerationResponse::Single(item) => Some(item),
        }
        .map(|item| item.generated_text)
        .ok_or_else(|| AppError::LLMError("Invalid response format".to_string()))?;

        Ok(strip_prompt_echo(&generated, &prompt))
    }
}
