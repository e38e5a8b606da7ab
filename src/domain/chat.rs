use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /chat_suggestion`. Sensor and footprint context are kept
/// loose because the dashboard sends whatever it last rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSuggestionRequest {
    pub user_input: String,
    #[serde(default)]
    pub sensors: Map<String, Value>,
    #[serde(default)]
    pub footprint: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSuggestionRecord {
    pub id: Option<i64>,
    pub username: String,
    pub question: String,
    pub prompt_hash: String,
    pub answer: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ChatSuggestionRecord {
    pub fn new(username: String, question: String, prompt_hash: String, answer: String) -> Self {
        Self {
            id: None,
            username,
            question,
            prompt_hash,
            answer,
            created_at: Some(chrono::Utc::now()),
        }
    }
}
