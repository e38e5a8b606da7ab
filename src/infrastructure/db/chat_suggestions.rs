use crate::domain::chat::ChatSuggestionRecord;
use crate::domain::error::{AppError, Result};
use sqlx::SqlitePool;

pub struct ChatSuggestionRepository {
    pool: SqlitePool,
}

impl ChatSuggestionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn save(&self, record: &mut ChatSuggestionRecord) -> Result<()> {
        let result = sqlx::query(
            "INSERT INTO chat_suggestions (username, question, prompt_hash, answer, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&record.username)
        .bind(&record.question)
        .bind(&record.prompt_hash)
        .bind(&record.answer)
        .bind(record.created_at.unwrap_or_else(chrono::Utc::now))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save chat suggestion: {}", e)))?;

        record.id = Some(result.last_insert_rowid());
        Ok(())
    }

    pub async fn history(&self, username: &str, limit: i64) -> Result<Vec<ChatSuggestionRecord>> {
        sqlx::query_as::<_, ChatSuggestionEntity>(
            "SELECT id, username, question, prompt_hash, answer, created_at
             FROM chat_suggestions WHERE username = ?
             ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch chat history: {}", e)))
        .map(|entities| entities.into_iter().map(|e| e.into()).collect())
    }
}

#[derive(sqlx::FromRow)]
struct ChatSuggestionEntity {
    id: i64,
    username: String,
    question: String,
    prompt_hash: String,
    answer: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ChatSuggestionEntity> for ChatSuggestionRecord {
    fn from(e: ChatSuggestionEntity) -> Self {
        Self {
            id: Some(e.id),
            username: e.username,
            question: e.question,
            prompt_hash: e.prompt_hash,
            answer: e.answer,
            created_at: Some(e.created_at),
        }
    }
}
