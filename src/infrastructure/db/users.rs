use crate::domain::error::{AppError, Result};
use crate::domain::user::StoredUser;
use sqlx::SqlitePool;

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns `Conflict` when the username is already taken.
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::Conflict("Username già esistente".to_string())
                }
                other => AppError::DatabaseError(format!("Failed to create user: {}", other)),
            })?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<StoredUser>> {
        sqlx::query_as::<_, UserEntity>("SELECT id, username, password FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user: {}", e)))
            .map(|entity| entity.map(Into::into))
    }
}

#[derive(sqlx::FromRow)]
struct UserEntity {
    id: i64,
    username: String,
    password: String,
}

impl From<UserEntity> for StoredUser {
    fn from(e: UserEntity) -> Self {
        Self {
            id: e.id,
            username: e.username,
            password_hash: e.password,
        }
    }
}
