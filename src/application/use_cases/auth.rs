use crate::domain::error::{AppError, Result};
use crate::domain::user::{Credentials, TokenResponse};
use crate::infrastructure::db::users::UserRepository;
use crate::infrastructure::security::password::PasswordHasher;
use crate::infrastructure::security::tokens::TokenService;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

pub const INVALID_CREDENTIALS: &str = "Credenziali non valide";

pub struct AuthUseCase {
    repository: Arc<UserRepository>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AuthUseCase {
    pub fn new(repository: Arc<UserRepository>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            repository,
            hasher,
            tokens,
        }
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<()> {
        credentials
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let hash = self.hasher.hash(&credentials.password).await?;
        let id = self.repository.create(&credentials.username, &hash).await?;
        info!(user_id = id, username = %credentials.username, "User registered");
        Ok(())
    }

    /// Unknown users and wrong passwords produce the same error.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        let user = self
            .repository
            .find_by_username(&credentials.username)
            .await?;

        let verified = match user {
            Some(user) => self
                .hasher
                .verify(&credentials.password, &user.password_hash)
                .await?
                .then_some(user),
            None => None,
        };

        let Some(user) = verified else {
            warn!(username = %credentials.username, "Rejected login");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        info!(user_id = user.id, "Issued access token");
        let token = self.tokens.issue(&user.username)?;
        Ok(TokenResponse::bearer(token))
    }

    pub fn authenticate(&self, token: &str) -> Result<String> {
        self.tokens.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::AuthConfig;
    use crate::infrastructure::db::connection::memory_pool;

    async fn use_case() -> AuthUseCase {
        let config = AuthConfig {
            secret_key: "test-secret".into(),
            algorithm: "HS256".into(),
            bcrypt_cost: 4,
            ..Default::default()
        };
        AuthUseCase::new(
            Arc::new(UserRepository::new(memory_pool().await)),
            PasswordHasher::new(config.bcrypt_cost),
            TokenService::new(&config).unwrap(),
        )
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_login_authenticate() {
        let auth = use_case().await;
        auth.register(&creds("paolo", "grano")).await.unwrap();

        let token = auth.login(&creds("paolo", "grano")).await.unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(auth.authenticate(&token.access_token).unwrap(), "paolo");
    }

    #[tokio::test]
    async fn test_invalid_credentials_rejected() {
        let auth = use_case().await;
        auth.register(&creds("paolo", "grano")).await.unwrap();

        for attempt in [creds("paolo", "orzo"), creds("nessuno", "grano")] {
            match auth.login(&attempt).await {
                Err(AppError::Unauthorized(msg)) => assert_eq!(msg, INVALID_CREDENTIALS),
                other => panic!("expected unauthorized, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_register_rejects_empty_username() {
        let auth = use_case().await;
        let err = auth.register(&creds("", "grano")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
