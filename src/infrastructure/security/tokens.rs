use crate::domain::error::{AppError, Result};
use crate::domain::user::Claims;
use crate::infrastructure::config::AuthConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

pub const INVALID_TOKEN: &str = "Token non valido";
pub const EXPIRED_TOKEN: &str = "Token scaduto";

/// Issues and checks HMAC-signed JWTs carrying the username in `sub`.
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let algorithm = config.jwt_algorithm()?;
        let secret = config.secret_key.as_bytes();
        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: Duration::minutes(config.token_ttl_minutes),
        })
    }

    pub fn issue(&self, username: &str) -> Result<String> {
        let claims = Claims {
            sub: Some(username.to_string()),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| AppError::SecurityError(format!("Failed to sign token: {}", e)))
    }

    /// Returns the username in `sub`.
    pub fn verify(&self, token: &str) -> Result<String> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized(EXPIRED_TOKEN.to_string()),
                _ => AppError::Unauthorized(INVALID_TOKEN.to_string()),
            }
        })?;

        data.claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| AppError::Unauthorized(INVALID_TOKEN.to_string()))
    }
}
