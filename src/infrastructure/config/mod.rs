use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, LLMProvider};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub const CONFIG_FILE: &str = "agrisustain.toml";
const ENV_PREFIX: &str = "AGRI_";
const HF_TOKEN_KEY: &str = "hf_token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://database.db".to_string(),
            max_connections: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub secret_key: String,
    pub algorithm: String,
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            algorithm: String::new(),
            token_ttl_minutes: 30,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AuthConfig {
    /// Only the HMAC family is usable with a shared secret.
    pub fn jwt_algorithm(&self) -> Result<Algorithm> {
        let algorithm = Algorithm::from_str(self.algorithm.trim()).map_err(|_| {
            AppError::ConfigError(format!("Unsupported JWT algorithm: {}", self.algorithm))
        })?;
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
            other => Err(AppError::ConfigError(format!(
                "JWT algorithm {:?} needs a key pair, only HS256/HS384/HS512 are supported",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seconds between simulated readings; 0 disables the background task.
    pub interval_secs: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub simulation: SimulationConfig,
    pub llm: LLMConfig,
}

impl AppConfig {
    /// Loads `.env`, then layers defaults, `agrisustain.toml`, `AGRI_*`
    /// variables and the bare `SECRET_KEY` / `ALGORITHM` names. `HF_TOKEN`
    /// only fills a missing Hugging Face key.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_figment(Self::figment(Path::new(CONFIG_FILE)))
    }

    pub fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&["SECRET_KEY", "ALGORITHM"])
                    .map(|key| format!("auth.{}", key.as_str().to_ascii_lowercase()).into()),
            )
            .merge(Env::raw().only(&["HF_TOKEN"]).map(|_| HF_TOKEN_KEY.into()))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let mut config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load configuration: {}", e)))?;
        if config.llm.provider == LLMProvider::HuggingFace && config.llm.api_key.is_none() {
            config.llm.api_key = figment.extract_inner::<String>(HF_TOKEN_KEY).ok();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.secret_key.trim().is_empty() || self.auth.algorithm.trim().is_empty() {
            return Err(AppError::ConfigError(
                "SECRET_KEY and ALGORITHM must be set (environment or .env)".to_string(),
            ));
        }
        self.auth.jwt_algorithm()?;
        if self.auth.token_ttl_minutes <= 0 {
            return Err(AppError::ConfigError(
                "auth.token_ttl_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
