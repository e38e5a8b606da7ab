pub mod carbon;
pub mod chat;
pub mod error;
pub mod llm_config;
pub mod sensor;
pub mod user;
