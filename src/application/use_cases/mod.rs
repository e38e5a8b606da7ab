pub mod advisory;
pub mod auth;
pub mod carbon;
pub mod chat_suggestion;
pub mod sensor_simulation;
pub mod sensors;
