pub mod chat_suggestions;
pub mod connection;
pub mod sensor_readings;
pub mod users;
