pub mod app;
pub mod chat_stream;
pub mod config;
pub mod constants;
pub mod message;
pub mod preferences;
pub mod profile;
pub mod validation;
