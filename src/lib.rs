pub mod answers;
pub mod camp;
pub mod commands;
pub mod config;
pub mod context;
pub mod handler;
pub mod intents;
pub mod llm;
pub mod rate_limiter;
