pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gemini;
pub mod http_client;
pub mod inputs;
pub mod prompt;
pub mod result;
pub mod state;
pub mod worker;
