//! Outbound clients for third-party completion APIs.

pub mod openai;

pub use openai::{ChatTurn, Completion, OpenAiClient};
