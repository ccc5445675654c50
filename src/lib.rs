//! parley-server – a minimal web chat backend.
//!
//! Relays user messages to an OpenAI-compatible chat-completion API and
//! persists conversation history in SQLite. The [`ui`] module additionally
//! models the browser chat client's state machine as a pure reducer so the
//! transcript/submission behavior can be tested without a renderer.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod schemas;
pub mod state;
pub mod ui;
pub mod upstream;
