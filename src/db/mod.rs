//! Database abstraction layer.
//!
//! [`ChatStore`] defines the interface for persisting chats and messages.
//! The default implementation is [`sqlite::SqliteStore`]. To swap to another
//! database (Postgres, MySQL, …), implement [`ChatStore`] for your new type
//! and change the concrete type in [`crate::state::AppState`].
//!
//! All trait methods use `impl Future` in their signatures (stable since Rust
//! 1.75) so no extra `async-trait` crate is required.

pub mod sqlite;

use chrono::{DateTime, Utc};

/// A single row in the `chats` table.
///
/// Created on the first message of a conversation; never updated or deleted
/// by this server.
#[derive(Debug, Clone)]
pub struct ChatRecord {
    /// Server-assigned identifier.
    pub chat_id: i64,
    /// Display label: the text of the first user message.
    pub title: String,
    /// Owning principal.
    pub user_id: i64,
}

/// A single row in the `messages` table.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    /// For assistant replies this is the upstream API's response id.
    pub message_id: String,
    /// The chat this message belongs to.
    pub chat_id: i64,
    /// Principal that triggered the exchange.
    pub sender_id: i64,
    /// `"user"` or `"assistant"`.
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Trait for persisting chats and their messages.
pub trait ChatStore: Send + Sync + 'static {
    /// Insert a new chat row and return it with its assigned id.
    fn create_chat(
        &self,
        title: &str,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<ChatRecord, sqlx::Error>> + Send;

    /// Fetch a chat by id; `None` if it does not exist.
    fn get_chat(
        &self,
        chat_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<ChatRecord>, sqlx::Error>> + Send;

    /// Append one message row.
    fn append_message(
        &self,
        msg: MessageRecord,
    ) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;

    /// All messages for a chat, in storage order. This order is what gets
    /// replayed to the upstream API, so it must never reorder or drop rows.
    fn list_messages(
        &self,
        chat_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<MessageRecord>, sqlx::Error>> + Send;
}
