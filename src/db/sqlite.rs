//! SQLite implementation of [`ChatStore`].
//!
//! Uses [`sqlx`] with the `sqlite` feature. Migrations are run automatically
//! on startup via [`SqliteStore::connect`].
//!
//! # Migrations path
//!
//! `sqlx::migrate!("./migrations")` resolves the path **at compile time**
//! relative to `CARGO_MANIFEST_DIR` (the crate root), so the schema file is
//! embedded into the binary. The database file location is determined at
//! runtime by the `PARLEY_DATABASE_URL` environment variable and is **not**
//! related to the current working directory at runtime.
//!
//! # Queries
//!
//! The `sqlx::query` (runtime-verified) form is used deliberately so that no
//! `DATABASE_URL` environment variable is needed at compile time.

use chrono::Utc;
use sqlx::SqlitePool;

use super::{ChatRecord, ChatStore, MessageRecord};

/// SQLite-backed chat/message store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending
    /// migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g.
    /// `"sqlite://parley.db"` or `"sqlite::memory:"` for tests.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePool::connect(url).await?;
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await?;
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

impl ChatStore for SqliteStore {
    async fn create_chat(&self, title: &str, user_id: i64) -> Result<ChatRecord, sqlx::Error> {
        let result = sqlx::query("INSERT INTO chats (title, user_id) VALUES (?1, ?2)")
            .bind(title)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(ChatRecord {
            chat_id: result.last_insert_rowid(),
            title: title.to_owned(),
            user_id,
        })
    }

    async fn get_chat(&self, chat_id: i64) -> Result<Option<ChatRecord>, sqlx::Error> {
        let row: Option<(i64, String, i64)> =
            sqlx::query_as("SELECT chat_id, title, user_id FROM chats WHERE chat_id = ?1")
                .bind(chat_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(chat_id, title, user_id)| ChatRecord {
            chat_id,
            title,
            user_id,
        }))
    }

    async fn append_message(&self, msg: MessageRecord) -> Result<(), sqlx::Error> {
        let created_at = msg.created_at.to_rfc3339();
        sqlx::query(
            "INSERT INTO messages (message_id, chat_id, sender_id, role, content, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&msg.message_id)
        .bind(msg.chat_id)
        .bind(msg.sender_id)
        .bind(&msg.role)
        .bind(&msg.content)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_messages(&self, chat_id: i64) -> Result<Vec<MessageRecord>, sqlx::Error> {
        // rowid order is insertion order, which is the conversation order the
        // upstream API must see. created_at alone cannot be used: upstream
        // timestamps have second granularity and can tie.
        let rows: Vec<(String, i64, i64, String, String, String)> = sqlx::query_as(
            "SELECT message_id, chat_id, sender_id, role, content, created_at \
             FROM messages WHERE chat_id = ?1 ORDER BY rowid ASC",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(
                |(message_id, chat_id, sender_id, role, content, created_at)| MessageRecord {
                    message_id,
                    chat_id,
                    sender_id,
                    role,
                    content,
                    created_at: created_at.parse().unwrap_or_else(|e: chrono::ParseError| {
                        tracing::warn!(raw = %created_at, error = %e, "failed to parse message created_at; using now");
                        Utc::now()
                    }),
                },
            )
            .collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    async fn memory_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:")
            .await
            .expect("in-memory store")
    }

    fn message(id: &str, chat_id: i64, role: &str, content: &str) -> MessageRecord {
        MessageRecord {
            message_id: id.into(),
            chat_id,
            sender_id: 1,
            role: role.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_chat_assigns_increasing_ids() {
        let store = memory_store().await;
        let first = store.create_chat("Hello", 1).await.unwrap();
        let second = store.create_chat("Another", 1).await.unwrap();
        assert_eq!(first.title, "Hello");
        assert!(second.chat_id > first.chat_id);
    }

    #[tokio::test]
    async fn get_chat_round_trips() {
        let store = memory_store().await;
        let chat = store.create_chat("Hello", 7).await.unwrap();
        let fetched = store.get_chat(chat.chat_id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Hello");
        assert_eq!(fetched.user_id, 7);
        assert!(store.get_chat(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn messages_come_back_in_storage_order() {
        let store = memory_store().await;
        let chat = store.create_chat("ordering", 1).await.unwrap();
        // Identical timestamps on purpose: rowid, not created_at, must decide.
        for (id, content) in [("m-1", "first"), ("m-2", "second"), ("m-3", "third")] {
            let mut msg = message(id, chat.chat_id, "assistant", content);
            msg.created_at = "2024-01-01T00:00:00Z".parse().unwrap();
            store.append_message(msg).await.unwrap();
        }
        let messages = store.list_messages(chat.chat_id).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn messages_are_scoped_to_their_chat() {
        let store = memory_store().await;
        let a = store.create_chat("a", 1).await.unwrap();
        let b = store.create_chat("b", 1).await.unwrap();
        store
            .append_message(message("m-a", a.chat_id, "assistant", "for a"))
            .await
            .unwrap();
        store
            .append_message(message("m-b", b.chat_id, "assistant", "for b"))
            .await
            .unwrap();
        let for_b = store.list_messages(b.chat_id).await.unwrap();
        assert_eq!(for_b.len(), 1);
        assert_eq!(for_b[0].content, "for b");
    }

    #[tokio::test]
    async fn appending_to_missing_chat_is_rejected() {
        let store = memory_store().await;
        let err = store
            .append_message(message("m-x", 42, "assistant", "orphan"))
            .await;
        assert!(err.is_err(), "foreign key violation expected");
    }
}
