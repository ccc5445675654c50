//! Chat completion proxy (`POST /api/completions`).
//!
//! One request carries one new user message. The handler resolves the target
//! chat (creating one titled after the message when no `chatId` is given),
//! replays the chat's stored history plus the new message to the upstream
//! completions API, persists the assistant reply, and returns it.
//!
//! Only the assistant reply is stored; the user message reaches the upstream
//! API but never the database. A chat created for a request whose upstream
//! call then fails is left behind as an empty chat.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::db::{ChatStore, MessageRecord};
use crate::error::ServerError;
use crate::middleware::auth::Principal;
use crate::schemas::completions::{CompletionRequest, MessageResponse};
use crate::state::AppState;
use crate::upstream::ChatTurn;

#[derive(OpenApi)]
#[openapi(
    paths(post_completion),
    components(schemas(CompletionRequest, MessageResponse))
)]
pub struct CompletionsApi;

/// Register completion routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/completions", post(post_completion))
}

/// Proxy one user message to the completions API (`POST /api/completions`).
#[utoipa::path(
    post,
    path = "/api/completions",
    tag = "completions",
    request_body = CompletionRequest,
    responses(
        (status = 200, description = "Assistant reply persisted and returned", body = MessageResponse),
        (status = 400, description = "Empty message"),
        (status = 401, description = "Missing or wrong credential"),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "Upstream or database failure"),
    )
)]
pub async fn post_completion(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CompletionRequest>,
) -> Result<Json<MessageResponse>, ServerError> {
    if req.message.trim().is_empty() {
        return Err(ServerError::BadRequest("message must not be empty".into()));
    }

    // Resolve the chat, creating one titled after the first message.
    let chat_id = match req.chat_id {
        Some(id) => id,
        None => {
            let chat = state
                .store
                .create_chat(&req.message, principal.user_id)
                .await?;
            info!(chat_id = chat.chat_id, "created chat");
            chat.chat_id
        }
    };

    // Replay the stored history, oldest first, then the new user message.
    let history = state.store.list_messages(chat_id).await?;
    let mut turns: Vec<ChatTurn> = history
        .into_iter()
        .map(|m| ChatTurn {
            role: m.role,
            content: m.content,
        })
        .collect();
    turns.push(ChatTurn {
        role: "user".into(),
        content: req.message.clone(),
    });

    debug!(chat_id, turns = turns.len(), "requesting completion");
    let completion = state.upstream.complete(&turns).await?;

    let record = MessageRecord {
        message_id: completion.id,
        chat_id,
        sender_id: principal.user_id,
        role: completion.role,
        content: completion.content,
        // `created` is a unix timestamp from the upstream API.
        created_at: DateTime::from_timestamp(completion.created, 0).unwrap_or_else(Utc::now),
    };
    // An unknown chatId surfaces here as a foreign-key violation.
    state.store.append_message(record.clone()).await?;

    info!(chat_id, message_id = %record.message_id, "assistant reply persisted");
    Ok(Json(record.to_response()))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
