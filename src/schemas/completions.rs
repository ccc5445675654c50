//! Wire types for `POST /api/completions`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::MessageRecord;

/// Body of `POST /api/completions`.
///
/// The browser client sends camelCase keys.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    /// The user's new message.
    pub message: String,
    /// Existing chat to continue; omit to start a new one.
    #[serde(default)]
    pub chat_id: Option<i64>,
}

/// The persisted assistant reply, returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Upstream completion id.
    pub message_id: String,
    /// Chat the reply belongs to. Clients starting a new chat read this to
    /// learn the assigned id.
    pub chat_id: i64,
    pub sender_id: i64,
    /// Always `"assistant"` for completion responses.
    pub role: String,
    pub content: String,
    /// RFC 3339 timestamp derived from the upstream `created` field.
    pub created_at: String,
}

impl MessageRecord {
    pub fn to_response(&self) -> MessageResponse {
        MessageResponse {
            message_id: self.message_id.clone(),
            chat_id: self.chat_id,
            sender_id: self.sender_id,
            role: self.role.clone(),
            content: self.content.clone(),
            created_at: self.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn request_accepts_camel_case_chat_id() {
        let req: CompletionRequest =
            serde_json::from_str(r#"{"message": "hi", "chatId": 3}"#).unwrap();
        assert_eq!(req.message, "hi");
        assert_eq!(req.chat_id, Some(3));
    }

    #[test]
    fn chat_id_defaults_to_none() {
        let req: CompletionRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(req.chat_id, None);
    }
}
