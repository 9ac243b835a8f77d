use serde::{Deserialize, Serialize};

/// Request body for the chat endpoint.
///
/// Every chat request carries the session identifier alongside the message
/// text; the server uses the identifier to maintain conversation context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The opaque session identifier obtained at startup.
    pub session_id: String,
    /// The user's message text.
    pub message: String,
}

impl ChatRequest {
    /// Create a new `ChatRequest` for the given session and message.
    pub fn new(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            message: message.into(),
        }
    }
}
