use serde::{Deserialize, Serialize};

/// Successful response from the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    /// The assistant's reply text.
    pub response: String,
}

impl ChatReply {
    /// Create a new `ChatReply` with the given response text.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}
