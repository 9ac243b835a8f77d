use serde::{Deserialize, Serialize};

/// Successful response to a session-generation request.
///
/// The identifier is an opaque token scoping a conversation on the server
/// side. It is held for the lifetime of one client and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionResponse {
    /// The opaque session identifier.
    pub session_id: String,
}

impl SessionResponse {
    /// Create a new `SessionResponse` with the given identifier.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_value, json, to_value};

    #[test]
    fn serialization() {
        let resp = SessionResponse::new("abc123");
        let json = to_value(&resp).unwrap();
        assert_eq!(json, json!({"session_id": "abc123"}));
    }

    #[test]
    fn deserialization() {
        let json = json!({"session_id": "abc123"});
        let resp: SessionResponse = from_value(json).unwrap();
        assert_eq!(resp.session_id, "abc123");
    }
}
