//! Transcript entries for the chat client.
//!
//! A transcript is an ordered, append-only sequence of role-tagged lines.
//! Entries are never mutated or removed once appended.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The role that produced a transcript entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Text the user submitted.
    User,
    /// A reply returned by the service.
    Assistant,
    /// A failure converted to a visible line.
    Error,
}

/// One rendered line of chat history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// Who produced the line.
    pub role: Role,
    /// The line's plain text. Never interpreted as markup.
    pub text: String,
    /// When the entry was appended.
    #[serde(with = "rfc3339")]
    pub at: OffsetDateTime,
}

impl TranscriptEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            at: OffsetDateTime::now_utc(),
        }
    }
}

/// RFC 3339 (de)serialization for entry timestamps.
mod rfc3339 {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;

    pub fn serialize<S>(at: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = at.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&s, &Rfc3339).map_err(serde::de::Error::custom)
    }
}
