//! Core chat client state and lifecycle.
//!
//! This module provides the `ChatClient` struct which owns the session
//! identifier, the send-in-progress and disabled flags, and the append-only
//! transcript, and which drives a [`Surface`] with every visible effect.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::to_writer_pretty;

use crate::chat::config::ChatConfig;
use crate::chat::render::Surface;
use crate::chat::transcript::{Role, TranscriptEntry};
use crate::client::{Backend, Relay};
use crate::error::{Error, Result};

/// A chat client that coordinates session acquisition and message exchange.
///
/// The client holds the one piece of UI state that matters: whether a send
/// is in progress, and whether sending has been permanently disabled by a
/// failed session acquisition. All failures it encounters become transcript
/// entries; none propagate out of `send_message`.
pub struct ChatClient<B: Backend> {
    backend: B,
    config: ChatConfig,
    session_id: Option<String>,
    disabled: bool,
    sending: bool,
    transcript: Vec<TranscriptEntry>,
    request_count: u64,
}

/// A point-in-time snapshot of client state.
#[derive(Debug, Clone)]
pub struct ClientStats {
    /// Number of user entries in the transcript.
    pub user_entries: usize,
    /// Number of assistant entries in the transcript.
    pub assistant_entries: usize,
    /// Number of error entries in the transcript.
    pub error_entries: usize,
    /// Total number of chat requests issued.
    pub request_count: u64,
    /// Whether a session identifier is currently held.
    pub has_session: bool,
    /// Whether sending has been permanently disabled.
    pub disabled: bool,
    /// The auto-save transcript path, if set.
    pub transcript_path: Option<PathBuf>,
}

impl ChatClient<Relay> {
    /// Creates a new chat client backed by an HTTP relay.
    pub fn new(relay: Relay, config: ChatConfig) -> Self {
        Self::with_backend(relay, config)
    }
}

impl<B: Backend> ChatClient<B> {
    /// Creates a new chat client with a custom backend.
    pub fn with_backend(backend: B, config: ChatConfig) -> Self {
        Self {
            backend,
            config,
            session_id: None,
            disabled: false,
            sending: false,
            transcript: Vec::new(),
            request_count: 0,
        }
    }

    /// Acquires a session identifier from the service.
    ///
    /// Invoked once at startup. On failure the error is appended to the
    /// transcript and sending is permanently disabled for the lifetime of
    /// this client; there is no automatic retry.
    pub async fn acquire_session(&mut self, surface: &mut dyn Surface) -> Result<()> {
        if self.disabled {
            return Err(Error::session(
                "sending is permanently disabled; restart the client",
            ));
        }

        match self.backend.generate_session().await {
            Ok(response) => {
                self.session_id = Some(response.session_id);
                Ok(())
            }
            Err(err) => {
                self.disabled = true;
                surface.set_send_enabled(false);
                self.append(
                    surface,
                    Role::Error,
                    format!("could not start a session: {err}"),
                );
                Err(err)
            }
        }
    }

    /// Sends one user message and appends the reply, or the failure, to the
    /// transcript.
    ///
    /// Empty and whitespace-only input is silently ignored. Submissions
    /// while permanently disabled are swallowed the way a disabled control
    /// swallows a click. The user's entry is appended and the input cleared
    /// before the request is issued; the send control is re-enabled and
    /// focus returned on every exit path.
    pub async fn send_message(&mut self, input: &str, surface: &mut dyn Surface) {
        if self.disabled {
            return;
        }
        let text = input.trim();
        if text.is_empty() {
            return;
        }
        let Some(session_id) = self.session_id.clone() else {
            self.append(
                surface,
                Role::Error,
                Error::session("no active session; restart the client").to_string(),
            );
            return;
        };

        self.append(surface, Role::User, text);
        surface.clear_input();
        self.sending = true;
        surface.set_send_enabled(false);

        let outcome = self.backend.chat(&session_id, text).await;
        self.request_count = self.request_count.saturating_add(1);

        match outcome {
            Ok(reply) => self.append(surface, Role::Assistant, reply.response),
            Err(err) => self.append(surface, Role::Error, err.to_string()),
        }

        // The one cleanup point; every path through the exchange ends here.
        self.sending = false;
        surface.set_send_enabled(true);
        surface.focus_input();

        if let Err(err) = self.auto_save_transcript() {
            self.append(
                surface,
                Role::Error,
                format!("transcript save failed: {err}"),
            );
        }
    }

    /// Returns the session identifier, if one is held.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Returns true if sending has been permanently disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns true while an exchange is outstanding.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Returns the transcript in append order.
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Sets the auto-save transcript path.
    pub fn set_transcript_path(&mut self, path: Option<PathBuf>) {
        self.config.transcript_path = path;
    }

    /// Returns the configured transcript path, if any.
    pub fn transcript_path(&self) -> Option<&Path> {
        self.config.transcript_path.as_deref()
    }

    /// Saves the transcript to the specified path.
    pub fn save_transcript_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let transcript = TranscriptFile::new(&self.transcript);
        let file = File::create(path.as_ref())
            .map_err(|err| Error::io("failed to create transcript file", err))?;
        let writer = BufWriter::new(file);
        to_writer_pretty(writer, &transcript).map_err(|err| {
            Error::serialization("failed to serialize transcript", Some(Box::new(err)))
        })
    }

    /// Returns the current client statistics snapshot.
    pub fn stats(&self) -> ClientStats {
        let count = |role: Role| {
            self.transcript
                .iter()
                .filter(|entry| entry.role == role)
                .count()
        };
        ClientStats {
            user_entries: count(Role::User),
            assistant_entries: count(Role::Assistant),
            error_entries: count(Role::Error),
            request_count: self.request_count,
            has_session: self.session_id.is_some(),
            disabled: self.disabled,
            transcript_path: self.config.transcript_path.clone(),
        }
    }

    /// Appends an entry and renders it through the surface.
    fn append(&mut self, surface: &mut dyn Surface, role: Role, text: impl Into<String>) {
        let entry = TranscriptEntry::new(role, text);
        surface.append_entry(&entry);
        self.transcript.push(entry);
    }

    fn auto_save_transcript(&self) -> Result<()> {
        if let Some(path) = &self.config.transcript_path {
            self.save_transcript_to(path)
        } else {
            Ok(())
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TranscriptFile {
    version: u8,
    entries: Vec<TranscriptEntry>,
}

impl TranscriptFile {
    fn new(entries: &[TranscriptEntry]) -> Self {
        Self {
            version: 1,
            entries: entries.to_vec(),
        }
    }
}
