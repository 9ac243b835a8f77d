//! Configuration types for the chat front-end.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling client behavior.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

/// Default request timeout, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Command-line arguments for the parlor-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the chat service.
    #[arrrg(optional, "Base URL of the chat service (default: http://127.0.0.1:8000/)", "URL")]
    pub url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout: Option<u64>,

    /// Auto-save the transcript after each exchange.
    #[arrrg(optional, "Auto-save the transcript to this file after each exchange", "PATH")]
    pub transcript: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat client.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of the chat service. `None` defers to the relay's
    /// environment-variable and default resolution.
    pub base_url: Option<String>,

    /// Request timeout for each exchange.
    pub timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Path to persist the transcript automatically after each exchange.
    pub transcript_path: Option<PathBuf>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: deferred (environment variable, then localhost)
    /// - Timeout: 60 seconds
    /// - Color: enabled
    /// - Transcript auto-save: disabled
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_color: true,
            transcript_path: None,
        }
    }

    /// Sets the base URL of the chat service.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the transcript auto-save path.
    pub fn with_transcript_path(mut self, path: Option<PathBuf>) -> Self {
        self.transcript_path = path;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            base_url: args.url,
            timeout: Duration::from_secs(args.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            use_color: !args.no_color,
            transcript_path: args.transcript.map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert!(config.base_url.is_none());
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.use_color);
        assert!(config.transcript_path.is_none());
    }

    #[test]
    fn config_from_args_defaults() {
        let args = ChatArgs::default();
        let config = ChatConfig::from(args);
        assert!(config.base_url.is_none());
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            url: Some("http://chat.example.com/".to_string()),
            timeout: Some(10),
            transcript: Some("transcript.json".to_string()),
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.base_url.as_deref(), Some("http://chat.example.com/"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(
            config.transcript_path,
            Some(PathBuf::from("transcript.json"))
        );
        assert!(!config.use_color);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_base_url("http://chat.example.com/")
            .with_timeout(Duration::from_secs(5))
            .without_color()
            .with_transcript_path(Some(PathBuf::from("log.json")));

        assert_eq!(config.base_url.as_deref(), Some("http://chat.example.com/"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.use_color);
        assert_eq!(config.transcript_path, Some(PathBuf::from("log.json")));
    }
}
