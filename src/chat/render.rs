//! The presentation seam for the chat client.
//!
//! A [`Surface`] owns the three host-supplied affordances: the transcript
//! view, the text input, and the send control. The client drives the surface;
//! the surface decides how (or whether) each signal is shown.

use std::io::{self, Stdout, Write};

use crate::chat::transcript::{Role, TranscriptEntry};

/// ANSI escape code for cyan text (used for the assistant label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for error lines).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Trait for the presentation surface a chat client drives.
///
/// Implementations must render appended entries as plain text, never as
/// markup, and must leave the newest entry visible after each append.
pub trait Surface: Send {
    /// Render a newly appended transcript entry and scroll to it.
    fn append_entry(&mut self, entry: &TranscriptEntry);

    /// Empty the input buffer. Called immediately after its text is read
    /// for sending.
    fn clear_input(&mut self);

    /// Disable or enable the send control.
    fn set_send_enabled(&mut self, enabled: bool);

    /// Return input focus to the input control.
    fn focus_input(&mut self);
}

/// Line-oriented terminal surface with optional ANSI styling.
///
/// The user's own entry is already on screen as the echoed input line, so
/// only assistant and error entries produce output. Input clearing, send
/// enablement, and focus are no-ops: a prompt re-arms itself after every
/// exchange.
pub struct TerminalSurface {
    stdout: Stdout,
    use_color: bool,
}

impl TerminalSurface {
    /// Creates a new TerminalSurface with ANSI colors enabled.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            use_color: true,
        }
    }

    /// Creates a new TerminalSurface with the specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for TerminalSurface {
    fn append_entry(&mut self, entry: &TranscriptEntry) {
        match entry.role {
            Role::User => {}
            Role::Assistant => {
                if self.use_color {
                    println!("{ANSI_CYAN}Assistant:{ANSI_RESET} {}", entry.text);
                } else {
                    println!("Assistant: {}", entry.text);
                }
                self.flush();
            }
            Role::Error => {
                if self.use_color {
                    eprintln!("{ANSI_RED}Error:{ANSI_RESET} {}", entry.text);
                } else {
                    eprintln!("Error: {}", entry.text);
                }
            }
        }
    }

    fn clear_input(&mut self) {}

    fn set_send_enabled(&mut self, _enabled: bool) {}

    fn focus_input(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_default_has_color() {
        let surface = TerminalSurface::new();
        assert!(surface.use_color);
    }

    #[test]
    fn surface_without_color() {
        let surface = TerminalSurface::with_color(false);
        assert!(!surface.use_color);
    }
}
