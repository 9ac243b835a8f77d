//! Slash command parsing for the chat front-end.
//!
//! Commands control the local client and are never sent to the service.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Display help information.
    Help,

    /// Show the current session identifier.
    Session,

    /// Display client statistics (entry counts, request count, state).
    Stats,

    /// Save the transcript to a specific file immediately.
    SaveTranscript(String),

    /// Set the auto-save transcript path.
    TranscriptPath(String),

    /// Clear the auto-save transcript path.
    ClearTranscriptPath,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use parlor::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/save transcript.json").is_some());
/// assert!(parse_command("hello there").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "help" | "?" => ChatCommand::Help,
        "session" => ChatCommand::Session,
        "stats" => ChatCommand::Stats,
        "save" => match argument {
            Some(path) => ChatCommand::SaveTranscript(path.to_string()),
            None => ChatCommand::Invalid("/save requires a file path".to_string()),
        },
        "transcript" => match argument {
            Some(path) => ChatCommand::TranscriptPath(path.to_string()),
            None => ChatCommand::ClearTranscriptPath,
        },
        "quit" | "exit" | "q" => ChatCommand::Quit,
        other => ChatCommand::Invalid(format!("unknown command: /{other}")),
    };

    Some(result)
}

/// Returns the help text listing available commands.
pub fn help_text() -> &'static str {
    "Available commands:\n\
     /help               Show this help\n\
     /session            Show the current session identifier\n\
     /stats              Show client statistics\n\
     /save <path>        Save the transcript to a file now\n\
     /transcript <path>  Auto-save the transcript after each exchange\n\
     /transcript         Disable transcript auto-save\n\
     /quit               Exit"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_messages_are_not_commands() {
        assert!(parse_command("hello").is_none());
        assert!(parse_command("what is 2/3?").is_none());
        assert!(parse_command("").is_none());
    }

    #[test]
    fn quit_aliases() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
    }

    #[test]
    fn save_requires_a_path() {
        assert_eq!(
            parse_command("/save out.json"),
            Some(ChatCommand::SaveTranscript("out.json".to_string()))
        );
        assert!(matches!(
            parse_command("/save"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn transcript_toggles() {
        assert_eq!(
            parse_command("/transcript log.json"),
            Some(ChatCommand::TranscriptPath("log.json".to_string()))
        );
        assert_eq!(
            parse_command("/transcript"),
            Some(ChatCommand::ClearTranscriptPath)
        );
    }

    #[test]
    fn unknown_commands_are_invalid() {
        assert!(matches!(
            parse_command("/frobnicate"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn commands_are_case_insensitive_and_trimmed() {
        assert_eq!(parse_command("  /QUIT  "), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/Stats"), Some(ChatCommand::Stats));
    }
}
