//! Interactive terminal client for a parlor chat service.
//!
//! This binary acquires a session at startup and then relays each line you
//! type to the service, rendering replies and failures as transcript lines.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a service on localhost:8000
//! parlor-chat
//!
//! # Point at another endpoint
//! parlor-chat --url http://chat.example.com:8000/
//!
//! # Auto-save the transcript after each exchange
//! parlor-chat --transcript chat-log.json
//!
//! # Disable colors (useful for piping output)
//! parlor-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/session` - Show the current session identifier
//! - `/stats` - Show client statistics
//! - `/save <path>` - Save the transcript to a file now
//! - `/transcript [path]` - Set or clear the auto-save path
//! - `/quit` - Exit the application

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use parlor::chat::{
    ChatArgs, ChatClient, ChatCommand, ChatConfig, TerminalSurface, help_text, parse_command,
};
use parlor::{Backend, Relay};

/// Main entry point for the parlor-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("parlor-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let relay = Relay::with_options(config.base_url.clone(), Some(config.timeout))?;
    let endpoint = relay.base_url().to_string();
    let mut client = ChatClient::new(relay, config);
    let mut surface = TerminalSurface::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Flag for reporting Ctrl+C pressed while an exchange is outstanding.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("Parlor chat ({endpoint})");
    println!("Type /help for commands, /quit to exit\n");

    // One session per run. On failure the error is already on the
    // transcript and later submissions are swallowed; keep the prompt
    // alive so the user can read it and decide to restart.
    let _ = client.acquire_session(&mut surface).await;

    loop {
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Session => match client.session_id() {
                            Some(id) => println!("Session: {id}"),
                            None => println!("Session: (none)"),
                        },
                        ChatCommand::Stats => {
                            print_stats(&client);
                        }
                        ChatCommand::SaveTranscript(path) => {
                            match client.save_transcript_to(&path) {
                                Ok(_) => println!("Transcript saved to {}", path),
                                Err(err) => eprintln!("Error: failed to save transcript: {err}"),
                            }
                        }
                        ChatCommand::TranscriptPath(path) => {
                            client.set_transcript_path(Some(PathBuf::from(&path)));
                            println!("Transcript auto-save set to {}", path);
                        }
                        ChatCommand::ClearTranscriptPath => {
                            client.set_transcript_path(None);
                            println!("Transcript auto-save disabled.");
                        }
                        ChatCommand::Invalid(message) => {
                            eprintln!("Error: {message}");
                        }
                    }
                    continue;
                }

                // Regular message - relay to the service.
                client.send_message(line, &mut surface).await;
                if interrupted.load(Ordering::Relaxed) {
                    println!("[interrupt noted: an exchange cannot be cancelled]");
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at the prompt - re-arm it
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: input error: {err}");
                break;
            }
        }
    }

    Ok(())
}

fn print_stats<B: Backend>(client: &ChatClient<B>) {
    let stats = client.stats();
    println!("    Client statistics:");
    println!("      User entries: {}", stats.user_entries);
    println!("      Assistant entries: {}", stats.assistant_entries);
    println!("      Error entries: {}", stats.error_entries);
    println!("      Chat requests: {}", stats.request_count);
    println!(
        "      Session: {}",
        if stats.has_session { "active" } else { "(none)" }
    );
    if stats.disabled {
        println!("      Sending: permanently disabled (restart to retry)");
    }
    match stats.transcript_path {
        Some(ref path) => println!("      Transcript file: {}", path.display()),
        None => println!("      Transcript file: (disabled)"),
    }
}
