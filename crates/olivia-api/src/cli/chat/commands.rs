//! Slash commands accepted on the chat screen.
//!
//! Every command is one row of [`COMMANDS`]: its names, and the line shown
//! by `/help`.

use console::style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    /// Reprint the whole conversation.
    History,
    Clear,
    /// Leave the chat for the settings screen.
    Settings,
    Exit,
}

struct CommandEntry {
    command: ChatCommand,
    names: &'static [&'static str],
    summary: &'static str,
}

const COMMANDS: [CommandEntry; 5] = [
    CommandEntry {
        command: ChatCommand::Help,
        names: &["/help", "/h", "/?"],
        summary: "Show this list",
    },
    CommandEntry {
        command: ChatCommand::History,
        names: &["/history"],
        summary: "Show the whole conversation",
    },
    CommandEntry {
        command: ChatCommand::Clear,
        names: &["/clear", "/cls"],
        summary: "Clear the screen",
    },
    CommandEntry {
        command: ChatCommand::Settings,
        names: &["/settings"],
        summary: "Open settings",
    },
    CommandEntry {
        command: ChatCommand::Exit,
        names: &["/exit", "/quit", "/q"],
        summary: "Leave the chat",
    },
];

/// Interpret a line of chat input.
///
/// `None` for ordinary messages. Lines starting with `/` are commands;
/// an unrecognized name comes back as `Err(name)`. Anything after the
/// command name is ignored.
pub fn parse(input: &str) -> Option<Result<ChatCommand, String>> {
    let name = input.split_whitespace().next()?;
    if !name.starts_with('/') {
        return None;
    }

    let name = name.to_lowercase();
    let found = COMMANDS
        .iter()
        .find(|entry| entry.names.contains(&name.as_str()))
        .map(|entry| entry.command);
    Some(found.ok_or(name))
}

pub fn print_help() {
    println!();
    println!("  {}", style("Commands").bold());
    println!();
    for entry in &COMMANDS {
        println!(
            "  {:<12}{}",
            style(entry.names[0]).cyan(),
            style(entry.summary).dim()
        );
    }
    println!();
    println!(
        "  {}",
        style("Ctrl+D also leaves. Your conversation is saved as you go.").dim()
    );
    println!();
}
