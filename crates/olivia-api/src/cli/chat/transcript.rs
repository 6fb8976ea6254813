//! Transcript rendering: turn labels, incremental printing, and the
//! `history` subcommand.

use std::collections::HashSet;

use chrono::Local;
use console::{pad_str, style, Alignment};

use olivia_core::chat::store::TurnStore;
use olivia_types::chat::{ChatTurn, TurnId};

use crate::state::AppState;

use crate::cli::auth::require_identity;

/// Label line for a turn: sender and short local time. User turns are
/// right-aligned to `width`.
pub fn turn_label(turn: &ChatTurn, assistant_name: &str, width: usize) -> String {
    let time = turn.timestamp.with_timezone(&Local).format("%H:%M").to_string();
    if turn.is_from_user() {
        let plain = format!("{time}  You");
        let label = format!("{}  {}", style(time).dim(), style("You").green().bold());
        let pad = width.saturating_sub(console::measure_text_width(&plain));
        format!("{}{label}", " ".repeat(pad))
    } else {
        format!(
            "{}  {}",
            style(assistant_name).magenta().bold(),
            style(time).dim()
        )
    }
}

/// A turn rendered as its label followed by its text.
pub fn render_turn(turn: &ChatTurn, assistant_name: &str, width: usize) -> String {
    let label = turn_label(turn, assistant_name, width);
    let body = if turn.is_from_user() {
        turn.text
            .lines()
            .map(|line| pad_str(line, width, Alignment::Right, None).into_owned())
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        turn.text
            .lines()
            .map(|line| format!("  {line}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!("{label}\n{body}\n")
}

/// Remembers which turns were already printed so snapshots can be rendered
/// incrementally.
#[derive(Debug, Default)]
pub struct TranscriptCursor {
    printed: HashSet<TurnId>,
}

impl TranscriptCursor {
    /// Turns of `turns` not yet returned by a previous call, in order.
    pub fn fresh<'a>(&mut self, turns: &'a [ChatTurn]) -> Vec<&'a ChatTurn> {
        turns.iter().filter(|t| self.printed.insert(t.id)).collect()
    }
}

/// Terminal width used for right-aligned user turns.
pub fn transcript_width() -> usize {
    let (_, cols) = console::Term::stdout().size();
    usize::from(cols).clamp(40, 100)
}

/// Print the stored conversation of the signed-in identity.
pub async fn print_history(state: &AppState, json: bool) -> anyhow::Result<()> {
    let identity = require_identity(state).await?;
    let turns = state.turns.list(&identity.id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&turns)?);
        return Ok(());
    }

    if turns.is_empty() {
        println!("  {}", style("No messages yet.").dim());
        return Ok(());
    }

    let width = transcript_width();
    println!();
    for turn in &turns {
        println!("{}", render_turn(turn, state.assistant_name(), width));
    }
    Ok(())
}
