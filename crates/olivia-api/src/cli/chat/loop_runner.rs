//! Main chat loop.
//!
//! Opens a session for the signed-in identity, follows the store so turns
//! written elsewhere appear, prints every new turn through the readline
//! writer, and waits on the reply (with a spinner) after each submission.

use std::io::Write;
use std::sync::Arc;

use console::style;
use rustyline_async::SharedWriter;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use olivia_core::chat::session::{ChatSession, SubmitOutcome};
use olivia_core::chat::store::TurnStore;
use olivia_infra::llm::openai::OpenAiCompletionClient;
use olivia_infra::memory::InMemoryTurnStore;
use olivia_types::chat::SessionSnapshot;
use olivia_types::identity::Identity;

use crate::cli::splash::spinner;
use crate::state::AppState;

use super::banner::print_chat_header;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::transcript::{render_turn, transcript_width, TranscriptCursor};

/// How the user left the chat screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatExit {
    Quit,
    Settings,
}

/// Run the chat screen for `identity`.
///
/// With `ephemeral` the conversation lives in memory only.
pub async fn run_chat(state: &AppState, identity: Identity, ephemeral: bool) -> anyhow::Result<ChatExit> {
    if ephemeral {
        run_with_store(state, identity, InMemoryTurnStore::new(), true).await
    } else {
        run_with_store(state, identity, state.turns.clone(), false).await
    }
}

async fn run_with_store<S>(
    state: &AppState,
    identity: Identity,
    store: S,
    ephemeral: bool,
) -> anyhow::Result<ChatExit>
where
    S: TurnStore + 'static,
{
    let assistant_name = state.assistant_name().to_string();
    let session = ChatSession::open(
        Some(identity),
        store,
        state.client.clone(),
        state.session_settings(),
    )
    .await?;
    let sync = session.spawn_sync();

    print_chat_header(&assistant_name, ephemeral);

    let prompt = format!("{} ", style("You >").green().bold());
    let (mut chat_input, writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
    let printer = spawn_printer(session.watch(), writer.clone(), assistant_name.clone());

    let exit = loop {
        match chat_input.read_line().await {
            InputEvent::Eof => break ChatExit::Quit,
            InputEvent::Interrupted => {
                let mut out = writer.clone();
                let _ = writeln!(out, "\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => {
                match commands::parse(&text) {
                    Some(Ok(ChatCommand::Help)) => commands::print_help(),
                    Some(Ok(ChatCommand::History)) => {
                        print_all(&session.snapshot(), writer.clone(), &assistant_name)
                    }
                    Some(Ok(ChatCommand::Clear)) => chat_input.clear(),
                    Some(Ok(ChatCommand::Settings)) => break ChatExit::Settings,
                    Some(Ok(ChatCommand::Exit)) => break ChatExit::Quit,
                    Some(Err(name)) => {
                        let mut out = writer.clone();
                        let _ = writeln!(
                            out,
                            "\n  {} Unknown command: {}. Type /help for available commands.\n",
                            style("?").yellow().bold(),
                            style(name).dim()
                        );
                    }
                    None => submit(&session, &text, &assistant_name, &writer).await,
                }
            }
        }
    };

    chat_input.close();
    stop(sync);
    stop(printer);
    println!("\n  {}", style("Chat closed.").dim());
    Ok(exit)
}

/// Submit a message and wait for the reply behind a spinner.
async fn submit<S>(
    session: &ChatSession<S, Arc<OpenAiCompletionClient>>,
    text: &str,
    assistant_name: &str,
    writer: &SharedWriter,
) where
    S: TurnStore + 'static,
{
    match session.submit(text).await {
        SubmitOutcome::Ignored => {}
        SubmitOutcome::Busy => {
            let mut out = writer.clone();
            let _ = writeln!(out, "  {}", style(typing_message(assistant_name)).dim());
        }
        SubmitOutcome::Accepted { reply, .. } => {
            let spinner = spinner(&typing_message(assistant_name));
            let settled = reply.settled().await;
            spinner.finish_and_clear();
            if settled.is_none() {
                warn!("Completion task ended without a reply");
            }
        }
    }
}

/// Print every turn that appears in a snapshot, once.
fn spawn_printer(
    mut rx: watch::Receiver<SessionSnapshot>,
    mut out: SharedWriter,
    assistant_name: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut cursor = TranscriptCursor::default();
        let width = transcript_width();
        loop {
            let turns = rx.borrow_and_update().turns.clone();
            for turn in cursor.fresh(&turns) {
                let _ = writeln!(out, "{}", render_turn(turn, &assistant_name, width));
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
        debug!("Transcript printer stopped");
    })
}

fn print_all(snapshot: &SessionSnapshot, mut out: SharedWriter, assistant_name: &str) {
    let width = transcript_width();
    let _ = writeln!(out);
    for turn in &snapshot.turns {
        let _ = writeln!(out, "{}", render_turn(turn, assistant_name, width));
    }
}

fn typing_message(assistant_name: &str) -> String {
    format!("{assistant_name} is typing...")
}

fn stop(task: JoinHandle<()>) {
    if !task.is_finished() {
        task.abort();
    }
}
