//! Chat session controller.
//!
//! Owns the in-memory view of one identity's conversation and drives the
//! message pipeline: append user turn -> persist -> complete -> append
//! assistant (or fallback) turn -> persist -> clear `pending`.
//!
//! Display state has a single writer: every mutation happens under the
//! session's state lock and is followed by a fresh [`SessionSnapshot`] on a
//! `watch` channel. The persisted log is mirrored wholesale from store
//! snapshots; turns the store has not confirmed yet live in a separate local
//! overlay so a failed write never hides a message from the user.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{Duration, Utc};
use futures_util::StreamExt;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, warn};

use olivia_types::chat::{ChatTurn, FALLBACK_REPLY, Sender, SessionSnapshot, TurnId};
use olivia_types::error::SessionError;
use olivia_types::identity::Identity;
use olivia_types::llm::RoleText;

use super::history::{build_history, next_timestamp, sort_by_timestamp};
use super::store::TurnStore;
use crate::llm::client::CompletionClient;

/// Fixed inputs of a session, resolved from configuration at startup.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub system_prompt: String,
    pub history_window: usize,
    pub welcome_message: String,
}

/// Result of [`ChatSession::submit`].
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Input was empty after trimming. Nothing changed.
    Ignored,
    /// A completion is already outstanding. Nothing changed.
    Busy,
    /// The user turn was recorded and a completion is in flight.
    Accepted { turn: ChatTurn, reply: ReplyHandle },
}

/// Resolves to the assistant turn (reply or fallback) once the exchange
/// started by a submit has settled.
#[derive(Debug)]
pub struct ReplyHandle {
    rx: oneshot::Receiver<ChatTurn>,
}

impl ReplyHandle {
    /// Wait for the assistant turn. `None` only if the runtime shut down
    /// before the completion task finished.
    pub async fn settled(self) -> Option<ChatTurn> {
        self.rx.await.ok()
    }
}

#[derive(Default)]
struct SessionState {
    /// Last full log received from the store.
    mirror: Vec<ChatTurn>,
    /// Turns created here that no store snapshot has confirmed yet.
    overlay: Vec<ChatTurn>,
    pending: bool,
}

impl SessionState {
    fn display(&self) -> Vec<ChatTurn> {
        let known: HashSet<TurnId> = self.mirror.iter().map(|t| t.id).collect();
        let mut turns = self.mirror.clone();
        turns.extend(
            self.overlay
                .iter()
                .filter(|t| !known.contains(&t.id))
                .cloned(),
        );
        sort_by_timestamp(&mut turns);
        turns
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            turns: self.display(),
            pending: self.pending,
        }
    }

    fn last_timestamp(&self) -> Option<chrono::DateTime<Utc>> {
        self.mirror
            .iter()
            .chain(self.overlay.iter())
            .map(|t| t.timestamp)
            .max()
    }

    /// Append a locally created turn with a non-decreasing timestamp.
    fn push_local(&mut self, text: &str, sender: Sender) -> ChatTurn {
        let timestamp = next_timestamp(self.last_timestamp(), Utc::now());
        let turn = ChatTurn::new(text, sender, timestamp);
        self.overlay.push(turn.clone());
        turn
    }
}

struct SessionInner<S, C> {
    identity: Identity,
    store: S,
    client: C,
    settings: SessionSettings,
    state: Mutex<SessionState>,
    updates: watch::Sender<SessionSnapshot>,
}

impl<S: TurnStore, C: CompletionClient> SessionInner<S, C> {
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        let snapshot = self.state().snapshot();
        self.updates.send_replace(snapshot);
    }

    /// Persist a turn. Failures are logged; the turn stays in the overlay.
    async fn persist(&self, turn: &ChatTurn) {
        match self.store.append(&self.identity.id, turn).await {
            Ok(true) => debug!(identity = %self.identity.id, turn_id = %turn.id, "Turn persisted"),
            Ok(false) => debug!(identity = %self.identity.id, turn_id = %turn.id, "Turn already persisted"),
            Err(e) => warn!(
                identity = %self.identity.id,
                turn_id = %turn.id,
                error = %e,
                "Failed to persist turn, keeping it local"
            ),
        }
    }

    fn reconcile(&self, turns: Vec<ChatTurn>) {
        {
            let mut state = self.state();
            let confirmed: HashSet<TurnId> = turns.iter().map(|t| t.id).collect();
            state.overlay.retain(|t| !confirmed.contains(&t.id));
            state.mirror = turns;
        }
        self.publish();
    }

    /// Run one completion and record its outcome as an assistant turn.
    async fn answer(&self, history: Vec<RoleText>) -> ChatTurn {
        let text = match self
            .client
            .complete(&self.settings.system_prompt, &history)
            .await
        {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(identity = %self.identity.id, "Completion returned empty text, using fallback turn");
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                warn!(identity = %self.identity.id, error = %e, "Completion failed, using fallback turn");
                FALLBACK_REPLY.to_string()
            }
        };

        let turn = self.state().push_local(&text, Sender::Assistant);
        self.publish();
        self.persist(&turn).await;

        self.state().pending = false;
        self.publish();
        turn
    }
}

/// A live chat session for one signed-in identity.
///
/// Cheap to clone; clones share state. Submissions are serialized by the
/// `pending` flag: while a completion is outstanding further submits return
/// [`SubmitOutcome::Busy`].
pub struct ChatSession<S, C> {
    inner: Arc<SessionInner<S, C>>,
}

impl<S, C> Clone for ChatSession<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, C> ChatSession<S, C>
where
    S: TurnStore + 'static,
    C: CompletionClient + 'static,
{
    /// Open a session for `identity`.
    ///
    /// Fails with [`SessionError::NotSignedIn`] when no identity is resolved.
    /// Loads the persisted log and seeds the welcome turn. The welcome turn's
    /// id is derived from the identity, so reopening never duplicates it.
    pub async fn open(
        identity: Option<Identity>,
        store: S,
        client: C,
        settings: SessionSettings,
    ) -> Result<Self, SessionError> {
        let identity = identity.ok_or(SessionError::NotSignedIn)?;

        let mirror = match store.list(&identity.id).await {
            Ok(turns) => turns,
            Err(e) => {
                warn!(identity = %identity.id, error = %e, "Failed to load turn log, starting empty");
                Vec::new()
            }
        };

        let welcome_id = TurnId::welcome_for(&identity.id);
        let mut overlay = Vec::new();
        if !mirror.iter().any(|t| t.id == welcome_id) {
            let now = Utc::now();
            // Strictly before the first stored turn; equal timestamps would
            // order the welcome second both here and in the store.
            let at = mirror
                .first()
                .map_or(now, |t| t.timestamp.min(now) - Duration::nanoseconds(1));
            let welcome = ChatTurn::welcome(&identity.id, settings.welcome_message.clone(), at);
            if let Err(e) = store.append(&identity.id, &welcome).await {
                warn!(identity = %identity.id, error = %e, "Failed to persist welcome turn");
            }
            overlay.push(welcome);
        }

        let state = SessionState {
            mirror,
            overlay,
            pending: false,
        };
        let (updates, _) = watch::channel(state.snapshot());

        info!(identity = %identity.id, "Chat session opened");

        Ok(Self {
            inner: Arc::new(SessionInner {
                identity,
                store,
                client,
                settings,
                state: Mutex::new(state),
                updates,
            }),
        })
    }

    /// Submit user input.
    ///
    /// Empty (after trimming) input is ignored. Otherwise the user turn is
    /// recorded with the input as typed, `pending` is set, the turn is
    /// persisted, and the completion runs in a spawned task. The caller is
    /// never blocked on the network round trip.
    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        if raw.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }

        let (turn, history) = {
            let mut state = self.inner.state();
            if state.pending {
                return SubmitOutcome::Busy;
            }
            let prior = state.display();
            let history = build_history(&prior, raw, self.inner.settings.history_window);
            let turn = state.push_local(raw, Sender::User);
            state.pending = true;
            (turn, history)
        };
        self.inner.publish();
        self.inner.persist(&turn).await;

        let (tx, rx) = oneshot::channel();
        let inner = Arc::clone(&self.inner);
        let span = info_span!("chat.submit", identity = %self.inner.identity.id, turns = history.len());
        tokio::spawn(
            async move {
                let reply = inner.answer(history).await;
                let _ = tx.send(reply);
            }
            .instrument(span),
        );

        SubmitOutcome::Accepted {
            turn,
            reply: ReplyHandle { rx },
        }
    }

    /// Replace the mirrored log with a full store snapshot.
    ///
    /// The snapshot is taken as authoritative; overlay turns it contains
    /// are dropped from the overlay.
    pub fn reconcile(&self, turns: Vec<ChatTurn>) {
        self.inner.reconcile(turns);
    }

    /// Follow the store's subscription, reconciling on every snapshot.
    ///
    /// The task holds only a weak reference and ends once every handle to
    /// the session is dropped or the stream ends.
    pub fn spawn_sync(&self) -> JoinHandle<()> {
        let mut stream = self.inner.store.subscribe(&self.inner.identity.id);
        let weak: Weak<SessionInner<S, C>> = Arc::downgrade(&self.inner);
        let identity = self.inner.identity.id;

        tokio::spawn(async move {
            while let Some(turns) = stream.next().await {
                let Some(inner) = weak.upgrade() else { break };
                inner.reconcile(turns);
            }
            debug!(identity = %identity, "Turn subscription ended");
        })
    }

    /// Receive a snapshot after every change to the displayed turns or
    /// the `pending` flag.
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.updates.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state().snapshot()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.state().pending
    }

    pub fn identity(&self) -> &Identity {
        &self.inner.identity
    }
}
