//! Change notification for turn stores.
//!
//! Built on `tokio::sync::broadcast`: every successful append publishes the
//! affected identity, and each subscription stream reloads the full log when
//! its identity changes. Publishing with no active subscribers is a no-op.

use std::future::Future;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use olivia_types::chat::ChatTurn;
use olivia_types::error::RepositoryError;
use olivia_types::identity::IdentityId;

use super::store::TurnStream;

/// Multi-consumer bus of "this identity's log changed" signals.
pub struct ChangeNotifier {
    sender: broadcast::Sender<IdentityId>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IdentityId> {
        self.sender.subscribe()
    }

    /// Signal that `identity`'s log changed.
    pub fn notify(&self, identity: &IdentityId) {
        let _ = self.sender.send(*identity);
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Clone for ChangeNotifier {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}

/// Build a [`TurnStream`] that yields `load()` now and after every change
/// to `identity`.
///
/// `changes` must be subscribed before calling so no change between the
/// subscription and the first load is missed. A lagged receiver triggers a
/// reload (the stream only carries full snapshots, so skipped signals lose
/// nothing). The stream ends when the notifier is dropped. Load failures are
/// logged and the snapshot is skipped.
pub fn snapshot_stream<F, Fut>(
    identity: IdentityId,
    mut changes: broadcast::Receiver<IdentityId>,
    load: F,
) -> TurnStream
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Vec<ChatTurn>, RepositoryError>> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        'outer: loop {
            match load().await {
                Ok(turns) => yield turns,
                Err(e) => warn!(identity = %identity, error = %e, "Failed to load turn snapshot"),
            }

            loop {
                match changes.recv().await {
                    Ok(changed) if changed == identity => break,
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(identity = %identity, skipped, "Turn subscription lagged, reloading");
                        break;
                    }
                    Err(RecvError::Closed) => break 'outer,
                }
            }
        }
    })
}
