//! In-memory turn store.
//!
//! Backs ephemeral chat sessions (`olivia chat --ephemeral`). Same contract
//! as the SQLite store: idempotent appends, timestamp-ordered listing, and
//! full-snapshot subscriptions.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use olivia_core::chat::history::sort_by_timestamp;
use olivia_core::chat::notify::{ChangeNotifier, snapshot_stream};
use olivia_core::chat::store::{TurnStore, TurnStream};
use olivia_types::chat::{ChatTurn, TurnId};
use olivia_types::error::RepositoryError;
use olivia_types::identity::IdentityId;

type Logs = HashMap<IdentityId, Vec<ChatTurn>>;

#[derive(Clone, Default)]
pub struct InMemoryTurnStore {
    logs: Arc<RwLock<Logs>>,
    notifier: ChangeNotifier,
}

impl InMemoryTurnStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn snapshot(logs: &RwLock<Logs>, identity: &IdentityId) -> Vec<ChatTurn> {
    let logs = logs.read().unwrap_or_else(PoisonError::into_inner);
    let mut turns = logs.get(identity).cloned().unwrap_or_default();
    sort_by_timestamp(&mut turns);
    turns
}

fn contains(log: &[ChatTurn], id: &TurnId) -> bool {
    log.iter().any(|t| t.id == *id)
}

impl TurnStore for InMemoryTurnStore {
    async fn append(&self, identity: &IdentityId, turn: &ChatTurn) -> Result<bool, RepositoryError> {
        {
            let mut logs = self.logs.write().unwrap_or_else(PoisonError::into_inner);
            let log = logs.entry(*identity).or_default();
            if contains(log, &turn.id) {
                return Ok(false);
            }
            log.push(turn.clone());
        }
        self.notifier.notify(identity);
        Ok(true)
    }

    async fn list(&self, identity: &IdentityId) -> Result<Vec<ChatTurn>, RepositoryError> {
        Ok(snapshot(&self.logs, identity))
    }

    fn subscribe(&self, identity: &IdentityId) -> TurnStream {
        let logs = Arc::clone(&self.logs);
        let identity = *identity;
        snapshot_stream(identity, self.notifier.subscribe(), move || {
            let turns = snapshot(&logs, &identity);
            async move { Ok(turns) }
        })
    }

    async fn delete_all(&self, identity: &IdentityId) -> Result<u64, RepositoryError> {
        let removed = self
            .logs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(identity)
            .map_or(0, |log| log.len() as u64);
        self.notifier.notify(identity);
        Ok(removed)
    }
}
