//! TurnStore trait definition.
//!
//! Persistence boundary for chat turns, keyed by identity. Uses native async
//! fn in traits (RPITIT) for the request/response operations and a boxed
//! stream for subscriptions, which outlive the call that creates them.

use std::pin::Pin;
use std::sync::Arc;

use futures_util::Stream;

use olivia_types::chat::ChatTurn;
use olivia_types::error::RepositoryError;
use olivia_types::identity::IdentityId;

/// Lazy stream of full, timestamp-ordered turn lists for one identity.
///
/// The first item is the current log; each later item is the complete log
/// after a change. Consumers replace their state with each item.
pub type TurnStream = Pin<Box<dyn Stream<Item = Vec<ChatTurn>> + Send + 'static>>;

/// Repository trait for an identity's append-only turn log.
///
/// Implementations live in olivia-infra (`SqliteTurnStore`, `InMemoryTurnStore`).
pub trait TurnStore: Send + Sync {
    /// Durably record one turn under the identity's log.
    ///
    /// Idempotent by turn id: appending an id that is already present is a
    /// no-op and returns `Ok(false)`. Returns `Ok(true)` when the turn was added.
    fn append(
        &self,
        identity: &IdentityId,
        turn: &ChatTurn,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Get the identity's full log, ordered by timestamp ascending.
    fn list(
        &self,
        identity: &IdentityId,
    ) -> impl std::future::Future<Output = Result<Vec<ChatTurn>, RepositoryError>> + Send;

    /// Subscribe to the identity's log.
    ///
    /// Each call returns a fresh stream starting from the current state, so a
    /// dropped subscription can be restarted at any time.
    fn subscribe(&self, identity: &IdentityId) -> TurnStream;

    /// Remove every turn in the identity's log (account deletion).
    fn delete_all(
        &self,
        identity: &IdentityId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}

impl<T: TurnStore> TurnStore for Arc<T> {
    fn append(
        &self,
        identity: &IdentityId,
        turn: &ChatTurn,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send {
        (**self).append(identity, turn)
    }

    fn list(
        &self,
        identity: &IdentityId,
    ) -> impl std::future::Future<Output = Result<Vec<ChatTurn>, RepositoryError>> + Send {
        (**self).list(identity)
    }

    fn subscribe(&self, identity: &IdentityId) -> TurnStream {
        (**self).subscribe(identity)
    }

    fn delete_all(
        &self,
        identity: &IdentityId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send {
        (**self).delete_all(identity)
    }
}
