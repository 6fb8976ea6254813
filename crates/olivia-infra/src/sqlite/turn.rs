//! SQLite turn store implementation.
//!
//! Implements `TurnStore` from `olivia-core`. Appends go through the writer
//! pool with `INSERT OR IGNORE` keyed on the turn id, so replays are no-ops.
//! Subscriptions are driven by an in-process [`ChangeNotifier`]: every
//! successful append or delete re-reads the identity's full log for each
//! open subscription.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;

use olivia_core::chat::notify::{ChangeNotifier, snapshot_stream};
use olivia_core::chat::store::{TurnStore, TurnStream};
use olivia_types::chat::{ChatTurn, Sender, TurnId};
use olivia_types::error::RepositoryError;
use olivia_types::identity::IdentityId;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `TurnStore`.
#[derive(Clone)]
pub struct SqliteTurnStore {
    pool: DatabasePool,
    notifier: ChangeNotifier,
}

impl SqliteTurnStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            pool,
            notifier: ChangeNotifier::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct TurnRow {
    id: String,
    text: String,
    sender: String,
    timestamp: String,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            text: row.try_get("text")?,
            sender: row.try_get("sender")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_turn(self) -> Result<ChatTurn, RepositoryError> {
        let id: TurnId = self
            .id
            .parse()
            .map_err(|e| RepositoryError::Query(format!("invalid turn id: {e}")))?;
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatTurn {
            id,
            text: self.text,
            sender,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width RFC 3339 so lexical order in SQL matches time order.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

async fn load_turns(pool: &DatabasePool, identity: &IdentityId) -> Result<Vec<ChatTurn>, RepositoryError> {
    let rows = sqlx::query(
        r#"SELECT id, text, sender, timestamp FROM chat_turns
           WHERE identity_id = ?
           ORDER BY timestamp ASC, rowid ASC"#,
    )
    .bind(identity.to_string())
    .fetch_all(&pool.reader)
    .await
    .map_err(|e| RepositoryError::Query(e.to_string()))?;

    let mut turns = Vec::with_capacity(rows.len());
    for row in &rows {
        let r = TurnRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        turns.push(r.into_turn()?);
    }
    Ok(turns)
}

// ---------------------------------------------------------------------------
// TurnStore impl
// ---------------------------------------------------------------------------

impl TurnStore for SqliteTurnStore {
    async fn append(&self, identity: &IdentityId, turn: &ChatTurn) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO chat_turns (id, identity_id, text, sender, timestamp)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(turn.id.to_string())
        .bind(identity.to_string())
        .bind(&turn.text)
        .bind(turn.sender.to_string())
        .bind(format_datetime(&turn.timestamp))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            self.notifier.notify(identity);
        }
        Ok(inserted)
    }

    async fn list(&self, identity: &IdentityId) -> Result<Vec<ChatTurn>, RepositoryError> {
        load_turns(&self.pool, identity).await
    }

    fn subscribe(&self, identity: &IdentityId) -> TurnStream {
        let pool = self.pool.clone();
        let identity = *identity;
        snapshot_stream(identity, self.notifier.subscribe(), move || {
            let pool = pool.clone();
            async move { load_turns(&pool, &identity).await }
        })
    }

    async fn delete_all(&self, identity: &IdentityId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_turns WHERE identity_id = ?")
            .bind(identity.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        self.notifier.notify(identity);
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;
    use chrono::Duration;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_append_and_list_roundtrip() {
        let (pool, _dir) = test_pool::open().await;
        let store = SqliteTurnStore::new(pool);
        let identity = IdentityId::new();

        let turn = ChatTurn::new("  What do I text her?  ", Sender::User, Utc::now());
        assert!(store.append(&identity, &turn).await.unwrap());

        let turns = store.list(&identity).await.unwrap();
        assert_eq!(turns, vec![turn]);
    }

    #[tokio::test]
    async fn test_duplicate_append_is_noop() {
        let (pool, _dir) = test_pool::open().await;
        let store = SqliteTurnStore::new(pool);
        let identity = IdentityId::new();
        let turn = ChatTurn::new("hi", Sender::User, Utc::now());

        assert!(store.append(&identity, &turn).await.unwrap());
        assert!(!store.append(&identity, &turn).await.unwrap());
        assert_eq!(store.list(&identity).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_by_timestamp() {
        let (pool, _dir) = test_pool::open().await;
        let store = SqliteTurnStore::new(pool);
        let identity = IdentityId::new();
        let base = Utc::now();

        // Second-boundary crossing: fixed-width formatting keeps these ordered.
        let a = ChatTurn::new("a", Sender::User, base);
        let b = ChatTurn::new("b", Sender::Assistant, base + Duration::milliseconds(1500));
        let c = ChatTurn::new("c", Sender::User, base + Duration::seconds(10));
        for turn in [&c, &a, &b] {
            store.append(&identity, turn).await.unwrap();
        }

        let ids: Vec<TurnId> = store.list(&identity).await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, [a.id, b.id, c.id]);
    }

    #[tokio::test]
    async fn test_logs_are_scoped_by_identity() {
        let (pool, _dir) = test_pool::open().await;
        let store = SqliteTurnStore::new(pool);
        let sam = IdentityId::new();
        let alex = IdentityId::new();

        store
            .append(&sam, &ChatTurn::new("sam's", Sender::User, Utc::now()))
            .await
            .unwrap();
        assert!(store.list(&alex).await.unwrap().is_empty());

        assert_eq!(store.delete_all(&alex).await.unwrap(), 0);
        assert_eq!(store.delete_all(&sam).await.unwrap(), 1);
        assert!(store.list(&sam).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_follows_appends() {
        let (pool, _dir) = test_pool::open().await;
        let store = SqliteTurnStore::new(pool);
        let identity = IdentityId::new();
        let mut stream = store.subscribe(&identity);

        assert!(stream.next().await.unwrap().is_empty());

        let turn = ChatTurn::new("hello", Sender::User, Utc::now());
        store.append(&identity, &turn).await.unwrap();
        assert_eq!(stream.next().await.unwrap(), vec![turn.clone()]);

        // A duplicate append changes nothing and wakes no one.
        store.append(&identity, &turn).await.unwrap();
        let reply = ChatTurn::new("hey!", Sender::Assistant, Utc::now());
        store.append(&identity, &reply).await.unwrap();
        assert_eq!(stream.next().await.unwrap().len(), 2);
    }

    #[test]
    fn test_datetime_format_is_fixed_width() {
        let a = format_datetime(&"2025-01-01T10:00:00Z".parse().unwrap());
        let b = format_datetime(&"2025-01-01T10:00:00.5Z".parse().unwrap());
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }
}
