//! Session backend seam.
//!
//! The pipeline correlates each run with a session row in a hosted
//! relational store. The store itself is out of scope; this module defines
//! the trait the dispatcher talks to, the error taxonomy (a missing table
//! is a soft condition, everything else is hard), and an in-memory
//! implementation backing tests and offline runs.

use async_trait::async_trait;
use sf_protocol::state_models::ScanSession;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The sessions table does not exist yet.
    ///
    /// Treated as soft by callers: logged as a warning and degraded to an
    /// empty result, never surfaced as a failure.
    #[error("Table not found: {table}")]
    TableNotFound { table: String },

    /// A query failed for a reason other than a missing table.
    #[error("Query failed: {0}")]
    Query(String),

    /// The backend could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),
}

/// Row-level access to the hosted sessions table.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// The most recent sessions, ordered by creation time, newest first,
    /// limited to `limit` rows.
    async fn recent_sessions(&self, limit: usize) -> Result<Vec<ScanSession>, BackendError>;

    /// Insert or update the session row for this run.
    async fn save_session(&self, session: &ScanSession) -> Result<(), BackendError>;
}

/// In-memory backend for tests and offline runs.
pub struct MemoryBackend {
    rows: RwLock<Vec<ScanSession>>,
    table_missing: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            table_missing: false,
        }
    }

    /// A backend whose sessions table does not exist, for exercising the
    /// soft degradation path.
    pub fn with_missing_table() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            table_missing: true,
        }
    }

    /// Number of stored rows.
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether a row with `id` exists.
    pub async fn contains(&self, id: Uuid) -> bool {
        self.rows.read().await.iter().any(|row| row.id == id)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionBackend for MemoryBackend {
    async fn recent_sessions(&self, limit: usize) -> Result<Vec<ScanSession>, BackendError> {
        if self.table_missing {
            return Err(BackendError::TableNotFound {
                table: "scan_sessions".to_string(),
            });
        }

        let rows = self.rows.read().await;
        let mut sessions: Vec<ScanSession> = rows.clone();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sessions.truncate(limit);
        Ok(sessions)
    }

    async fn save_session(&self, session: &ScanSession) -> Result<(), BackendError> {
        if self.table_missing {
            return Err(BackendError::TableNotFound {
                table: "scan_sessions".to_string(),
            });
        }

        let mut rows = self.rows.write().await;
        if let Some(existing) = rows.iter_mut().find(|row| row.id == session.id) {
            *existing = session.clone();
        } else {
            rows.push(session.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sf_protocol::state_models::SessionStatus;

    fn session(minutes_ago: i64) -> ScanSession {
        ScanSession {
            id: Uuid::new_v4(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            status: SessionStatus::InProgress,
        }
    }

    #[tokio::test]
    async fn test_recent_sessions_orders_newest_first_and_limits() {
        let backend = MemoryBackend::new();
        let old = session(60);
        let mid = session(30);
        let new = session(1);
        for row in [&old, &mid, &new] {
            backend.save_session(row).await.unwrap();
        }

        let recent = backend.recent_sessions(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, new.id);
        assert_eq!(recent[1].id, mid.id);
    }

    #[tokio::test]
    async fn test_save_updates_existing_row() {
        let backend = MemoryBackend::new();
        let mut row = session(5);
        backend.save_session(&row).await.unwrap();

        row.status = SessionStatus::Completed;
        backend.save_session(&row).await.unwrap();

        assert_eq!(backend.row_count().await, 1);
        let recent = backend.recent_sessions(10).await.unwrap();
        assert_eq!(recent[0].status, SessionStatus::Completed);
    }

    #[tokio::test]
    async fn test_missing_table_is_reported_as_such() {
        let backend = MemoryBackend::with_missing_table();
        let err = backend.recent_sessions(10).await.unwrap_err();
        assert!(matches!(err, BackendError::TableNotFound { .. }));
    }
}
