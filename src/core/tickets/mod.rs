mod demo;
mod queries;
pub mod types;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

pub use types::{Ticket, TicketStatus};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tickets (
    ticket_id INTEGER PRIMARY KEY,
    customer_name TEXT NOT NULL,
    issue_type TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('Open', 'In Progress', 'Resolved', 'Closed')),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    notes TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS idx_tickets_updated_at ON tickets(updated_at);
";

/// SQLite-backed ticket store shared by every run.
///
/// Each operation holds the connection lock for its whole statement sequence,
/// so a single read-modify-write is observed atomically. Two runs updating the
/// same ticket are last-writer-wins.
#[derive(Clone)]
pub struct TicketStore {
    db: Arc<Mutex<Connection>>,
}

impl TicketStore {
    pub async fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let db = Connection::open(db_path)?;
        db.execute_batch(SCHEMA)?;
        info!("Ticket store ready at {}", db_path.display());

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()?;
        db.execute_batch(SCHEMA)?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    #[cfg(test)]
    pub(crate) fn get_db(&self) -> Arc<Mutex<Connection>> {
        self.db.clone()
    }
}

/// Timestamp format used for `created_at` / `updated_at`. Fixed width, so text
/// ordering in SQLite matches chronological ordering.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// In-memory store for tests.
#[cfg(test)]
pub fn test_ticket_store() -> TicketStore {
    TicketStore::open_in_memory().expect("open in-memory ticket store")
}
