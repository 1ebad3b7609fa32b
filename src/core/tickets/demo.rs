use anyhow::Result;
use rusqlite::params;
use tracing::info;

use super::types::TicketStatus;
use super::{TicketStore, now_timestamp};

const DEMO_TICKETS: &[(i64, &str, &str, TicketStatus, &str)] = &[
    (
        1001,
        "Anjali",
        "Card dispute",
        TicketStatus::InProgress,
        "Merchant dispute filed. Awaiting investigation.",
    ),
    (
        1002,
        "David",
        "Transfer pending",
        TicketStatus::Open,
        "IMPS transfer pending verification.",
    ),
    (
        1003,
        "Ramesh",
        "Account login",
        TicketStatus::Resolved,
        "Password reset completed; customer confirmed access.",
    ),
];

impl TicketStore {
    /// Upsert the demo tickets (1001-1003). Re-seeding resets them.
    pub async fn seed_demo_tickets(&self) -> Result<usize> {
        let now = now_timestamp();
        let mut db = self.db.lock().await;
        let tx = db.transaction()?;
        for (ticket_id, customer_name, issue_type, status, notes) in DEMO_TICKETS {
            tx.execute(
                "INSERT OR REPLACE INTO tickets
                 (ticket_id, customer_name, issue_type, status, created_at, updated_at, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?6)",
                params![ticket_id, customer_name, issue_type, status, now, notes],
            )?;
        }
        tx.commit()?;
        info!("Seeded {} demo tickets", DEMO_TICKETS.len());
        Ok(DEMO_TICKETS.len())
    }
}
