use anyhow::Result;
use rusqlite::{Row, params};

use super::types::{CreatedTicket, StatusUpdate, Ticket, TicketStatus, TicketSummary};
use super::{TicketStore, now_timestamp};

fn ticket_from_row(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        ticket_id: row.get(0)?,
        customer_name: row.get(1)?,
        issue_type: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        notes: row.get(6)?,
    })
}

impl TicketStore {
    pub async fn get_ticket(&self, ticket_id: i64) -> Result<Option<Ticket>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT ticket_id, customer_name, issue_type, status, created_at, updated_at, notes
             FROM tickets WHERE ticket_id = ?1 LIMIT 1",
        )?;
        let mut rows = stmt.query(params![ticket_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(ticket_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Returns `None` when no ticket has that id; nothing is written in that case.
    pub async fn update_ticket_status(
        &self,
        ticket_id: i64,
        status: TicketStatus,
    ) -> Result<Option<StatusUpdate>> {
        let db = self.db.lock().await;
        // MAX keeps updated_at >= created_at even if the wall clock steps back.
        let rows = db.execute(
            "UPDATE tickets SET status = ?1, updated_at = MAX(?2, created_at) WHERE ticket_id = ?3",
            params![status, now_timestamp(), ticket_id],
        )?;
        if rows == 0 {
            return Ok(None);
        }
        Ok(Some(StatusUpdate {
            ticket_id,
            updated_status: status,
        }))
    }

    pub async fn create_ticket(
        &self,
        customer_name: &str,
        issue_type: &str,
        notes: &str,
    ) -> Result<CreatedTicket> {
        let now = now_timestamp();
        let db = self.db.lock().await;
        db.execute(
            "INSERT INTO tickets (customer_name, issue_type, status, created_at, updated_at, notes)
             VALUES (?1, ?2, ?3, ?4, ?4, ?5)",
            params![customer_name, issue_type, TicketStatus::Open, now, notes],
        )?;
        Ok(CreatedTicket {
            ticket_id: db.last_insert_rowid(),
            status: TicketStatus::Open,
        })
    }

    pub async fn list_tickets(&self, limit: usize) -> Result<Vec<TicketSummary>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT ticket_id, customer_name, issue_type, status, updated_at
             FROM tickets ORDER BY updated_at DESC, ticket_id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(TicketSummary {
                ticket_id: row.get(0)?,
                customer_name: row.get(1)?,
                issue_type: row.get(2)?,
                status: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
