use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }

    /// Exact match on the canonical stored form.
    pub fn from_status(value: &str) -> Option<Self> {
        match value {
            "Open" => Some(TicketStatus::Open),
            "In Progress" => Some(TicketStatus::InProgress),
            "Resolved" => Some(TicketStatus::Resolved),
            "Closed" => Some(TicketStatus::Closed),
            _ => None,
        }
    }

    /// Lenient match for user-typed labels: case-insensitive, inner whitespace collapsed.
    pub fn from_label(value: &str) -> Option<Self> {
        let normalized = value
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().to_lowercase() == normalized)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TicketStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TicketStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        TicketStatus::from_status(text)
            .ok_or_else(|| FromSqlError::Other(format!("unknown ticket status: {text}").into()))
    }
}

/// A full ticket row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: i64,
    pub customer_name: String,
    pub issue_type: String,
    pub status: TicketStatus,
    pub created_at: String,
    pub updated_at: String,
    pub notes: String,
}

/// Row shape for the dashboard listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSummary {
    pub ticket_id: i64,
    pub customer_name: String,
    pub issue_type: String,
    pub status: TicketStatus,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub ticket_id: i64,
    pub updated_status: TicketStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTicket {
    pub ticket_id: i64,
    pub status: TicketStatus,
}
