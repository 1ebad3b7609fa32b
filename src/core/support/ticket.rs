use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::intent::{TicketIntent, parse_ticket_request};
use crate::core::tickets::{Ticket, TicketStatus, TicketStore};

pub const TICKET_NOT_FOUND: &str = "Ticket not found.";

/// Outcome of executing a ticket intent. A lookup miss is a normal
/// `found: false` result, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TicketAction {
    GetStatus {
        ticket_id: i64,
        found: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ticket: Option<Ticket>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    UpdateStatus {
        ticket_id: i64,
        found: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        updated_status: Option<TicketStatus>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Create {
        ticket_id: i64,
        status: TicketStatus,
        created: bool,
    },
}

pub async fn execute_ticket_intent(
    store: &TicketStore,
    intent: TicketIntent,
) -> Result<TicketAction> {
    match intent {
        TicketIntent::GetStatus { ticket_id } => {
            let action = match store.get_ticket(ticket_id).await? {
                Some(ticket) => TicketAction::GetStatus {
                    ticket_id,
                    found: true,
                    ticket: Some(ticket),
                    message: None,
                },
                None => TicketAction::GetStatus {
                    ticket_id,
                    found: false,
                    ticket: None,
                    message: Some(TICKET_NOT_FOUND.to_string()),
                },
            };
            Ok(action)
        }
        TicketIntent::UpdateStatus { ticket_id, status } => {
            let action = match store.update_ticket_status(ticket_id, status).await? {
                Some(upd) => {
                    info!("Ticket {} moved to {}", upd.ticket_id, upd.updated_status);
                    TicketAction::UpdateStatus {
                        ticket_id: upd.ticket_id,
                        found: true,
                        updated_status: Some(upd.updated_status),
                        message: None,
                    }
                }
                None => TicketAction::UpdateStatus {
                    ticket_id,
                    found: false,
                    updated_status: None,
                    message: Some(TICKET_NOT_FOUND.to_string()),
                },
            };
            Ok(action)
        }
        TicketIntent::Create {
            customer_name,
            issue_type,
            notes,
        } => {
            let created = store
                .create_ticket(&customer_name, &issue_type, &notes)
                .await?;
            info!("Created ticket {} ({})", created.ticket_id, issue_type);
            Ok(TicketAction::Create {
                ticket_id: created.ticket_id,
                status: created.status,
                created: true,
            })
        }
    }
}

/// The `ticket` node: parse the message, then run the intent if there is one.
pub async fn resolve_ticket_action(
    store: &TicketStore,
    user_message: &str,
) -> Result<Option<TicketAction>> {
    match parse_ticket_request(user_message) {
        Some(intent) => Ok(Some(execute_ticket_intent(store, intent).await?)),
        None => Ok(None),
    }
}
