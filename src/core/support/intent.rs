//! Ticket intent parsing: free text in, at most one structured intent out.
//!
//! Rules are tried in order and the first match wins (update, then status,
//! then create). Parsing is pure; nothing here touches the store.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::tickets::TicketStatus;

/// Placeholder customer name; no caller identity reaches this layer.
pub const DEFAULT_CUSTOMER_NAME: &str = "Customer";
pub const DEFAULT_ISSUE_TYPE: &str = "General";
const ISSUE_TYPE_MAX_CHARS: usize = 80;
const NOTES_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TicketIntent {
    UpdateStatus {
        ticket_id: i64,
        status: TicketStatus,
    },
    GetStatus {
        ticket_id: i64,
    },
    Create {
        customer_name: String,
        issue_type: String,
        notes: String,
    },
}

static UPDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:update|set)\s+(?:ticket\s*)?#?([0-9]+)\s+(?:to\s+)?(open|in\s+progress|resolved|closed)\b",
    )
    .expect("update intent regex")
});
static TICKET_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:ticket\s*)?#?([0-9]+)").expect("ticket number regex"));
static STATUS_WORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)status|update|progress|what(?:['’]s|\s+is)?\s+happening")
        .expect("status words regex")
});
static CREATE_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcreate\b").expect("create regex"));
static OPEN_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bopen\b").expect("open regex"));
static TICKET_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bticket\b").expect("ticket regex"));
static ISSUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ticket\s+(?:for|about)\s+(.+)").expect("issue description regex")
});

struct IntentRule {
    name: &'static str,
    extract: fn(&str) -> Option<TicketIntent>,
}

const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        name: "update_status",
        extract: match_update,
    },
    IntentRule {
        name: "get_status",
        extract: match_status,
    },
    IntentRule {
        name: "create",
        extract: match_create,
    },
];

pub fn parse_ticket_request(message: &str) -> Option<TicketIntent> {
    let msg = message.trim();
    INTENT_RULES.iter().find_map(|rule| {
        let intent = (rule.extract)(msg)?;
        debug!("Ticket intent rule matched: {}", rule.name);
        Some(intent)
    })
}

fn match_update(msg: &str) -> Option<TicketIntent> {
    let caps = UPDATE_RE.captures(msg)?;
    let ticket_id = caps.get(1)?.as_str().parse().ok()?;
    let status = TicketStatus::from_label(caps.get(2)?.as_str())?;
    Some(TicketIntent::UpdateStatus { ticket_id, status })
}

fn match_status(msg: &str) -> Option<TicketIntent> {
    if !STATUS_WORDS_RE.is_match(msg) {
        return None;
    }
    let caps = TICKET_NUMBER_RE.captures(msg)?;
    let ticket_id = caps.get(1)?.as_str().parse().ok()?;
    Some(TicketIntent::GetStatus { ticket_id })
}

fn match_create(msg: &str) -> Option<TicketIntent> {
    let mentions_ticket = TICKET_WORD_RE.is_match(msg);
    let wants_new = CREATE_WORD_RE.is_match(msg) || OPEN_WORD_RE.is_match(msg);
    if !(mentions_ticket && wants_new) {
        return None;
    }

    let issue_type = ISSUE_RE
        .captures(msg)
        .and_then(|caps| caps.get(1))
        .map(|m| truncate_chars(m.as_str().trim(), ISSUE_TYPE_MAX_CHARS).trim_end().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_ISSUE_TYPE.to_string());

    Some(TicketIntent::Create {
        customer_name: DEFAULT_CUSTOMER_NAME.to_string(),
        issue_type,
        notes: truncate_chars(msg, NOTES_MAX_CHARS),
    })
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
