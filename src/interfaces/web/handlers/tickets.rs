use axum::{
    Json,
    extract::{Path, Query, State},
};

use super::super::AppState;
use crate::core::support::ticket::TICKET_NOT_FOUND;

const MAX_LIST_LIMIT: usize = 500;

#[derive(serde::Deserialize)]
pub struct ListTicketsQuery {
    limit: Option<usize>,
}

pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<ListTicketsQuery>,
) -> Json<serde_json::Value> {
    let limit = query
        .limit
        .unwrap_or(state.list_limit)
        .clamp(1, MAX_LIST_LIMIT);
    match state.store.list_tickets(limit).await {
        Ok(tickets) => Json(serde_json::json!({ "success": true, "tickets": tickets })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e.to_string() })),
    }
}

pub async fn get_ticket(
    Path(ticket_id): Path<i64>,
    State(state): State<AppState>,
) -> Json<serde_json::Value> {
    match state.store.get_ticket(ticket_id).await {
        Ok(Some(ticket)) => Json(serde_json::json!({ "success": true, "ticket": ticket })),
        Ok(None) => Json(serde_json::json!({ "success": false, "error": TICKET_NOT_FOUND })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e.to_string() })),
    }
}

pub async fn seed_tickets(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.store.seed_demo_tickets().await {
        Ok(seeded) => Json(serde_json::json!({ "success": true, "seeded": seeded })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e.to_string() })),
    }
}
