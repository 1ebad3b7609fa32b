use axum::{Json, extract::State};
use tracing::warn;

use super::super::AppState;
use crate::core::support::run_support_graph;

#[derive(serde::Deserialize)]
pub struct SupportMessageRequest {
    message: String,
}

pub async fn post_support_message(
    State(state): State<AppState>,
    Json(payload): Json<SupportMessageRequest>,
) -> Json<serde_json::Value> {
    match run_support_graph(&payload.message, &state.llm, &state.store).await {
        Ok(outcome) => Json(serde_json::json!({ "success": true, "outcome": outcome })),
        Err(e) => {
            warn!("Support message failed: {}", e);
            Json(serde_json::json!({
                "success": false,
                "failed_node": e.failed_node(),
                "error": e.to_string(),
            }))
        }
    }
}
