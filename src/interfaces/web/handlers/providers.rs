use axum::{Json, extract::State};

use super::super::AppState;
use crate::core::llm::registry::ProviderRegistry;

pub async fn get_providers_endpoint(State(state): State<AppState>) -> Json<serde_json::Value> {
    let registry = ProviderRegistry::load();
    let (active_provider, active_model) = state.llm.get_active_info();
    Json(serde_json::json!({
        "success": true,
        "active": { "provider": active_provider, "model": active_model },
        "providers": registry.providers.iter().map(|p| {
            serde_json::json!({
                "id": p.id,
                "name": p.name,
                "api_format": p.api_format,
                "default_model": p.default_model,
                "base_url": p.base_url,
                "models": p.models.iter().map(|m| {
                    serde_json::json!({ "id": m.id, "name": m.name })
                }).collect::<Vec<_>>()
            })
        }).collect::<Vec<_>>()
    }))
}
