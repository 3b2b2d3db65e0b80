use axum::response::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// Health check handler.
/// Returns JSON with status and a non-secret config summary.
pub fn handler(state: &AppState) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "status": "realty-gateway is running",
        "config": {
            "allowed_origins_count": config.cors.allowed_origins.len(),
            "upstream": {
                "base_url": config.upstream.base_url,
                "chat_model": config.upstream.chat_model,
                "lookup_model": config.upstream.lookup_model,
            },
            "features": {
                "log_level": config.features.log_level,
            }
        }
    }))
}
