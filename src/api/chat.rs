use std::sync::Arc;

use axum::response::Response;
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

use crate::api::common::{error_response, json_response};
use crate::error::{ErrorScope, GatewayError};
use crate::protocol::completion::chat_request;
use crate::state::AppState;
use crate::upstream;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub message: String,
    /// Always empty: upstream citation data is intentionally discarded.
    pub citations: Vec<serde_json::Value>,
}

pub async fn handler(state: Arc<AppState>, cors: HeaderMap, body: bytes::Bytes) -> Response {
    match handler_inner(&state, body).await {
        Ok(reply) => json_response(StatusCode::OK, &cors, reply),
        Err(err) => {
            tracing::error!(error = %err, "chat request failed");
            error_response(&err, &cors, ErrorScope::Chat)
        }
    }
}

async fn handler_inner(state: &AppState, body: bytes::Bytes) -> Result<ChatReply, GatewayError> {
    let request: ChatBody = serde_json::from_slice(&body)
        .map_err(|err| GatewayError::InvalidRequest(err.to_string()))?;

    tracing::debug!(
        model = %state.config.upstream.chat_model,
        message_len = request.message.len(),
        "forwarding chat message"
    );

    let completion = chat_request(state.config.upstream.chat_model, &request.message);
    let content = upstream::complete(state, &completion).await?;

    Ok(ChatReply {
        message: content,
        citations: Vec::new(),
    })
}
