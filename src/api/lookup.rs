use std::sync::Arc;

use axum::response::Response;
use http::{HeaderMap, StatusCode};
use serde::Deserialize;

use crate::api::common::{error_response, json_response};
use crate::error::{ErrorScope, GatewayError};
use crate::protocol::completion::lookup_request;
use crate::protocol::extract::{parse_property_report, PropertyReport};
use crate::state::AppState;
use crate::upstream;

#[derive(Debug, Deserialize)]
pub struct LookupBody {
    pub address: String,
    pub city: String,
    pub state: String,
}

pub async fn handler(state: Arc<AppState>, cors: HeaderMap, body: bytes::Bytes) -> Response {
    match handler_inner(&state, body).await {
        Ok(report) => json_response(StatusCode::OK, &cors, report),
        Err(err) => {
            tracing::error!(error = %err, "property lookup failed");
            error_response(&err, &cors, ErrorScope::Lookup)
        }
    }
}

async fn handler_inner(state: &AppState, body: bytes::Bytes) -> Result<PropertyReport, GatewayError> {
    let request: LookupBody = serde_json::from_slice(&body)
        .map_err(|err| GatewayError::InvalidRequest(err.to_string()))?;

    tracing::debug!(
        model = %state.config.upstream.lookup_model,
        address = %request.address,
        city = %request.city,
        state = %request.state,
        "forwarding property lookup"
    );

    let completion = lookup_request(
        state.config.upstream.lookup_model,
        &request.address,
        &request.city,
        &request.state,
    );
    let content = upstream::complete(state, &completion).await?;

    parse_property_report(&content)
}
