use std::convert::Infallible;
use std::sync::Arc;

use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::api::common::{error_response, json_response};
use crate::api::{chat, health, lookup};
use crate::error::{ErrorScope, GatewayError};
use crate::state::AppState;

const DEFAULT_BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

enum RouteMatch {
    Health,
    Chat,
    Lookup,
    Preflight,
    MethodNotAllowed,
    NotFound,
}

/// Dispatch a raw HTTP request to the matching handler.
///
/// This is the shared gateway wrapper: the CORS header set is computed once
/// from the request origin and attached to every response path of the
/// invocation, and the method state machine (preflight short-circuit, 405 on
/// verb mismatch) is applied uniformly before any handler runs.
///
/// # Errors
///
/// This function currently never returns `Err` and uses `Infallible`.
pub async fn dispatch_request(
    state: Arc<AppState>,
    base_path: Arc<str>,
    request: Request<Body>,
) -> Result<Response, Infallible> {
    let (parts, body) = request.into_parts();
    let origin = parts
        .headers
        .get(http::header::ORIGIN)
        .and_then(|v| v.to_str().ok());
    let cors = state.cors.response_headers(origin);
    let route = match_route(&parts.method, parts.uri.path(), base_path.as_ref());

    let response = match route {
        RouteMatch::Preflight => (StatusCode::NO_CONTENT, cors).into_response(),
        RouteMatch::Health => json_response(StatusCode::OK, &cors, health::handler(&state).0),
        RouteMatch::Chat => {
            let body_bytes = match read_request_body(body).await {
                Ok(bytes) => bytes,
                Err(response) => return Ok(response),
            };
            chat::handler(state, cors, body_bytes).await
        }
        RouteMatch::Lookup => {
            let body_bytes = match read_request_body(body).await {
                Ok(bytes) => bytes,
                Err(response) => return Ok(response),
            };
            lookup::handler(state, cors, body_bytes).await
        }
        RouteMatch::MethodNotAllowed => {
            error_response(&GatewayError::MethodNotAllowed, &cors, ErrorScope::Chat)
        }
        RouteMatch::NotFound => {
            json_response(StatusCode::NOT_FOUND, &cors, json!({ "error": "Not Found" }))
        }
    };

    Ok(response)
}

#[must_use]
pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim();
    if trimmed.is_empty() || trimmed == "/" {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.trim_end_matches('/').to_string()
    } else {
        format!("/{}", trimmed.trim_end_matches('/'))
    }
}

async fn read_request_body(body: Body) -> Result<bytes::Bytes, Response> {
    body::to_bytes(body, DEFAULT_BODY_LIMIT_BYTES)
        .await
        .map_err(|_| {
            (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large (max 2MiB)",
            )
                .into_response()
        })
}

fn match_route(method: &Method, path: &str, base_path: &str) -> RouteMatch {
    let Some(path) = strip_base_path(path, base_path) else {
        return RouteMatch::NotFound;
    };

    match path {
        "/" => {
            if method == Method::GET {
                RouteMatch::Health
            } else {
                RouteMatch::MethodNotAllowed
            }
        }
        "/chat" => handler_route(method, RouteMatch::Chat),
        "/property-lookup" => handler_route(method, RouteMatch::Lookup),
        _ => RouteMatch::NotFound,
    }
}

fn handler_route(method: &Method, matched: RouteMatch) -> RouteMatch {
    if method == Method::OPTIONS {
        RouteMatch::Preflight
    } else if method == Method::POST {
        matched
    } else {
        RouteMatch::MethodNotAllowed
    }
}

fn strip_base_path<'a>(path: &'a str, base_path: &str) -> Option<&'a str> {
    if base_path.is_empty() {
        return Some(path);
    }

    let remainder = path.strip_prefix(base_path)?;
    if remainder.is_empty() {
        Some("/")
    } else if remainder.starts_with('/') {
        Some(remainder)
    } else {
        None
    }
}
