use axum::response::{IntoResponse, Response};
use http::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::error::{format_error, ErrorScope, GatewayError};

/// Build a JSON response carrying the invocation's CORS header set.
pub(crate) fn json_response<T: Serialize>(status: StatusCode, cors: &HeaderMap, body: T) -> Response {
    (status, cors.clone(), axum::Json(body)).into_response()
}

/// Map an error to the uniform `{error, details}` envelope, still attaching
/// the CORS headers so browsers can read the failure.
pub(crate) fn error_response(err: &GatewayError, cors: &HeaderMap, scope: ErrorScope) -> Response {
    let (status, body) = format_error(err, scope);
    (status, cors.clone(), axum::Json(body)).into_response()
}
