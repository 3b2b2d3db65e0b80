use serde_json::json;

/// Canonical error type used across all modules.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Upstream request failed: {status} - {message}")]
    Upstream { status: u16, message: String },
    #[error("Invalid upstream response format: {0}")]
    InvalidResponseFormat(String),
    #[error("Malformed extraction: {0}")]
    MalformedExtraction(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Which handler produced the error. Selects the fixed `error` string in the
/// client-facing body and whether a diagnostic `trace` field is included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    Chat,
    Lookup,
}

impl GatewayError {
    /// HTTP status for the client-facing response.
    ///
    /// Everything except a method mismatch maps to 500; upstream statuses are
    /// never passed through, they only appear inside `details`.
    #[must_use]
    pub fn http_status(&self) -> http::StatusCode {
        match self {
            GatewayError::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            _ => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Format an error as the uniform `{error, details}` body for a given scope,
/// returning (`status_code`, JSON body).
#[must_use]
pub fn format_error(err: &GatewayError, scope: ErrorScope) -> (http::StatusCode, serde_json::Value) {
    let status = err.http_status();

    let body = match err {
        GatewayError::MethodNotAllowed => json!({ "error": "Method Not Allowed" }),
        GatewayError::Config(details) => json!({
            "error": "Configuration error",
            "details": details,
        }),
        _ => {
            let headline = match scope {
                ErrorScope::Chat => "Failed to process request",
                ErrorScope::Lookup => "Failed to fetch property data",
            };
            let mut body = json!({
                "error": headline,
                "details": err.to_string(),
            });
            if scope == ErrorScope::Lookup {
                body["trace"] = serde_json::Value::String(format!("{err:?}"));
            }
            body
        }
    };

    (status, body)
}
