use crate::error::GatewayError;
use crate::protocol::completion::{CompletionRequest, CompletionResponse};
use crate::state::AppState;
use crate::transport::check_credential;

/// Fixed message surfaced when the upstream rejects the configured credential,
/// replacing the raw 401 body.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: Please verify your API key.";

/// Issue one completion call and return the first choice's message content.
///
/// Preconditions: the configured credential must be present and carry the
/// expected prefix; otherwise this fails before any network I/O.
///
/// # Errors
///
/// - [`GatewayError::Config`] when the credential is missing or malformed.
/// - [`GatewayError::Transport`] when the HTTPS call itself fails.
/// - [`GatewayError::Upstream`] on a non-2xx upstream status; a 401 carries
///   [`UNAUTHORIZED_MESSAGE`] instead of the raw body.
/// - [`GatewayError::InvalidResponseFormat`] when a 2xx response does not
///   contain at least one choice with non-empty message content.
pub async fn complete(state: &AppState, request: &CompletionRequest) -> Result<String, GatewayError> {
    check_credential(&state.config.upstream)?;

    let url = state.upstream.completions_url_parsed()?;
    let body = serde_json::to_vec(request)
        .map_err(|err| GatewayError::Transport(format!("Failed to encode upstream request: {err}")))?;

    let response = state
        .transport
        .post(url, state.upstream.static_headers(), bytes::Bytes::from(body))
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = if status == reqwest::StatusCode::UNAUTHORIZED {
            UNAUTHORIZED_MESSAGE.to_string()
        } else {
            response.text().await.unwrap_or_default()
        };
        tracing::error!(
            status = status.as_u16(),
            message = %message,
            "upstream completion request failed"
        );
        return Err(GatewayError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    let body_bytes = response
        .bytes()
        .await
        .map_err(|err| GatewayError::Transport(err.to_string()))?;
    let envelope: CompletionResponse = serde_json::from_slice(&body_bytes)
        .map_err(|err| GatewayError::InvalidResponseFormat(err.to_string()))?;

    let content = envelope.first_content().ok_or_else(|| {
        tracing::error!(
            body = %String::from_utf8_lossy(&body_bytes),
            "upstream response has no usable choice content"
        );
        GatewayError::InvalidResponseFormat("no message content in response".to_string())
    })?;

    Ok(content.to_string())
}
