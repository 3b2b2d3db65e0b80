use crate::config::UpstreamConfig;
use crate::error::GatewayError;

/// Precomputed upstream endpoint and static headers, built once at startup.
#[derive(Debug, Clone)]
pub struct PreparedUpstream {
    completions_url: String,
    completions_url_parsed: Option<url::Url>,
    static_headers: http::HeaderMap,
}

impl PreparedUpstream {
    /// Build the prepared endpoint from configuration.
    #[must_use]
    pub fn new(upstream: &UpstreamConfig) -> Self {
        let base = upstream.base_url.trim_end_matches('/');
        let completions_url = format!("{base}/chat/completions");
        let completions_url_parsed = url::Url::parse(&completions_url).ok();
        let static_headers = Self::build_headers(upstream);

        Self {
            completions_url,
            completions_url_parsed,
            static_headers,
        }
    }

    #[must_use]
    pub fn completions_url(&self) -> &str {
        &self.completions_url
    }

    /// The pre-parsed completions URL.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] when the configured base URL did not
    /// parse at startup.
    pub fn completions_url_parsed(&self) -> Result<&url::Url, GatewayError> {
        self.completions_url_parsed
            .as_ref()
            .ok_or_else(|| GatewayError::Config("Upstream base URL is not a valid URL".to_string()))
    }

    #[must_use]
    pub fn static_headers(&self) -> &http::HeaderMap {
        &self.static_headers
    }

    fn build_headers(upstream: &UpstreamConfig) -> http::HeaderMap {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            http::header::ACCEPT,
            http::HeaderValue::from_static("application/json"),
        );
        let key = upstream.api_key.trim();
        if let Ok(val) = http::HeaderValue::from_str(&format!("Bearer {key}")) {
            headers.insert(http::header::AUTHORIZATION, val);
        }
        headers
    }
}

/// Per-request credential precondition: the configured key must be present and
/// carry the provider's expected prefix. Checked before any network call; the
/// error message never includes the key itself.
///
/// # Errors
///
/// Returns [`GatewayError::Config`] when the key is missing or malformed.
pub fn check_credential(upstream: &UpstreamConfig) -> Result<(), GatewayError> {
    let key = upstream.api_key.trim();
    if key.is_empty() || !key.starts_with(&upstream.key_prefix) {
        return Err(GatewayError::Config(format!(
            "API key is missing or does not start with '{}'",
            upstream.key_prefix
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_upstream(api_key: &str) -> UpstreamConfig {
        UpstreamConfig {
            api_key: api_key.to_string(),
            ..UpstreamConfig::default()
        }
    }

    #[test]
    fn test_completions_url() {
        let prepared = PreparedUpstream::new(&make_upstream("pplx-test"));
        assert_eq!(
            prepared.completions_url(),
            "https://api.perplexity.ai/chat/completions"
        );
        assert_eq!(
            prepared.completions_url_parsed().unwrap().as_str(),
            "https://api.perplexity.ai/chat/completions"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let upstream = UpstreamConfig {
            base_url: "https://api.perplexity.ai/".to_string(),
            ..make_upstream("pplx-test")
        };
        let prepared = PreparedUpstream::new(&upstream);
        assert_eq!(
            prepared.completions_url(),
            "https://api.perplexity.ai/chat/completions"
        );
    }

    #[test]
    fn test_static_headers() {
        let prepared = PreparedUpstream::new(&make_upstream("pplx-test"));
        let headers = prepared.static_headers();
        assert_eq!(
            headers.get(http::header::AUTHORIZATION).unwrap(),
            "Bearer pplx-test"
        );
        assert_eq!(
            headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            headers.get(http::header::ACCEPT).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_check_credential_valid() {
        assert!(check_credential(&make_upstream("pplx-abc123")).is_ok());
    }

    #[test]
    fn test_check_credential_missing() {
        let err = check_credential(&make_upstream("")).unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_check_credential_wrong_prefix() {
        let err = check_credential(&make_upstream("sk-abc123")).unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_check_credential_does_not_leak_key() {
        let err = check_credential(&make_upstream("sk-secret-value")).unwrap_err();
        assert!(!err.to_string().contains("sk-secret-value"));
    }

    #[test]
    fn test_check_credential_trims_whitespace() {
        assert!(check_credential(&make_upstream("  pplx-abc123  ")).is_ok());
    }
}
