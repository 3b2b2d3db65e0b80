use http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use rustc_hash::FxHashSet;

use crate::config::CorsConfig;

/// Origin allow-list plus the static CORS headers attached to every response.
///
/// Matching is exact string membership; there is no wildcard or subdomain
/// matching. A request from an unlisted origin is still processed, but the
/// `Access-Control-Allow-Origin` echo is omitted so browsers reject the
/// response.
pub struct CorsPolicy {
    allowed_origins: FxHashSet<String>,
}

impl CorsPolicy {
    #[must_use]
    pub fn new(config: &CorsConfig) -> Self {
        Self {
            allowed_origins: config.allowed_origins.iter().cloned().collect(),
        }
    }

    #[must_use]
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.contains(origin)
    }

    /// Compute the header set for one invocation. Called once per request and
    /// reused on every response path, success or error.
    #[must_use]
    pub fn response_headers(&self, origin: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(4);
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(origin) = origin {
            if self.is_allowed(origin) {
                if let Ok(value) = HeaderValue::from_str(origin) {
                    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
                }
            }
        }

        headers
    }
}
