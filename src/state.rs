use crate::config::AppConfig;
use crate::cors::CorsPolicy;
use crate::transport::{HttpTransport, PreparedUpstream};

/// Shared application state, built once at startup and cloned via `Arc` into
/// each invocation. Nothing here is mutated per request.
pub struct AppState {
    pub config: AppConfig,
    pub cors: CorsPolicy,
    pub transport: HttpTransport,
    pub upstream: PreparedUpstream,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let cors = CorsPolicy::new(&config.cors);
        let transport = HttpTransport::new(&config.server);
        let upstream = PreparedUpstream::new(&config.upstream);
        Self {
            config,
            cors,
            transport,
            upstream,
        }
    }
}
