use axum::http::{HeaderValue, Method, header, header::InvalidHeaderValue};
use core_config::server::ServerConfig;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
];

/// Creates a CORS layer restricted to `allowed_origins`.
///
/// Credentials are allowed and preflight responses are cached for one hour.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Creates a CORS layer that accepts any origin, without credentials.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}

/// Builds the CORS layer described by the server configuration.
///
/// An empty origin list means any origin.
pub fn cors_layer_from_config(config: &ServerConfig) -> Result<CorsLayer, InvalidHeaderValue> {
    if config.allows_any_origin() {
        tracing::info!("CORS configured to allow any origin");
        return Ok(create_permissive_cors_layer());
    }

    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(origins = ?config.cors_allowed_origins, "CORS configured with allowed origins");
    Ok(create_cors_layer(origins))
}
