use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{cors_layer_from_config, security_headers};
use axum::{Json, Router, http::StatusCode, middleware, routing::get};
use core_config::server::ServerConfig;
use std::future::{Future, IntoFuture};
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Path of the generated OpenAPI document.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Creates the application router with documentation and cross-cutting middleware.
///
/// Sets up:
/// - the OpenAPI document at [`OPENAPI_JSON_PATH`] plus ReDoc (`/redoc`),
///   RapiDoc (`/rapidoc`) and Scalar (`/scalar`) viewers
/// - API routes nested under `/api`
/// - a JSON 404 fallback
/// - tracing, request timeout, security headers, CORS and compression layers
///
/// Health endpoints (`/health`, `/ready`) are merged in by the app itself.
///
/// # Errors
/// Fails if a configured CORS origin is not a valid header value.
///
/// # Example
/// ```ignore
/// #[derive(OpenApi)]
/// #[openapi(paths(/* your paths */))]
/// struct ApiDoc;
///
/// let api_routes = Router::new().nest("/users", domain_users::handlers::router(service));
/// let router = create_router::<ApiDoc>(api_routes, &ServerConfig::default())?;
/// ```
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};

    let cors_layer = cors_layer_from_config(server_config).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
        )
    })?;

    let openapi = T::openapi();
    let openapi_json = openapi.clone();

    let router = Router::new()
        .route(
            OPENAPI_JSON_PATH,
            get(move || {
                let doc = openapi_json.clone();
                async move { Json(doc) }
            }),
        )
        .merge(Redoc::with_url("/redoc", openapi.clone()))
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", openapi))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            server_config.request_timeout(),
        ))
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serves `router` until SIGINT/SIGTERM, then runs `cleanup` within `shutdown_timeout`.
///
/// In-flight requests are drained by axum's graceful shutdown while the cleanup
/// task closes connections.
///
/// ```ignore
/// let cleanup = async move { close_postgres(db, "main").await };
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (coordinator, _rx) = ShutdownCoordinator::new();
    let signal_coordinator = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let serve = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal_coordinator.wait_for_signal().await });

    serve_with_cleanup(serve, coordinator, shutdown_timeout, cleanup).await
}

/// Drives `serve` to completion, then runs `cleanup` within `shutdown_timeout`.
///
/// Cleanup starts on the first shutdown broadcast, or when `serve` returns
/// without one.
async fn serve_with_cleanup<S, F>(
    serve: S,
    coordinator: ShutdownCoordinator,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    S: IntoFuture<Output = io::Result<()>>,
    F: Future<Output = ()> + Send + 'static,
{
    let cleanup_signal = coordinator.clone();
    let cleanup_handle = tokio::spawn(async move {
        cleanup_signal.wait_for_shutdown().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => {
                tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                );
            }
        }
    });

    let serve_result = serve.await.inspect_err(|e| {
        tracing::error!("Server encountered an error: {:?}", e);
    });

    // No-op when a signal already started shutdown.
    coordinator.shutdown();

    if let Err(e) = cleanup_handle.await {
        tracing::error!("Cleanup task failed: {}", e);
    }

    serve_result
}
