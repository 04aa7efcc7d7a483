use axum::Router;
use axum_helpers::server::{close_postgres, create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first so startup failures are readable
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        run_migrations::<migration::Migrator>(&db, config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Migration failed: {}", e))?;
    }

    let state = AppState { config, db };
    let app = build_app(&state)?;

    info!("Starting users API with production-ready shutdown (30s timeout)");

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");
            close_postgres(state.db, "users").await;
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}

/// Full application router:
/// - `/api/users/...` with docs and middleware from `create_router`
/// - `/health`: liveness with app name/version
/// - `/ready`: readiness with a database ping
fn build_app(state: &AppState) -> eyre::Result<Router> {
    let router = create_router::<openapi::ApiDoc>(api::routes(state), &state.config.server)?;

    Ok(router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone())))
}
