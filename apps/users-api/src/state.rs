//! Shared application state passed to the app-level routers.

/// Cloned per router (the connection pool is an `Arc` internally).
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
}
