use axum::{Router, routing::get};
use domain_users::handlers::USERS_URL;

use crate::state::AppState;

pub mod health;
pub mod users;

/// Creates the API routes without the `/api` prefix.
/// The prefix is added by `axum_helpers::create_router`.
pub fn routes(state: &AppState) -> Router {
    Router::new().nest(USERS_URL, users::router(state))
}

/// Router with the `/ready` endpoint, merged next to the stateless app router.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
