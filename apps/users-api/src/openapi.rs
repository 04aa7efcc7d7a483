use domain_users::handlers::USERS_URL;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "User Management API",
        version = "0.1.0",
        description = "CRUD API for user records with unique email addresses"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = USERS_URL, api = domain_users::ApiDoc)
    )
)]
pub struct ApiDoc;
