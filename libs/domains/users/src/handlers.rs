use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{
    SearchParams, ServiceHealthResponse, UserDeletedResponse, UserMessageResponse, UserRequest,
    UserResponse, UserSearchResponse, UsersListResponse,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// Mount point of [`router`] below `/api`
pub const USERS_URL: &str = "/users";
pub const USERS_TAG: &str = "users";

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_users,
        create_user,
        service_health,
        search_users,
        get_user_by_email,
        get_user,
        update_user,
        delete_user,
    ),
    components(
        schemas(
            UserRequest,
            UserResponse,
            UsersListResponse,
            UserSearchResponse,
            UserMessageResponse,
            UserDeletedResponse,
            ServiceHealthResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = USERS_TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the user router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/health", get(service_health))
        .route("/search", get(search_users))
        .route("/email/{email}", get(get_user_by_email))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(shared_service)
}

/// List all users, newest first
#[utoipa::path(
    get,
    path = "",
    tag = USERS_TAG,
    responses(
        (status = 200, description = "All users", body = UsersListResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<UsersListResponse>> {
    let users = service.get_all_users().await?;
    Ok(Json(users.into()))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = USERS_TAG,
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserMessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<UserRequest>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserMessageResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// Service-level health check
#[utoipa::path(
    get,
    path = "/health",
    tag = USERS_TAG,
    responses(
        (status = 200, description = "Service is up", body = ServiceHealthResponse)
    )
)]
async fn service_health() -> Json<ServiceHealthResponse> {
    Json(ServiceHealthResponse::default())
}

/// Search users whose name contains a substring
#[utoipa::path(
    get,
    path = "/search",
    tag = USERS_TAG,
    params(SearchParams),
    responses(
        (status = 200, description = "Matching users", body = UserSearchResponse),
        (status = 400, description = "Missing `name` query parameter"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<UserSearchResponse>, AppError> {
    let Query(SearchParams { name }) = params?;
    let users = service.search_users_by_name(&name).await?;

    Ok(Json(UserSearchResponse {
        total: users.len(),
        users,
        search_term: name,
    }))
}

/// Get a user by email address
#[utoipa::path(
    get,
    path = "/email/{email}",
    tag = USERS_TAG,
    params(
        ("email" = String, Path, description = "User email")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user_by_email<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(email): Path<String>,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user_by_email(&email).await?;
    Ok(Json(user))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = USERS_TAG,
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user_by_id(id).await?;
    Ok(Json(user))
}

/// Replace a user's name, email and phone
#[utoipa::path(
    put,
    path = "/{id}",
    tag = USERS_TAG,
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = UserMessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UserRequest>,
) -> UserResult<Json<UserMessageResponse>> {
    let user = service.update_user(id, input).await?;

    Ok(Json(UserMessageResponse {
        message: "User updated successfully".to_string(),
        user,
    }))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = USERS_TAG,
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = UserDeletedResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> UserResult<Json<UserDeletedResponse>> {
    service.delete_user(id).await?;

    Ok(Json(UserDeletedResponse {
        message: "User deleted successfully".to_string(),
        user_id: id,
    }))
}
