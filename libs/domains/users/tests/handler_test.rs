//! Handler tests for the Users domain
//!
//! These drive `handlers::router` directly over an in-memory repository:
//! - request deserialization and validation
//! - response envelopes and status codes
//! - error bodies

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    handlers::router(UserService::new(InMemoryUserRepository::new()))
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create(app: &Router, name: &str, email: &str) -> UserResponse {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "name": name, "email": email, "phone": "010-1234-5678" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: UserMessageResponse = json_body(response.into_body()).await;
    body.user
}

#[tokio::test]
async fn test_create_user_returns_201_with_envelope() {
    let builder = TestDataBuilder::from_test_name("handler_create_201");
    let email = builder.email("john");

    let response = app()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "name": "John Doe", "email": email, "phone": builder.phone() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["user"]["createdAt"], body["user"]["updatedAt"]);
    assert!(body["user"]["id"].as_i64().is_some());
}

#[tokio::test]
async fn test_create_user_rejects_invalid_email() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "name": "John Doe", "email": "invalid-email" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["email"].is_array());
}

#[tokio::test]
async fn test_create_user_rejects_blank_name() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "name": "   ", "email": "john@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert!(body["details"]["name"].is_array());
}

#[tokio::test]
async fn test_create_user_rejects_malformed_json() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_duplicate_email_returns_409() {
    let app = app();
    create(&app, "John Doe", "john@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "name": "Other John", "email": "john@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "CONFLICT");

    let list: UsersListResponse = json_body(app.oneshot(get("/")).await.unwrap().into_body()).await;
    assert_eq!(list.total, 1);
}

#[tokio::test]
async fn test_list_users_newest_first_with_total() {
    let app = app();
    create(&app, "A", "a@example.com").await;
    create(&app, "B", "b@example.com").await;
    create(&app, "C", "c@example.com").await;

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: UsersListResponse = json_body(response.into_body()).await;
    assert_eq!(body.total, 3);
    let names: Vec<_> = body.users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["C", "B", "A"]);
}

#[tokio::test]
async fn test_get_user_by_id() {
    let app = app();
    let created = create(&app, "John Doe", "john@example.com").await;

    let response = app
        .oneshot(get(&format!("/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let user: UserResponse = json_body(response.into_body()).await;
    assert_eq!(user, created);
}

#[tokio::test]
async fn test_get_user_missing_returns_404() {
    let response = app().oneshot(get("/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["message"], "User not found with id: 999");
}

#[tokio::test]
async fn test_get_user_non_numeric_id_returns_400() {
    let response = app().oneshot(get("/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_ID");
}

#[tokio::test]
async fn test_get_user_by_email() {
    let app = app();
    create(&app, "Jane Doe", "jane@example.com").await;

    let response = app.clone().oneshot(get("/email/jane@example.com")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let user: UserResponse = json_body(response.into_body()).await;
    assert_eq!(user.name, "Jane Doe");

    let missing = app.oneshot(get("/email/nobody@example.com")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_users_by_name() {
    let app = app();
    create(&app, "John Doe", "john@example.com").await;
    create(&app, "Jane Doe", "jane@example.com").await;
    create(&app, "Bob Smith", "bob@example.com").await;

    let response = app.oneshot(get("/search?name=Doe")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: UserSearchResponse = json_body(response.into_body()).await;
    assert_eq!(body.total, 2);
    assert_eq!(body.search_term, "Doe");
    assert!(body.users.iter().all(|u| u.name.contains("Doe")));
}

#[tokio::test]
async fn test_search_without_name_returns_400() {
    let response = app().oneshot(get("/search")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_QUERY");
}

#[tokio::test]
async fn test_update_user_returns_envelope_and_keeps_created_at() {
    let app = app();
    let created = create(&app, "John Doe", "john@example.com").await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/{}", created.id),
            json!({ "name": "Updated Name", "email": "john@example.com", "phone": null }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: UserMessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "User updated successfully");
    assert_eq!(body.user.id, created.id);
    assert_eq!(body.user.name, "Updated Name");
    assert_eq!(body.user.phone, None);
    assert_eq!(body.user.created_at, created.created_at);
    assert!(body.user.updated_at > created.updated_at);
}

#[tokio::test]
async fn test_update_missing_user_returns_404() {
    let response = app()
        .oneshot(json_request(
            "PUT",
            "/42",
            json!({ "name": "Nobody", "email": "nobody@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_user_invalid_input_returns_400() {
    let app = app();
    let created = create(&app, "John Doe", "john@example.com").await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/{}", created.id),
            json!({ "name": "", "email": "john@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_user_then_get_returns_404() {
    let app = app();
    let created = create(&app, "John Doe", "john@example.com").await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", created.id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: UserDeletedResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "User deleted successfully");
    assert_eq!(body.user_id, created.id);

    let response = app.oneshot(get(&format!("/{}", created.id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_user_returns_404() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/7")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_service_health() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "status": "UP", "service": "User Management API" }));
}

#[test]
fn test_openapi_documents_user_routes() {
    use utoipa::OpenApi;

    let doc = ApiDoc::openapi();
    let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

    for expected in ["/health", "/search", "/email/{email}", "/{id}"] {
        assert!(paths.iter().any(|p| p == expected), "missing {expected}");
    }
}
