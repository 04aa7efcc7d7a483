use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// User entity as stored.
///
/// `id` is `None` until the store assigns one; every user returned by a
/// repository carries `Some(id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// New unsaved user with both timestamps set to `now`.
    pub fn new(request: UserRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: request.name,
            email: request.email,
            phone: request.phone,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the mutable fields. `id` and `created_at` are left alone.
    pub fn apply_update(&mut self, request: UserRequest, now: DateTime<Utc>) {
        self.name = request.name;
        self.email = request.email;
        self.phone = request.phone;
        self.updated_at = now;
    }
}

/// Request body for creating or replacing a user
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserRequest {
    /// Display name, must not be blank
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "Name is required"))]
    #[schema(example = "John Doe")]
    pub name: String,

    /// Unique email address
    #[serde(default)]
    #[validate(email(message = "Email should be valid"))]
    #[schema(example = "john@example.com")]
    pub email: String,

    /// Free-form phone number
    #[schema(example = "010-1234-5678")]
    pub phone: Option<String>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.unwrap_or_default(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersListResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
}

impl From<Vec<UserResponse>> for UsersListResponse {
    fn from(users: Vec<UserResponse>) -> Self {
        Self {
            total: users.len(),
            users,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
    pub search_term: String,
}

/// Envelope for create and update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserMessageResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDeletedResponse {
    #[schema(example = "User deleted successfully")]
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceHealthResponse {
    #[schema(example = "UP")]
    pub status: String,
    #[schema(example = "User Management API")]
    pub service: String,
}

impl Default for ServiceHealthResponse {
    fn default() -> Self {
        Self {
            status: "UP".to_string(),
            service: "User Management API".to_string(),
        }
    }
}

/// Query parameters for name search
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Substring to look for in user names (case-sensitive)
    pub name: String,
}
