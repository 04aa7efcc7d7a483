use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserRequest, UserResponse};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// All users, newest first
    pub async fn get_all_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.find_all_order_by_created_at_desc().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_user_by_id(&self, id: i64) -> UserResult<UserResponse> {
        self.repository
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| UserError::not_found_by_id(id))
    }

    pub async fn get_user_by_email(&self, email: &str) -> UserResult<UserResponse> {
        self.repository
            .find_by_email(email)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| UserError::not_found_by_email(email))
    }

    pub async fn search_users_by_name(&self, term: &str) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.find_by_name_containing(term).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Create a user after validation and an email uniqueness check
    pub async fn create_user(&self, request: UserRequest) -> UserResult<UserResponse> {
        request.validate()?;

        if self.repository.exists_by_email(&request.email).await? {
            tracing::info!(email = %request.email, "Rejected user creation, email in use");
            return Err(UserError::email_in_use(&request.email));
        }

        let user = self.repository.save(User::new(request, Utc::now())).await?;
        Ok(user.into())
    }

    /// Replace name, email and phone of an existing user.
    ///
    /// A changed email is not checked against other users here; the store's
    /// unique constraint rejects a collision as [`UserError::Conflict`].
    pub async fn update_user(&self, id: i64, request: UserRequest) -> UserResult<UserResponse> {
        request.validate()?;

        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::not_found_by_id(id))?;

        let updated_at = next_updated_at(user.updated_at, Utc::now());
        user.apply_update(request, updated_at);

        let user = self.repository.save(user).await?;
        Ok(user.into())
    }

    pub async fn delete_user(&self, id: i64) -> UserResult<()> {
        if !self.repository.exists_by_id(id).await? {
            tracing::warn!(user_id = id, "Attempted to delete missing user");
            return Err(UserError::not_found_by_id(id));
        }

        self.repository.delete_by_id(id).await
    }
}

/// `now`, or one microsecond past `previous` when the clock has not advanced.
/// PostgreSQL stores timestamps at microsecond precision.
fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    now.max(previous + Duration::microseconds(1))
}
