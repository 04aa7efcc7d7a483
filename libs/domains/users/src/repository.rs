use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence
///
/// Listing operations return users newest first. Implementations enforce
/// email uniqueness and report a violation as [`UserError::Conflict`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn exists_by_email(&self, email: &str) -> UserResult<bool>;

    async fn exists_by_id(&self, id: i64) -> UserResult<bool>;

    /// Case-sensitive substring match on the name
    async fn find_by_name_containing(&self, term: &str) -> UserResult<Vec<User>>;

    /// All users, `created_at` descending, ties broken by `id` descending
    async fn find_all_order_by_created_at_desc(&self) -> UserResult<Vec<User>>;

    /// Insert when `user.id` is `None`, otherwise overwrite the stored record
    async fn save(&self, user: User) -> UserResult<User>;

    /// Removing an absent id is a no-op
    async fn delete_by_id(&self, id: i64) -> UserResult<()>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
    next_id: Arc<AtomicI64>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

fn newest_first(mut users: Vec<User>) -> Vec<User> {
    users.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    users
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }

    async fn exists_by_id(&self, id: i64) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.contains_key(&id))
    }

    async fn find_by_name_containing(&self, term: &str) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        let matches = users
            .values()
            .filter(|u| u.name.contains(term))
            .cloned()
            .collect();
        Ok(newest_first(matches))
    }

    async fn find_all_order_by_created_at_desc(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(newest_first(users.values().cloned().collect()))
    }

    async fn save(&self, mut user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        let email_taken = users
            .values()
            .any(|u| u.email == user.email && u.id != user.id);
        if email_taken {
            return Err(UserError::email_in_use(&user.email));
        }

        let id = match user.id {
            Some(id) => {
                if !users.contains_key(&id) {
                    return Err(UserError::not_found_by_id(id));
                }
                id
            }
            None => self.next_id.fetch_add(1, Ordering::SeqCst),
        };
        user.id = Some(id);
        users.insert(id, user.clone());

        tracing::info!(user_id = id, email = %user.email, "Saved user");
        Ok(user)
    }

    async fn delete_by_id(&self, id: i64) -> UserResult<()> {
        let mut users = self.users.write().await;
        if users.remove(&id).is_some() {
            tracing::info!(user_id = id, "Deleted user");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn user(name: &str, email: &str, created_secs: i64) -> User {
        let at = Utc.timestamp_opt(1_700_000_000 + created_secs, 0).unwrap();
        User {
            id: None,
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_save_assigns_increasing_ids() {
        let repo = InMemoryUserRepository::new();

        let a = repo.save(user("A", "a@example.com", 1)).await.unwrap();
        let b = repo.save(user("B", "b@example.com", 2)).await.unwrap();

        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert!(repo.exists_by_id(1).await.unwrap());
        assert!(repo.exists_by_email("b@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("A", "same@example.com", 1)).await.unwrap();

        let err = repo
            .save(user("B", "same@example.com", 2))
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Conflict(_)));
        assert_eq!(repo.find_all_order_by_created_at_desc().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_record() {
        let repo = InMemoryUserRepository::new();
        let mut saved = repo.save(user("A", "a@example.com", 1)).await.unwrap();

        saved.name = "Renamed".to_string();
        saved.updated_at = saved.updated_at + Duration::seconds(10);
        repo.save(saved.clone()).await.unwrap();

        let found = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found, saved);
    }

    #[tokio::test]
    async fn test_save_keeps_own_email_on_overwrite() {
        let repo = InMemoryUserRepository::new();
        let mut saved = repo.save(user("A", "a@example.com", 1)).await.unwrap();

        saved.phone = Some("555".to_string());
        assert!(repo.save(saved).await.is_ok());
    }

    #[tokio::test]
    async fn test_find_all_orders_newest_first() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("A", "a@example.com", 1)).await.unwrap();
        repo.save(user("B", "b@example.com", 2)).await.unwrap();
        repo.save(user("C", "c@example.com", 3)).await.unwrap();

        let names: Vec<_> = repo
            .find_all_order_by_created_at_desc()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();

        assert_eq!(names, ["C", "B", "A"]);
    }

    #[tokio::test]
    async fn test_find_all_breaks_ties_by_id() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("First", "1@example.com", 1)).await.unwrap();
        repo.save(user("Second", "2@example.com", 1)).await.unwrap();

        let users = repo.find_all_order_by_created_at_desc().await.unwrap();
        assert_eq!(users[0].name, "Second");
        assert_eq!(users[1].name, "First");
    }

    #[tokio::test]
    async fn test_find_by_name_containing_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("John Doe", "john@example.com", 1)).await.unwrap();
        repo.save(user("Jane Doe", "jane@example.com", 2)).await.unwrap();
        repo.save(user("Bob Smith", "bob@example.com", 3)).await.unwrap();

        let does = repo.find_by_name_containing("Doe").await.unwrap();
        assert_eq!(does.len(), 2);
        assert_eq!(does[0].name, "Jane Doe");

        assert!(repo.find_by_name_containing("doe").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_name_containing_matches_wildcards_literally() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("Promo 50%_off", "promo@example.com", 1)).await.unwrap();
        repo.save(user("John Doe", "john@example.com", 2)).await.unwrap();

        let found = repo.find_by_name_containing("50%_off").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(repo.find_by_name_containing("_").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_email_is_exact() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("A", "a@example.com", 1)).await.unwrap();

        assert!(repo.find_by_email("a@example.com").await.unwrap().is_some());
        assert!(repo.find_by_email("a@example").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_by_id_is_idempotent() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("A", "a@example.com", 1)).await.unwrap();

        repo.delete_by_id(1).await.unwrap();
        repo.delete_by_id(1).await.unwrap();

        assert!(!repo.exists_by_id(1).await.unwrap());
    }
}
