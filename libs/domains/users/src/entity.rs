use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::User;

/// Sea-ORM Entity for the users table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
            email: model.email,
            phone: model.phone,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// Unsaved users leave `id` unset so PostgreSQL assigns it.
impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map_or(NotSet, Set),
            name: Set(user.name),
            email: Set(user.email),
            phone: Set(user.phone),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: Option<i64>) -> User {
        let now = Utc::now();
        User {
            id,
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_unsaved_user_leaves_id_unset() {
        let active: ActiveModel = user(None).into();
        assert!(active.id.is_not_set());
        assert_eq!(active.email, Set("jane@example.com".to_string()));
    }

    #[test]
    fn test_saved_user_sets_id() {
        let active: ActiveModel = user(Some(12)).into();
        assert_eq!(active.id, Set(12));
    }

    #[test]
    fn test_model_round_trips_timestamps() {
        let original = user(Some(5));
        let model = Model {
            id: 5,
            name: original.name.clone(),
            email: original.email.clone(),
            phone: original.phone.clone(),
            created_at: original.created_at.into(),
            updated_at: original.updated_at.into(),
        };

        assert_eq!(User::from(model), original);
    }
}
