use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr, sea_query::LikeExpr,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::User,
    repository::UserRepository,
};

pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_error(e: DbErr) -> UserError {
    UserError::Internal(format!("Database error: {}", e))
}

/// `LIKE` pattern matching `term` as a literal substring.
fn contains_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

/// Maps a failed write, turning a unique-key violation on `email` into a conflict.
fn write_error(e: DbErr, email: &str) -> UserError {
    let unique_violation = matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || e.to_string().contains("duplicate key");

    if unique_violation {
        tracing::info!(email = %email, "Rejected write with duplicate email");
        return UserError::email_in_use(email);
    }
    db_error(e)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(db_error)?;

        Ok(count > 0)
    }

    async fn exists_by_id(&self, id: i64) -> UserResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Id.eq(id))
            .count(&self.db)
            .await
            .map_err(db_error)?;

        Ok(count > 0)
    }

    async fn find_by_name_containing(&self, term: &str) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .filter(entity::Column::Name.like(contains_pattern(term)))
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_all_order_by_created_at_desc(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn save(&self, user: User) -> UserResult<User> {
        let email = user.email.clone();
        let existing_id = user.id;
        let active_model: entity::ActiveModel = user.into();

        let model = match existing_id {
            None => active_model.insert(&self.db).await,
            Some(_) => active_model.update(&self.db).await,
        }
        .map_err(|e| match (e, existing_id) {
            (DbErr::RecordNotUpdated, Some(id)) => UserError::not_found_by_id(id),
            (e, _) => write_error(e, &email),
        })?;

        tracing::info!(user_id = model.id, email = %model.email, "Saved user");
        Ok(model.into())
    }

    async fn delete_by_id(&self, id: i64) -> UserResult<()> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = id, "Deleted user");
        }
        Ok(())
    }
}
