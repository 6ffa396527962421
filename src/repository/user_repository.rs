//! User repository: the narrow persistence interface the handlers consume.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, SqlErr};
use thiserror::Error;
use uuid::Uuid;

use super::entities::user::{ActiveModel, Entity as UserEntity};
use crate::domain::{User, UserRecord};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Persistence outcomes the handlers pattern-match on.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Result type alias for persistence operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence gateway trait for dependency injection.
///
/// Identifiers cross this boundary as opaque strings; a token that does not
/// name any stored user behaves exactly like an absent identifier.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users in the store's natural order.
    async fn find_all(&self) -> RepoResult<Vec<User>>;

    /// Look up a user by identifier.
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>>;

    /// Insert a new user; fails with [`RepoError::Conflict`] when the email
    /// is already taken.
    async fn create(&self, record: UserRecord) -> RepoResult<User>;

    /// Replace all mutable fields of an existing user.
    async fn update(&self, id: &str, record: UserRecord) -> RepoResult<User>;

    /// Remove a user by identifier.
    async fn delete(&self, id: &str) -> RepoResult<()>;
}

/// Concrete implementation of [`UserRepository`] backed by SeaORM.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance.
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        let models = UserEntity::find().all(&self.db).await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        // A malformed identifier cannot match any stored user.
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let model = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(User::from))
    }

    async fn create(&self, record: UserRecord) -> RepoResult<User> {
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(record.name),
            email: Set(record.email),
            age: Set(record.age),
        };

        match active.insert(&self.db).await {
            Ok(model) => Ok(User::from(model)),
            Err(err) => match err.sql_err() {
                // The unique index on email is the authority on duplicates.
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(RepoError::Conflict("email".to_string()))
                }
                _ => Err(RepoError::Database(err)),
            },
        }
    }

    async fn update(&self, id: &str, record: UserRecord) -> RepoResult<User> {
        let id = Uuid::parse_str(id).map_err(|_| RepoError::NotFound)?;

        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RepoError::NotFound)?;

        // Full-record replace: all three mutable fields are overwritten.
        let mut active: ActiveModel = model.into();
        active.name = Set(record.name);
        active.email = Set(record.email);
        active.age = Set(record.age);

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: &str) -> RepoResult<()> {
        let id = Uuid::parse_str(id).map_err(|_| RepoError::NotFound)?;

        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
