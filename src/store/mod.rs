//! Record stores for users and projects.
//!
//! Handlers depend on the [`UserRepo`] and [`ProjectRepo`] traits; the
//! PostgreSQL backend is used when a database URL is configured and the
//! in-memory backend otherwise. Each call is atomic for a single record only.
//! Concurrent updates of the same record are last-write-wins.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::{projects::model::Project, users::model::User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was hit; carries the field name.
    #[error("duplicate {0}")]
    Duplicate(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn insert(&self, user: &User) -> StoreResult<()>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;
    /// All users in registration order.
    async fn list(&self) -> StoreResult<Vec<User>>;
    /// Writes the profile fields of `user`. `None` when the record is gone.
    async fn update(&self, user: &User) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait ProjectRepo: Send + Sync {
    async fn insert(&self, project: &Project) -> StoreResult<()>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Project>>;
    /// All projects, newest first.
    async fn list(&self) -> StoreResult<Vec<Project>>;
    /// Projects owned by `owner_id`, newest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Project>>;
    /// Writes every field except the owner. `None` when the record is gone.
    async fn update(&self, project: &Project) -> StoreResult<Option<Project>>;
    /// `true` when a record was removed.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}
