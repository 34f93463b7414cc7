use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Platform, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update), writing every field.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// All users, for the read-only listing endpoint.
    async fn list(&self) -> Result<Vec<User>, RepoError>;
}

/// Columns of a post that can be written individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    Content,
    ShareNow,
    ShareAt,
    ShareStartAt,
    ShareCompleteAt,
    ShareOnLinkedin,
    SharedAtLinkedin,
    UpdatedAt,
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Posts due for publishing on `platform`: scheduled at or before `now`,
    /// requesting the platform, and not yet shared there. This is the query
    /// an external scheduler trigger runs before invoking the share workflow.
    async fn find_due(&self, platform: Platform, now: DateTime<Utc>)
    -> Result<Vec<Post>, RepoError>;

    /// Write only the named columns of `post`, leaving concurrent edits to
    /// unrelated fields untouched.
    async fn save_fields(&self, post: &Post, fields: &[PostField]) -> Result<(), RepoError>;

    /// Set the platform's publish marker iff it is still unset. Returns
    /// `false` when a concurrent attempt already claimed it.
    async fn mark_shared_if_unshared(
        &self,
        post_id: Uuid,
        platform: Platform,
        at: DateTime<Utc>,
    ) -> Result<bool, RepoError>;
}
