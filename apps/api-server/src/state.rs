//! Application state - shared across all handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cadence_core::ShareWorkflow;
use cadence_core::domain::{Platform, PlatformIdentity, Post, User};
use cadence_core::error::RepoError;
use cadence_core::ports::{
    BaseRepository, IdentityError, PlatformIdentityStore, PostField, PostRepository,
    UserRepository,
};
use cadence_infra::database::{self, DatabaseConfig};
use cadence_infra::database::{
    PostgresIdentityStore, PostgresPostRepository, PostgresUserRepository,
};
use cadence_infra::linkedin::{LinkedinClient, LinkedinConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub share: Arc<ShareWorkflow>,
}

type Repos = (
    Arc<dyn UserRepository>,
    Arc<dyn PostRepository>,
    Arc<dyn PlatformIdentityStore>,
);

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>, linkedin: LinkedinConfig) -> Self {
        let (users, posts, identities): Repos = match db_config {
            Some(config) => match database::connect(config).await {
                Ok(conn) => (
                    Arc::new(PostgresUserRepository::new(conn.clone())),
                    Arc::new(PostgresPostRepository::new(conn.clone())),
                    Arc::new(PostgresIdentityStore::new(conn)),
                ),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory()
            }
        };

        let publisher = Arc::new(LinkedinClient::new(linkedin, identities.clone()));
        let share = Arc::new(
            ShareWorkflow::new(identities, posts.clone())
                .with_publisher(Platform::Linkedin, publisher),
        );

        tracing::info!("Application state initialized");

        Self {
            users,
            posts,
            share,
        }
    }

    fn in_memory() -> Repos {
        (
            Arc::new(InMemoryUserRepository),
            Arc::new(InMemoryPostRepository),
            Arc::new(InMemoryIdentityStore),
        )
    }
}

/// In-memory user repository for when database is not configured.
pub struct InMemoryUserRepository;

#[async_trait::async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, RepoError> {
        tracing::warn!("Database not configured - using in-memory fallback");
        Ok(None)
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        Ok(user)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, RepoError> {
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        Ok(Vec::new())
    }
}

/// In-memory post repository for when database is not configured.
pub struct InMemoryPostRepository;

#[async_trait::async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Post>, RepoError> {
        tracing::warn!("Database not configured - using in-memory fallback");
        Ok(None)
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        Ok(post)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_user_id(&self, _user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(Vec::new())
    }

    async fn find_due(
        &self,
        _platform: Platform,
        _now: DateTime<Utc>,
    ) -> Result<Vec<Post>, RepoError> {
        Ok(Vec::new())
    }

    async fn save_fields(&self, _post: &Post, _fields: &[PostField]) -> Result<(), RepoError> {
        Ok(())
    }

    async fn mark_shared_if_unshared(
        &self,
        _post_id: Uuid,
        _platform: Platform,
        _at: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        Ok(true)
    }
}

/// In-memory identity store for when database is not configured. Nobody is
/// connected to anything.
pub struct InMemoryIdentityStore;

#[async_trait::async_trait]
impl PlatformIdentityStore for InMemoryIdentityStore {
    async fn connected_identity(
        &self,
        _user_id: Uuid,
        platform: Platform,
    ) -> Result<PlatformIdentity, IdentityError> {
        Err(IdentityError::NotConnected { platform })
    }
}
