//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use cadence_core::domain::{Platform, PlatformIdentity, Post, User};
use cadence_core::error::RepoError;
use cadence_core::ports::{
    IdentityError, PlatformIdentityStore, PostField, PostRepository, UserRepository,
};

use super::entity::identity::{self, Entity as IdentityEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// The per-platform columns of the posts table: the request flag and the
/// publish marker.
fn platform_columns(platform: Platform) -> (post::Column, post::Column) {
    match platform {
        Platform::Linkedin => (
            post::Column::ShareOnLinkedin,
            post::Column::SharedAtLinkedin,
        ),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = if let Some(at_pos) = email.find('@') {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = if local.len() > 1 {
                format!("{}***", &local[..1])
            } else {
                "***".to_string()
            };
            format!("{}{}", masked_local, domain)
        } else {
            "***".to_string()
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_due(
        &self,
        platform: Platform,
        now: DateTime<Utc>,
    ) -> Result<Vec<Post>, RepoError> {
        let (requested, marker) = platform_columns(platform);

        let result = PostEntity::find()
            .filter(requested.eq(true))
            .filter(marker.is_null())
            .filter(post::Column::ShareAt.lte(now))
            .order_by_asc(post::Column::ShareAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn save_fields(&self, record: &Post, fields: &[PostField]) -> Result<(), RepoError> {
        let mut active = post::ActiveModel {
            id: Unchanged(record.id),
            ..Default::default()
        };

        for field in fields {
            match field {
                PostField::Content => active.content = Set(record.content.clone()),
                PostField::ShareNow => active.share_now = Set(record.share_now),
                PostField::ShareAt => active.share_at = Set(record.share_at.map(Into::into)),
                PostField::ShareStartAt => {
                    active.share_start_at = Set(record.share_start_at.map(Into::into))
                }
                PostField::ShareCompleteAt => {
                    active.share_complete_at = Set(record.share_complete_at.map(Into::into))
                }
                PostField::ShareOnLinkedin => {
                    active.share_on_linkedin = Set(record.share_on_linkedin)
                }
                PostField::SharedAtLinkedin => {
                    active.shared_at_linkedin = Set(record.shared_at_linkedin.map(Into::into))
                }
                PostField::UpdatedAt => active.updated_at = Set(record.updated_at.into()),
            }
        }

        active
            .update(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(())
    }

    async fn mark_shared_if_unshared(
        &self,
        post_id: Uuid,
        platform: Platform,
        at: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        let (_, marker) = platform_columns(platform);

        // Guarded write: the marker is only set while still null, so racing
        // attempts cannot overwrite an earlier publish timestamp.
        let result = PostEntity::update_many()
            .col_expr(marker, Expr::value(at))
            .col_expr(post::Column::UpdatedAt, Expr::value(at))
            .filter(post::Column::Id.eq(post_id))
            .filter(marker.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.rows_affected == 1)
    }
}

/// Identity lookup backed by the `platform_identities` table.
pub struct PostgresIdentityStore {
    db: DbConn,
}

impl PostgresIdentityStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlatformIdentityStore for PostgresIdentityStore {
    async fn connected_identity(
        &self,
        user_id: Uuid,
        platform: Platform,
    ) -> Result<PlatformIdentity, IdentityError> {
        let row = IdentityEntity::find()
            .filter(identity::Column::UserId.eq(user_id))
            .filter(identity::Column::Platform.eq(platform.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| IdentityError::Lookup(e.to_string()))?;

        match row {
            Some(found) => Ok(PlatformIdentity {
                user_id: found.user_id,
                platform,
                external_urn: found.external_urn,
                access_token: found.access_token,
                connected_at: found.connected_at.into(),
            }),
            None => Err(IdentityError::NotConnected { platform }),
        }
    }
}
