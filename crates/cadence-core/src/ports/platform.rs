//! Ports for the external publishing platforms.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Platform, PlatformIdentity};

/// Failures from the identity lookup.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("no connected {platform} identity")]
    NotConnected { platform: Platform },

    #[error("{0}")]
    Lookup(String),
}

/// Lookup of a user's connected platform identities.
#[async_trait]
pub trait PlatformIdentityStore: Send + Sync {
    /// The identity `user_id` has connected for `platform`, or
    /// [`IdentityError::NotConnected`].
    async fn connected_identity(
        &self,
        user_id: Uuid,
        platform: Platform,
    ) -> Result<PlatformIdentity, IdentityError>;
}

/// Failures from the platform client. The share workflow treats the call as
/// all-or-nothing and does not distinguish further.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("publish request timed out")]
    Timeout,

    #[error("{0}")]
    Failed(String),
}

/// Client for one external platform.
#[async_trait]
pub trait PlatformPublisher: Send + Sync {
    /// Push `content` to the platform on behalf of `user_id`.
    async fn publish(&self, user_id: Uuid, content: &str) -> Result<(), PublishError>;
}
