//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod platform;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use platform::{IdentityError, PlatformIdentityStore, PlatformPublisher, PublishError};
pub use repository::{BaseRepository, PostField, PostRepository, UserRepository};
