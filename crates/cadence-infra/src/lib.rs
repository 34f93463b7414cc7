//! # Cadence Infrastructure
//!
//! Concrete implementations of the ports defined in `cadence-core`.
//! This crate contains the database repositories, the auth services, and the
//! LinkedIn platform client.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `linkedin` - reqwest-based LinkedIn publisher

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "linkedin")]
pub mod linkedin;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
pub use database::{
    PostgresIdentityStore, PostgresPostRepository, PostgresUserRepository,
};

#[cfg(feature = "linkedin")]
pub use linkedin::{LinkedinClient, LinkedinConfig};
