//! SeaORM entities mirroring the domain model.

pub mod identity;
pub mod post;
pub mod user;
