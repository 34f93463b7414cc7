//! # Cadence Core
//!
//! The domain layer of the Cadence post scheduler.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the `Post` record, its validation contract, and the share workflow that
//! publishes posts to external platforms.

pub mod domain;
pub mod error;
pub mod ports;
pub mod share;

pub use error::{DomainError, ValidationError};
pub use share::ShareWorkflow;
