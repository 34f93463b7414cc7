//! Domain-level error types.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Machine-readable category of a field-scoped validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    /// Neither an immediate nor a timed share was requested.
    MissingScheduleChoice,
    /// Content is below the minimum length for sharing.
    ContentTooShort,
    /// The post already carries a publish timestamp for the platform.
    AlreadyShared,
    /// The owning user has no connected identity for the platform.
    PlatformIdentityMissing,
    /// The identity lookup failed for another reason.
    PlatformIdentityError,
    /// The external platform call failed.
    ExternalShareFailed,
    /// The external platform call timed out.
    ExternalShareTimeout,
}

/// A single validation failure, attached to the form field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: ValidationKind,
    pub message: String,
}

/// Validation failures for a post, keyed by field so callers can render
/// per-field feedback. One check may report on several fields at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(field: &'static str, kind: ValidationKind, message: impl Into<String>) -> Self {
        Self::default().and(field, kind, message)
    }

    pub fn and(mut self, field: &'static str, kind: ValidationKind, message: impl Into<String>) -> Self {
        self.errors.push(FieldError {
            field,
            kind,
            message: message.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether a failure of `kind` was reported on `field`.
    pub fn has(&self, field: &str, kind: ValidationKind) -> bool {
        self.errors.iter().any(|e| e.field == field && e.kind == kind)
    }

    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: ")?;
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
