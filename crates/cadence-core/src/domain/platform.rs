//! Publishing platforms and connected platform identities.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An external platform posts can be published to.
///
/// The share workflow is written once and parameterized by this enum; adding
/// a platform means a new variant plus its storage columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
}

impl Platform {
    pub const ALL: [Platform; 1] = [Platform::Linkedin];

    /// Stable identifier used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
        }
    }

    /// Human-facing name for validation messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Linkedin => "LinkedIn",
        }
    }

    /// Name of the per-platform request flag, for field-scoped errors.
    pub fn request_field(self) -> &'static str {
        match self {
            Platform::Linkedin => "share_on_linkedin",
        }
    }

    pub fn from_name(name: &str) -> Option<Platform> {
        Platform::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's connection to an external platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformIdentity {
    pub user_id: Uuid,
    pub platform: Platform,
    /// Platform-side member identifier, e.g. `urn:li:person:...`.
    pub external_urn: String,
    pub access_token: String,
    pub connected_at: DateTime<Utc>,
}
