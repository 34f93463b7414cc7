//! The post record: authored content plus its scheduling decision and
//! per-platform publish state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ValidationError, ValidationKind};

use super::Platform;

/// Per-platform publish lifecycle. `Shared` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareState {
    Unshared,
    Sharing,
    Shared,
}

/// Post entity - user-authored content with a scheduling decision and the
/// lifecycle of publishing it to external platforms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,

    /// Tri-state immediacy flag: `Some(true)` publishes at save time,
    /// `Some(false)`/`None` defer to `share_at`. Both unset fails validation.
    pub share_now: Option<bool>,
    pub share_at: Option<DateTime<Utc>>,

    /// Brackets of the most recent publish attempt.
    pub share_start_at: Option<DateTime<Utc>>,
    pub share_complete_at: Option<DateTime<Utc>>,

    pub share_on_linkedin: bool,
    /// Set exactly once when the LinkedIn share succeeds. Never cleared.
    pub shared_at_linkedin: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new unscheduled post.
    pub fn new(user_id: Uuid, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            content,
            share_now: None,
            share_at: None,
            share_start_at: None,
            share_complete_at: None,
            share_on_linkedin: false,
            shared_at_linkedin: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Platforms this post requests publishing to.
    pub fn requested_platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.requests(*p))
            .collect()
    }

    pub fn requests(&self, platform: Platform) -> bool {
        match platform {
            Platform::Linkedin => self.share_on_linkedin,
        }
    }

    /// When the post was published to `platform`, if it has been. This is
    /// the idempotency marker the share workflow gates on.
    pub fn shared_at(&self, platform: Platform) -> Option<DateTime<Utc>> {
        match platform {
            Platform::Linkedin => self.shared_at_linkedin,
        }
    }

    /// Record a successful publish. The marker is append-only: a second call
    /// for the same platform leaves the original timestamp in place.
    pub fn mark_shared(&mut self, platform: Platform, at: DateTime<Utc>) {
        match platform {
            Platform::Linkedin => {
                if self.shared_at_linkedin.is_none() {
                    self.shared_at_linkedin = Some(at);
                    self.updated_at = at;
                }
            }
        }
    }

    pub fn share_state(&self, platform: Platform) -> ShareState {
        if self.shared_at(platform).is_some() {
            ShareState::Shared
        } else if self.share_start_at.is_some() {
            ShareState::Sharing
        } else {
            ShareState::Unshared
        }
    }

    /// Whether the post has been published anywhere. Content is frozen once
    /// it has.
    pub fn is_published(&self) -> bool {
        Platform::ALL.iter().any(|p| self.shared_at(*p).is_some())
    }

    /// The scheduling-presence check: an immediate share or a timestamp must
    /// be chosen before the post can be saved. Reported on both fields so a
    /// form can highlight either control.
    pub fn validate_schedule(&self) -> Result<(), ValidationError> {
        const MSG: &str = "You must select a time to share or share it now";

        if self.share_now != Some(true) && self.share_at.is_none() {
            return Err(ValidationError::new(
                "share_at",
                ValidationKind::MissingScheduleChoice,
                MSG,
            )
            .and("share_now", ValidationKind::MissingScheduleChoice, MSG));
        }
        Ok(())
    }

    /// Normalize the scheduling decision immediately before persistence: an
    /// immediate share pins `share_at` to `now`, overwriting any earlier
    /// value, so downstream consumers can treat `share_at` as the single
    /// source of truth for when to fire.
    pub fn resolve_scheduling(&mut self, now: DateTime<Utc>) {
        if self.share_now == Some(true) {
            self.share_at = Some(now);
            self.updated_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn post() -> Post {
        Post::new(Uuid::new_v4(), "Hello world".to_string())
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn schedule_requires_a_choice() {
        let p = post();
        let err = p.validate_schedule().unwrap_err();
        assert!(err.has("share_at", ValidationKind::MissingScheduleChoice));
        assert!(err.has("share_now", ValidationKind::MissingScheduleChoice));
    }

    #[test]
    fn share_now_false_without_timestamp_is_missing_choice() {
        let mut p = post();
        p.share_now = Some(false);
        assert!(p.validate_schedule().is_err());
    }

    #[test]
    fn share_now_or_timestamp_passes() {
        let mut p = post();
        p.share_now = Some(true);
        assert!(p.validate_schedule().is_ok());

        let mut p = post();
        p.share_at = Some(at(9));
        assert!(p.validate_schedule().is_ok());
    }

    #[test]
    fn resolve_scheduling_overwrites_share_at_for_immediate_shares() {
        let mut p = post();
        p.share_now = Some(true);
        p.share_at = Some(at(9));

        p.resolve_scheduling(at(12));

        assert_eq!(p.share_at, Some(at(12)));
    }

    #[test]
    fn resolve_scheduling_leaves_timed_shares_alone() {
        let mut p = post();
        p.share_at = Some(at(9));

        p.resolve_scheduling(at(12));

        assert_eq!(p.share_at, Some(at(9)));
    }

    #[test]
    fn mark_shared_is_monotonic() {
        let mut p = post();
        p.mark_shared(Platform::Linkedin, at(9));
        p.mark_shared(Platform::Linkedin, at(12));

        assert_eq!(p.shared_at(Platform::Linkedin), Some(at(9)));
    }

    #[test]
    fn share_state_follows_markers() {
        let mut p = post();
        assert_eq!(p.share_state(Platform::Linkedin), ShareState::Unshared);

        p.share_start_at = Some(at(9));
        assert_eq!(p.share_state(Platform::Linkedin), ShareState::Sharing);

        p.mark_shared(Platform::Linkedin, at(10));
        assert_eq!(p.share_state(Platform::Linkedin), ShareState::Shared);
    }

    #[test]
    fn requested_platforms_follow_flags() {
        let mut p = post();
        assert!(p.requested_platforms().is_empty());

        p.share_on_linkedin = true;
        assert_eq!(p.requested_platforms(), vec![Platform::Linkedin]);
    }
}
