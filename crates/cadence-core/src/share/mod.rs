//! The share workflow: validation gating and execution of external-platform
//! publishes.
//!
//! Publishing is a per-platform state machine, `Unshared -> Sharing ->
//! Shared`, with `Shared` terminal. The workflow enforces the idempotency
//! guarantee retrying callers rely on: the publish marker is checked against
//! entity state before any external call, and once set it is never moved.
//! A crash between external success and the durable marker write can still
//! re-publish on retry; the platform call carries no dedup key, so effects
//! are at-least-once externally, at-most-once internally.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Platform, Post};
use crate::error::{RepoError, ValidationError, ValidationKind};
use crate::ports::{
    IdentityError, PlatformIdentityStore, PlatformPublisher, PostField, PostRepository,
    PublishError,
};

/// Minimum content length for sharing to an external platform.
pub const MIN_SHARE_CONTENT_LEN: usize = 5;

/// Knobs for a single [`ShareWorkflow::perform_share`] invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShareOptions {
    /// Simulate success without calling the external platform.
    pub dry_run: bool,
    /// Persist the changed columns as the attempt progresses.
    pub persist: bool,
}

/// Failures from [`ShareWorkflow::perform_share`].
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Validation and execution of external-platform shares, over the ports the
/// caller wires in.
pub struct ShareWorkflow {
    identities: Arc<dyn PlatformIdentityStore>,
    posts: Arc<dyn PostRepository>,
    publishers: HashMap<Platform, Arc<dyn PlatformPublisher>>,
}

impl ShareWorkflow {
    pub fn new(
        identities: Arc<dyn PlatformIdentityStore>,
        posts: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            identities,
            posts,
            publishers: HashMap::new(),
        }
    }

    pub fn with_publisher(
        mut self,
        platform: Platform,
        publisher: Arc<dyn PlatformPublisher>,
    ) -> Self {
        self.publishers.insert(platform, publisher);
        self
    }

    /// Full validation pass for a post before it may be saved: the
    /// scheduling-presence check, then eligibility for every requested
    /// platform. Runs at save time rather than publish time, so a UI can
    /// reject unshareable posts before scheduling them.
    pub async fn validate(&self, post: &Post) -> Result<(), ValidationError> {
        post.validate_schedule()?;

        for platform in post.requested_platforms() {
            self.check_eligibility(post, platform).await?;
        }
        Ok(())
    }

    /// Whether `post` may be shared to `platform`. Failures are scoped to
    /// the form field they concern.
    pub async fn check_eligibility(
        &self,
        post: &Post,
        platform: Platform,
    ) -> Result<(), ValidationError> {
        if post.content.chars().count() < MIN_SHARE_CONTENT_LEN {
            return Err(ValidationError::new(
                "content",
                ValidationKind::ContentTooShort,
                format!("Content must be at least {MIN_SHARE_CONTENT_LEN} characters long."),
            ));
        }

        if let Some(at) = post.shared_at(platform) {
            return Err(ValidationError::new(
                platform.request_field(),
                ValidationKind::AlreadyShared,
                format!(
                    "Content was already shared on {} at {}.",
                    platform.display_name(),
                    at
                ),
            )
            .and(
                "content",
                ValidationKind::AlreadyShared,
                format!("Content is already shared on {}.", platform.display_name()),
            ));
        }

        match self
            .identities
            .connected_identity(post.user_id, platform)
            .await
        {
            Ok(_) => Ok(()),
            Err(IdentityError::NotConnected { .. }) => Err(ValidationError::new(
                "user",
                ValidationKind::PlatformIdentityMissing,
                format!(
                    "You must connect {} before sharing.",
                    platform.display_name()
                ),
            )),
            Err(IdentityError::Lookup(message)) => Err(ValidationError::new(
                "user",
                ValidationKind::PlatformIdentityError,
                message,
            )),
        }
    }

    /// Publish `post` to `platform`.
    ///
    /// Safe to invoke unconditionally from retrying callers: a post already
    /// shared to the platform is returned unchanged, with no external call
    /// and no error. Durable writes touch only the columns this attempt
    /// changed; the marker write is a compare-and-set, so a raced attempt is
    /// detected instead of overwriting.
    pub async fn perform_share(
        &self,
        mut post: Post,
        platform: Platform,
        now: DateTime<Utc>,
        options: ShareOptions,
    ) -> Result<Post, ShareError> {
        if let Some(at) = post.shared_at(platform) {
            tracing::debug!(post_id = %post.id, %platform, shared_at = %at, "already shared, skipping");
            return Ok(post);
        }

        post.share_start_at = Some(now);
        if options.persist {
            self.posts
                .save_fields(&post, &[PostField::ShareStartAt])
                .await?;
        }

        if !options.dry_run {
            self.call_publisher(&post, platform).await?;
        }

        post.mark_shared(platform, now);
        post.share_complete_at = Some(now);

        if options.persist {
            let claimed = self
                .posts
                .mark_shared_if_unshared(post.id, platform, now)
                .await?;
            if !claimed {
                tracing::warn!(post_id = %post.id, %platform, "marker already persisted by a concurrent attempt");
            }
            self.posts
                .save_fields(&post, &[PostField::ShareCompleteAt])
                .await?;
        }

        tracing::info!(post_id = %post.id, %platform, dry_run = options.dry_run, "post shared");
        Ok(post)
    }

    async fn call_publisher(&self, post: &Post, platform: Platform) -> Result<(), ValidationError> {
        let Some(publisher) = self.publishers.get(&platform) else {
            return Err(ValidationError::new(
                "content",
                ValidationKind::ExternalShareFailed,
                format!("Sharing to {} is not configured.", platform.display_name()),
            ));
        };

        publisher
            .publish(post.user_id, &post.content)
            .await
            .map_err(|e| match e {
                PublishError::Timeout => ValidationError::new(
                    "content",
                    ValidationKind::ExternalShareTimeout,
                    format!("Sharing to {} timed out.", platform.display_name()),
                ),
                PublishError::Failed(reason) => {
                    tracing::warn!(post_id = %post.id, %platform, %reason, "external share failed");
                    ValidationError::new(
                        "content",
                        ValidationKind::ExternalShareFailed,
                        format!("Could not share to {}.", platform.display_name()),
                    )
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;
    use uuid::Uuid;

    use crate::domain::{PlatformIdentity, ShareState};
    use crate::ports::BaseRepository;

    use super::*;

    enum IdentityMode {
        Connected,
        NotConnected,
        Broken(&'static str),
    }

    struct StubIdentities(IdentityMode);

    #[async_trait]
    impl PlatformIdentityStore for StubIdentities {
        async fn connected_identity(
            &self,
            user_id: Uuid,
            platform: Platform,
        ) -> Result<PlatformIdentity, IdentityError> {
            match &self.0 {
                IdentityMode::Connected => Ok(PlatformIdentity {
                    user_id,
                    platform,
                    external_urn: "urn:li:person:stub".to_string(),
                    access_token: "token".to_string(),
                    connected_at: at(0),
                }),
                IdentityMode::NotConnected => Err(IdentityError::NotConnected { platform }),
                IdentityMode::Broken(msg) => Err(IdentityError::Lookup(msg.to_string())),
            }
        }
    }

    enum PublishMode {
        Ok,
        Fail,
        Timeout,
    }

    struct StubPublisher {
        mode: PublishMode,
        calls: AtomicUsize,
    }

    impl StubPublisher {
        fn new(mode: PublishMode) -> Arc<Self> {
            Arc::new(Self {
                mode,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PlatformPublisher for StubPublisher {
        async fn publish(&self, _user_id: Uuid, _content: &str) -> Result<(), PublishError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.mode {
                PublishMode::Ok => Ok(()),
                PublishMode::Fail => Err(PublishError::Failed("upstream rejected".to_string())),
                PublishMode::Timeout => Err(PublishError::Timeout),
            }
        }
    }

    #[derive(Default)]
    struct RecordingPosts {
        field_writes: Mutex<Vec<Vec<PostField>>>,
        marker_writes: AtomicUsize,
    }

    #[async_trait]
    impl BaseRepository<Post, Uuid> for RecordingPosts {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Post>, RepoError> {
            Ok(None)
        }

        async fn save(&self, post: Post) -> Result<Post, RepoError> {
            Ok(post)
        }

        async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
            Ok(())
        }
    }

    #[async_trait]
    impl PostRepository for RecordingPosts {
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

        async fn save_fields(&self, _post: &Post, fields: &[PostField]) -> Result<(), RepoError> {
            self.field_writes.lock().unwrap().push(fields.to_vec());
            Ok(())
        }

        async fn mark_shared_if_unshared(
            &self,
            _post_id: Uuid,
            _platform: Platform,
            _at: DateTime<Utc>,
        ) -> Result<bool, RepoError> {
            self.marker_writes.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    fn workflow(
        identities: IdentityMode,
        publisher: &Arc<StubPublisher>,
    ) -> (ShareWorkflow, Arc<RecordingPosts>) {
        let posts = Arc::new(RecordingPosts::default());
        let workflow = ShareWorkflow::new(Arc::new(StubIdentities(identities)), posts.clone())
            .with_publisher(Platform::Linkedin, publisher.clone());
        (workflow, posts)
    }

    fn shareable_post() -> Post {
        let mut post = Post::new(Uuid::new_v4(), "Hello world".to_string());
        post.share_now = Some(true);
        post.share_on_linkedin = true;
        post
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    fn validation(err: ShareError) -> ValidationError {
        match err {
            ShareError::Validation(v) => v,
            ShareError::Repo(e) => panic!("expected validation error, got {e}"),
        }
    }

    #[tokio::test]
    async fn short_content_is_rejected() {
        let publisher = StubPublisher::new(PublishMode::Ok);
        let (workflow, _) = workflow(IdentityMode::Connected, &publisher);
        let mut post = shareable_post();
        post.content = "Hi".to_string();

        let err = workflow
            .check_eligibility(&post, Platform::Linkedin)
            .await
            .unwrap_err();

        assert!(err.has("content", ValidationKind::ContentTooShort));
    }

    #[tokio::test]
    async fn already_shared_reports_existing_timestamp() {
        let publisher = StubPublisher::new(PublishMode::Ok);
        let (workflow, _) = workflow(IdentityMode::Connected, &publisher);
        let mut post = shareable_post();
        post.shared_at_linkedin = Some(at(9));

        let err = workflow
            .check_eligibility(&post, Platform::Linkedin)
            .await
            .unwrap_err();

        assert!(err.has("share_on_linkedin", ValidationKind::AlreadyShared));
        assert!(err.has("content", ValidationKind::AlreadyShared));
        assert!(
            err.messages_for("share_on_linkedin")[0].contains("2026-03-01 09:00:00 UTC"),
            "message should embed the existing timestamp: {err}"
        );
    }

    #[tokio::test]
    async fn missing_identity_is_scoped_to_the_user_field() {
        let publisher = StubPublisher::new(PublishMode::Ok);
        let (workflow, _) = workflow(IdentityMode::NotConnected, &publisher);
        let post = shareable_post();

        let err = workflow
            .check_eligibility(&post, Platform::Linkedin)
            .await
            .unwrap_err();

        assert!(err.has("user", ValidationKind::PlatformIdentityMissing));
        assert_eq!(
            err.messages_for("user"),
            vec!["You must connect LinkedIn before sharing."]
        );
    }

    #[tokio::test]
    async fn identity_lookup_errors_pass_through_verbatim() {
        let publisher = StubPublisher::new(PublishMode::Ok);
        let (workflow, _) = workflow(IdentityMode::Broken("token store is down"), &publisher);
        let post = shareable_post();

        let err = workflow
            .check_eligibility(&post, Platform::Linkedin)
            .await
            .unwrap_err();

        assert!(err.has("user", ValidationKind::PlatformIdentityError));
        assert_eq!(err.messages_for("user"), vec!["token store is down"]);
    }

    #[tokio::test]
    async fn validate_reports_schedule_before_eligibility() {
        let publisher = StubPublisher::new(PublishMode::Ok);
        let (workflow, _) = workflow(IdentityMode::Connected, &publisher);
        let mut post = shareable_post();
        post.share_now = None;
        post.content = "Hi".to_string();

        let err = workflow.validate(&post).await.unwrap_err();

        assert!(err.has("share_at", ValidationKind::MissingScheduleChoice));
        assert!(err.has("share_now", ValidationKind::MissingScheduleChoice));
        assert!(!err.has("content", ValidationKind::ContentTooShort));
    }

    #[tokio::test]
    async fn validate_rejects_short_content_for_requested_platforms() {
        let publisher = StubPublisher::new(PublishMode::Ok);
        let (workflow, _) = workflow(IdentityMode::Connected, &publisher);
        let mut post = shareable_post();
        post.content = "Hi".to_string();

        let err = workflow.validate(&post).await.unwrap_err();

        assert!(err.has("content", ValidationKind::ContentTooShort));
    }

    #[tokio::test]
    async fn validate_skips_eligibility_when_no_platform_is_requested() {
        let publisher = StubPublisher::new(PublishMode::Ok);
        let (workflow, _) = workflow(IdentityMode::NotConnected, &publisher);
        let mut post = shareable_post();
        post.share_on_linkedin = false;
        post.content = "Hi".to_string();

        assert!(workflow.validate(&post).await.is_ok());
    }

    #[tokio::test]
    async fn perform_share_is_idempotent() {
        let publisher = StubPublisher::new(PublishMode::Ok);
        let (workflow, _) = workflow(IdentityMode::Connected, &publisher);
        let post = shareable_post();

        let shared = workflow
            .perform_share(post, Platform::Linkedin, at(12), ShareOptions::default())
            .await
            .unwrap();
        let again = workflow
            .perform_share(
                shared.clone(),
                Platform::Linkedin,
                at(13),
                ShareOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(shared.shared_at(Platform::Linkedin), Some(at(12)));
        assert_eq!(
            again.shared_at(Platform::Linkedin),
            shared.shared_at(Platform::Linkedin)
        );
        assert_eq!(publisher.calls(), 1);
    }

    #[tokio::test]
    async fn dry_run_simulates_success_without_external_call() {
        let publisher = StubPublisher::new(PublishMode::Ok);
        let (workflow, _) = workflow(IdentityMode::Connected, &publisher);
        let post = shareable_post();

        let shared = workflow
            .perform_share(
                post,
                Platform::Linkedin,
                at(12),
                ShareOptions {
                    dry_run: true,
                    persist: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(shared.shared_at(Platform::Linkedin), Some(at(12)));
        assert_eq!(publisher.calls(), 0);
    }

    #[tokio::test]
    async fn external_failure_leaves_the_marker_unset() {
        let publisher = StubPublisher::new(PublishMode::Fail);
        let (workflow, posts) = workflow(IdentityMode::Connected, &publisher);
        let post = shareable_post();

        let err = workflow
            .perform_share(
                post,
                Platform::Linkedin,
                at(12),
                ShareOptions {
                    dry_run: false,
                    persist: true,
                },
            )
            .await
            .unwrap_err();

        let err = validation(err);
        assert!(err.has("content", ValidationKind::ExternalShareFailed));
        assert_eq!(err.messages_for("content"), vec!["Could not share to LinkedIn."]);
        // Only the attempt-start bracket was written; the marker never was.
        assert_eq!(posts.marker_writes.load(Ordering::SeqCst), 0);
        assert_eq!(
            *posts.field_writes.lock().unwrap(),
            vec![vec![PostField::ShareStartAt]]
        );
    }

    #[tokio::test]
    async fn publisher_timeout_surfaces_as_timeout() {
        let publisher = StubPublisher::new(PublishMode::Timeout);
        let (workflow, _) = workflow(IdentityMode::Connected, &publisher);
        let post = shareable_post();

        let err = validation(
            workflow
                .perform_share(post, Platform::Linkedin, at(12), ShareOptions::default())
                .await
                .unwrap_err(),
        );

        assert!(err.has("content", ValidationKind::ExternalShareTimeout));
    }

    #[tokio::test]
    async fn persist_writes_only_the_changed_columns() {
        let publisher = StubPublisher::new(PublishMode::Ok);
        let (workflow, posts) = workflow(IdentityMode::Connected, &publisher);
        let post = shareable_post();

        workflow
            .perform_share(
                post,
                Platform::Linkedin,
                at(12),
                ShareOptions {
                    dry_run: false,
                    persist: true,
                },
            )
            .await
            .unwrap();

        assert_eq!(posts.marker_writes.load(Ordering::SeqCst), 1);
        assert_eq!(
            *posts.field_writes.lock().unwrap(),
            vec![
                vec![PostField::ShareStartAt],
                vec![PostField::ShareCompleteAt]
            ]
        );
    }

    #[tokio::test]
    async fn immediate_share_round_trip() {
        let publisher = StubPublisher::new(PublishMode::Ok);
        let (workflow, _) = workflow(IdentityMode::Connected, &publisher);
        let mut post = shareable_post();

        workflow.validate(&post).await.unwrap();
        post.resolve_scheduling(at(12));
        assert_eq!(post.share_at, Some(at(12)));

        let options = ShareOptions {
            dry_run: true,
            persist: false,
        };
        let shared = workflow
            .perform_share(post, Platform::Linkedin, at(12), options)
            .await
            .unwrap();
        assert!(shared.shared_at(Platform::Linkedin).is_some());
        assert_eq!(shared.share_state(Platform::Linkedin), ShareState::Shared);

        let again = workflow
            .perform_share(shared.clone(), Platform::Linkedin, at(13), options)
            .await
            .unwrap();
        assert_eq!(again.shared_at_linkedin, shared.shared_at_linkedin);
        assert_eq!(publisher.calls(), 0);
    }

    #[tokio::test]
    async fn unconfigured_platform_fails_the_share() {
        let posts = Arc::new(RecordingPosts::default());
        let workflow = ShareWorkflow::new(
            Arc::new(StubIdentities(IdentityMode::Connected)),
            posts,
        );
        let post = shareable_post();

        let err = validation(
            workflow
                .perform_share(post, Platform::Linkedin, at(12), ShareOptions::default())
                .await
                .unwrap_err(),
        );

        assert!(err.has("content", ValidationKind::ExternalShareFailed));
    }
}
