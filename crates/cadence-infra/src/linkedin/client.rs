//! reqwest-based publisher for LinkedIn UGC shares.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

use cadence_core::domain::Platform;
use cadence_core::ports::{PlatformIdentityStore, PlatformPublisher, PublishError};

/// LinkedIn client configuration.
#[derive(Debug, Clone)]
pub struct LinkedinConfig {
    /// API base URL, overridable for tests.
    pub api_base: String,
    /// Per-request timeout for the share call.
    pub timeout: Duration,
}

impl Default for LinkedinConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.linkedin.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl LinkedinConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_base: std::env::var("LINKEDIN_API_BASE").unwrap_or(defaults.api_base),
            timeout: std::env::var("LINKEDIN_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// Shares post content on LinkedIn on behalf of a connected user.
pub struct LinkedinClient {
    http: Client,
    identities: Arc<dyn PlatformIdentityStore>,
    config: LinkedinConfig,
}

impl LinkedinClient {
    pub fn new(config: LinkedinConfig, identities: Arc<dyn PlatformIdentityStore>) -> Self {
        Self {
            http: Client::new(),
            identities,
            config,
        }
    }
}

#[async_trait]
impl PlatformPublisher for LinkedinClient {
    async fn publish(&self, user_id: Uuid, content: &str) -> Result<(), PublishError> {
        let identity = self
            .identities
            .connected_identity(user_id, Platform::Linkedin)
            .await
            .map_err(|e| PublishError::Failed(e.to_string()))?;

        let body = json!({
            "author": identity.external_urn,
            "lifecycleState": "PUBLISHED",
            "specificContent": {
                "com.linkedin.ugc.ShareContent": {
                    "shareCommentary": { "text": content },
                    "shareMediaCategory": "NONE",
                }
            },
            "visibility": {
                "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC",
            },
        });

        let response = self
            .http
            .post(format!("{}/v2/ugcPosts", self.config.api_base))
            .bearer_auth(&identity.access_token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PublishError::Timeout
                } else {
                    PublishError::Failed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %detail, "LinkedIn rejected the share");
            return Err(PublishError::Failed(format!(
                "LinkedIn returned {status}: {detail}"
            )));
        }

        tracing::info!(%user_id, "Shared post to LinkedIn");
        Ok(())
    }
}
