//! Invitation status checks for user accounts.
//!
//! Each probe is bounded by its own timeout. A probe that times out or fails
//! reports [`InvitationStatus::Unknown`] instead of an error.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::controller::ResourceContext;
use crate::domain::decode::decode_object;
use crate::domain::resources::User;
use crate::domain::{Resource, ResourceId};

/// Outcome of an invitation probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationStatus {
    /// The user accepted the invitation.
    Accepted,
    /// The invitation is outstanding.
    Pending,
    /// The invitation lapsed.
    Expired,
    /// The probe failed or timed out.
    Unknown,
}

impl InvitationStatus {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "accepted" => Self::Accepted,
            "pending" | "sent" => Self::Pending,
            "expired" => Self::Expired,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Accepted => "accepted",
            Self::Pending => "pending",
            Self::Expired => "expired",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Deserialize)]
struct InvitationStatusBody {
    status: String,
}

/// Probe for `GET /api/users/{id}/invitation-status`.
pub struct InvitationProbe {
    ctx: ResourceContext,
    timeout: Duration,
}

impl InvitationProbe {
    /// Timeout applied when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Probe with a per-request `timeout`.
    pub fn new(ctx: ResourceContext, timeout: Duration) -> Self {
        Self { ctx, timeout }
    }

    /// Check one user's invitation, treating any failure as unknown.
    pub async fn check(&self, user_id: &ResourceId) -> InvitationStatus {
        let path = match User::member_path(user_id, None) {
            Ok(path) => path.join("invitation-status"),
            Err(error) => {
                warn!(%error, "invitation status path could not be built");
                return InvitationStatus::Unknown;
            }
        };
        let request = self.ctx.get(&path, Some(self.timeout));
        let payload = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(payload)) => payload,
            Ok(Err(error)) => {
                warn!(user = %user_id, code = ?error.code(), %error, "invitation status probe failed");
                return InvitationStatus::Unknown;
            }
            Err(_) => {
                warn!(user = %user_id, timeout_ms = self.timeout.as_millis(), "invitation status probe timed out");
                return InvitationStatus::Unknown;
            }
        };
        match decode_object::<InvitationStatusBody>(payload) {
            Ok(body) => {
                let status = InvitationStatus::parse(&body.status);
                debug!(user = %user_id, %status, "invitation status resolved");
                status
            }
            Err(error) => {
                warn!(user = %user_id, %error, "invitation status payload was malformed");
                InvitationStatus::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Probe coverage with a deliberately slow API double.

    use std::sync::Arc;

    use async_trait::async_trait;
    use mockable::{Clock, MockClock};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{
        ApiError, FileUpload, InMemoryCredentialStore, MockNavigator, MockNotifier, ResourceApi,
    };
    use crate::domain::{ApiPath, AuthToken, SessionGuard};

    /// Answers every `GET` after `delay` with `response`.
    struct SlowApi {
        delay: Duration,
        response: Result<Value, ApiError>,
    }

    #[async_trait]
    impl ResourceApi for SlowApi {
        async fn get_json(
            &self,
            _token: &AuthToken,
            _path: &ApiPath,
            _timeout: Option<Duration>,
        ) -> Result<Value, ApiError> {
            tokio::time::sleep(self.delay).await;
            self.response.clone()
        }

        async fn post_json(
            &self,
            _token: &AuthToken,
            _path: &ApiPath,
            _body: &Value,
        ) -> Result<Value, ApiError> {
            Err(ApiError::transport("not used"))
        }

        async fn patch_json(
            &self,
            _token: &AuthToken,
            _path: &ApiPath,
            _body: &Value,
        ) -> Result<Value, ApiError> {
            Err(ApiError::transport("not used"))
        }

        async fn delete(&self, _token: &AuthToken, _path: &ApiPath) -> Result<(), ApiError> {
            Err(ApiError::transport("not used"))
        }

        async fn upload(
            &self,
            _token: &AuthToken,
            _path: &ApiPath,
            _file: FileUpload,
        ) -> Result<Value, ApiError> {
            Err(ApiError::transport("not used"))
        }
    }

    fn probe(delay: Duration, response: Result<Value, ApiError>) -> InvitationProbe {
        let store = Arc::new(InMemoryCredentialStore::default());
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().return_const(());
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(MockClock::new());
        let guard = Arc::new(SessionGuard::new(store, Arc::new(navigator), clock));
        let session = Arc::new(crate::domain::SessionContext::new(
            crate::domain::StoredCredential {
                token: AuthToken::new("tok").expect("valid token"),
                metadata: crate::domain::SessionMetadata::default(),
            },
        ));
        let ctx = ResourceContext::new(
            Arc::new(SlowApi { delay, response }),
            guard,
            Arc::new(MockNotifier::new()),
            session,
        );
        InvitationProbe::new(ctx, Duration::from_secs(5))
    }

    fn user_id() -> ResourceId {
        ResourceId::new("u1").expect("valid id")
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn slow_probe_times_out_as_unknown() {
        let probe = probe(Duration::from_secs(30), Ok(json!({"status": "accepted"})));
        assert_eq!(probe.check(&user_id()).await, InvitationStatus::Unknown);
    }

    #[rstest]
    #[case(json!({"status": "ACCEPTED"}), InvitationStatus::Accepted)]
    #[case(json!({"status": "pending"}), InvitationStatus::Pending)]
    #[case(json!({"status": "expired"}), InvitationStatus::Expired)]
    #[case(json!({"state": "accepted"}), InvitationStatus::Unknown)]
    #[tokio::test(start_paused = true)]
    async fn prompt_probe_reports_the_status(
        #[case] payload: Value,
        #[case] expected: InvitationStatus,
    ) {
        let probe = probe(Duration::from_millis(200), Ok(payload));
        assert_eq!(probe.check(&user_id()).await, expected);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn failed_probe_is_unknown() {
        let probe = probe(
            Duration::ZERO,
            Err(ApiError::status(500_u16, "HTTP 500")),
        );
        assert_eq!(probe.check(&user_id()).await, InvitationStatus::Unknown);
    }
}
