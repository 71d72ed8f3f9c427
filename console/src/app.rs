//! Composition root wiring adapters into the domain controllers.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};
use thiserror::Error;
use tracing::debug;

use crate::config::ConsoleSettings;
use crate::domain::display::DisplayOptions;
use crate::domain::ports::{CredentialStore, Notification, Notifier, ResourceApi};
use crate::domain::{Error, InvitationProbe, ResourceContext, SessionGuard};
use crate::outbound::http::HttpResourceApi;
use crate::outbound::navigation::RecordingNavigator;
use crate::outbound::notify::TracingNotifier;
use crate::outbound::storage::FileCredentialStore;

/// Failures raised while assembling the console from settings.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The API base URL is not a valid URL.
    #[error("invalid API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// The credential path is unusable.
    #[error("invalid credential path: {0}")]
    CredentialPath(#[from] io::Error),
}

/// Adapters and settings shared by every command.
pub struct ConsoleApp {
    api: Arc<dyn ResourceApi>,
    guard: Arc<SessionGuard>,
    notifier: Arc<TracingNotifier>,
    navigator: Arc<RecordingNavigator>,
    display: DisplayOptions,
    invitation_timeout: Duration,
}

impl ConsoleApp {
    /// Wire the console around an API port and credential store.
    pub fn new(
        api: Arc<dyn ResourceApi>,
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        let navigator = Arc::new(RecordingNavigator::default());
        let guard = Arc::new(SessionGuard::new(store, navigator.clone(), clock));
        Self {
            api,
            guard,
            notifier: Arc::new(TracingNotifier::default()),
            navigator,
            display: DisplayOptions::default(),
            invitation_timeout: InvitationProbe::DEFAULT_TIMEOUT,
        }
    }

    /// Build the production wiring: reqwest API client and file credential store.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError`] when the settings cannot produce adapters.
    pub fn from_settings(settings: &ConsoleSettings) -> Result<Self, StartupError> {
        let base_url = settings.api_base_url()?;
        let api = HttpResourceApi::new(base_url.clone(), settings.request_timeout())?;
        let store = FileCredentialStore::new(settings.credential_path())?;
        debug!(%base_url, credential = %store.path().display(), "console wired");
        Ok(Self::new(Arc::new(api), Arc::new(store), Arc::new(DefaultClock))
            .with_display(settings.display_options())
            .with_invitation_timeout(settings.invitation_timeout()))
    }

    /// Override money formatting.
    #[must_use]
    pub fn with_display(mut self, display: DisplayOptions) -> Self {
        self.display = display;
        self
    }

    /// Override the invitation probe timeout.
    #[must_use]
    pub fn with_invitation_timeout(mut self, timeout: Duration) -> Self {
        self.invitation_timeout = timeout;
        self
    }

    /// Session guard owning the credential lifecycle.
    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    /// Invitation probe timeout.
    pub fn invitation_timeout(&self) -> Duration {
        self.invitation_timeout
    }

    /// Establish a session and bundle the controller collaborators.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when no credential is stored.
    pub fn context(&self) -> Result<ResourceContext, Error> {
        let session = self.guard.require()?;
        Ok(ResourceContext::new(
            self.api.clone(),
            self.guard.clone(),
            self.notifier.clone(),
            session,
        )
        .with_display(self.display.clone()))
    }

    /// Whether any command requested the login view.
    pub fn login_requested(&self) -> bool {
        self.navigator.login_requested()
    }

    /// Notifications published since the last drain.
    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.notifier.drain()
    }
}
