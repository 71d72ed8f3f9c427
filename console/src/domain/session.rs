//! Session guard and the injected session context.
//!
//! The bearer credential is read from the [`CredentialStore`] port exactly once,
//! when a [`SessionContext`] is established. Controllers receive the context at
//! construction and never consult the store themselves. The only writes to the
//! store happen on explicit login, explicit logout, and the first `401` seen
//! for a context.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::Error;
use crate::domain::ports::{CredentialStore, CredentialStoreError, Navigator, Route};

/// Validation errors raised while parsing a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthTokenValidationError {
    /// Token was missing or blank once trimmed.
    Empty,
    /// Token contained whitespace inside the value.
    EmbeddedWhitespace,
}

impl fmt::Display for AuthTokenValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "token must not be empty"),
            Self::EmbeddedWhitespace => write!(f, "token must not contain whitespace"),
        }
    }
}

impl std::error::Error for AuthTokenValidationError {}

/// Opaque bearer credential sent as `Authorization: Bearer <token>`.
///
/// ## Invariants
/// - The value is trimmed, non-empty, and free of inner whitespace.
/// - The backing buffer is zeroed on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Validate and wrap a raw token string.
    ///
    /// # Examples
    /// ```
    /// use admin_console::domain::AuthToken;
    ///
    /// let token = AuthToken::new("  abc.def  ").unwrap();
    /// assert_eq!(token.expose(), "abc.def");
    /// assert!(AuthToken::new("   ").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AuthTokenValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AuthTokenValidationError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(AuthTokenValidationError::EmbeddedWhitespace);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Raw token value, for building the authorisation header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Session metadata persisted next to the credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMetadata {
    /// Email of the signed-in operator.
    pub email: Option<String>,
    /// Role reported when the token was issued.
    pub role: Option<String>,
    /// When the credential was stored.
    pub stored_at: Option<DateTime<Utc>>,
}

/// Credential plus metadata as held by a [`CredentialStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    /// Bearer token.
    pub token: AuthToken,
    /// Metadata cleared together with the token.
    pub metadata: SessionMetadata,
}

/// Authenticated session injected into every controller.
#[derive(Debug)]
pub struct SessionContext {
    token: AuthToken,
    metadata: SessionMetadata,
    expired: AtomicBool,
}

impl SessionContext {
    /// Build a context from a stored credential.
    pub fn new(credential: StoredCredential) -> Self {
        Self {
            token: credential.token,
            metadata: credential.metadata,
            expired: AtomicBool::new(false),
        }
    }

    /// Bearer token for outbound requests.
    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    /// Metadata captured at login.
    pub fn metadata(&self) -> &SessionMetadata {
        &self.metadata
    }

    /// Whether the API has rejected this context's credential.
    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::Acquire)
    }

    /// Mark the context expired, returning `true` for the first caller only.
    fn expire(&self) -> bool {
        !self.expired.swap(true, Ordering::AcqRel)
    }
}

fn map_store_error(error: CredentialStoreError) -> Error {
    Error::internal(format!("credential store failed: {error}"))
}

/// Gatekeeper for authenticated views.
pub struct SessionGuard {
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl SessionGuard {
    /// Create a guard over the credential store and navigator.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            store,
            navigator,
            clock,
        }
    }

    /// Establish a session from the stored credential.
    ///
    /// A missing credential navigates to the login route and returns
    /// [`crate::domain::ErrorCode::Unauthorized`]; nothing authenticated may
    /// be rendered after that.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when no credential is stored and `InternalError`
    /// when the store cannot be read.
    pub fn require(&self) -> Result<Arc<SessionContext>, Error> {
        match self.store.load().map_err(map_store_error)? {
            Some(credential) => Ok(Arc::new(SessionContext::new(credential))),
            None => {
                self.navigator.navigate(Route::Login);
                Err(Error::unauthorized("sign in to continue"))
            }
        }
    }

    /// Persist a freshly supplied credential and return its context.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when the store rejects the write.
    pub fn sign_in(
        &self,
        token: AuthToken,
        email: Option<String>,
        role: Option<String>,
    ) -> Result<Arc<SessionContext>, Error> {
        let credential = StoredCredential {
            token,
            metadata: SessionMetadata {
                email,
                role,
                stored_at: Some(self.clock.utc()),
            },
        };
        self.store.save(&credential).map_err(map_store_error)?;
        info!(email = ?credential.metadata.email, "credential stored");
        Ok(Arc::new(SessionContext::new(credential)))
    }

    /// Clear the stored credential and metadata.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when the store cannot be cleared.
    pub fn sign_out(&self) -> Result<(), Error> {
        self.store.clear().map_err(map_store_error)?;
        info!("credential cleared");
        Ok(())
    }

    /// React to an HTTP 401 received with `session`'s credential.
    ///
    /// The first rejection for a context clears the store and navigates to
    /// login; later rejections for the same context only report the error.
    pub fn handle_unauthorized(&self, session: &SessionContext) -> Error {
        if session.expire() {
            if let Err(error) = self.store.clear() {
                warn!(kind = error.kind(), %error, "failed to clear credential after 401");
            }
            self.navigator.navigate(Route::Login);
            warn!("credential rejected by the API; redirected to login");
        }
        Error::unauthorized("session expired, sign in again")
    }
}
