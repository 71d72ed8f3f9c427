//! Console configuration loaded via OrthoConfig.
//!
//! Values come from `ADMIN_CONSOLE_*` environment variables or the OrthoConfig
//! configuration file. Every field is optional; the accessors supply the
//! defaults.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::InvitationProbe;
use crate::domain::display::DisplayOptions;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

fn default_credential_path() -> PathBuf {
    PathBuf::from(".admin-console").join("credential.json")
}

/// Configuration values for the admin console.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ADMIN_CONSOLE")]
pub struct ConsoleSettings {
    /// Base URL of the studio REST API; request paths start with `/api`.
    pub api_base_url: Option<String>,
    /// File holding the bearer credential between invocations.
    pub credential_path: Option<PathBuf>,
    /// Client-wide request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Timeout for invitation status probes in seconds.
    pub invitation_timeout_secs: Option<u64>,
    /// Locale used to format money, e.g. `es-MX`.
    pub locale: Option<String>,
    /// ISO currency code used to format money.
    pub currency: Option<String>,
}

impl ConsoleSettings {
    /// Return the API base URL, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the configured value is not a URL.
    pub fn api_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL))
    }

    /// Return the credential path, falling back to `.admin-console/credential.json`.
    pub fn credential_path(&self) -> PathBuf {
        self.credential_path
            .clone()
            .unwrap_or_else(default_credential_path)
    }

    /// Return the client-wide request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Return the invitation probe timeout.
    pub fn invitation_timeout(&self) -> Duration {
        self.invitation_timeout_secs
            .map_or(InvitationProbe::DEFAULT_TIMEOUT, Duration::from_secs)
    }

    /// Return the money formatting options.
    pub fn display_options(&self) -> DisplayOptions {
        let defaults = DisplayOptions::default();
        DisplayOptions {
            locale: self.locale.clone().unwrap_or(defaults.locale),
            currency: self
                .currency
                .as_deref()
                .map_or(defaults.currency, str::to_ascii_uppercase),
        }
    }
}
