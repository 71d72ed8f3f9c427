//! Port for the persistent client credential storage.

use std::sync::Mutex;

use crate::domain::StoredCredential;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential store adapters.
    pub enum CredentialStoreError {
        /// The stored credential could not be read.
        Read { message: String } => "credential store read failed: {message}",
        /// The credential could not be written or removed.
        Write { message: String } => "credential store write failed: {message}",
        /// The stored payload exists but is not a valid credential.
        Corrupt { message: String } => "stored credential is corrupt: {message}",
    }
}

/// Port for reading, replacing, and clearing the stored bearer credential.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Load the stored credential, if any.
    fn load(&self) -> Result<Option<StoredCredential>, CredentialStoreError>;

    /// Replace the stored credential and its metadata.
    fn save(&self, credential: &StoredCredential) -> Result<(), CredentialStoreError>;

    /// Remove the credential and all session metadata.
    fn clear(&self) -> Result<(), CredentialStoreError>;
}

/// Process-local store used by tests and one-shot sessions.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    slot: Mutex<Option<StoredCredential>>,
}

impl InMemoryCredentialStore {
    /// Create a store pre-populated with `credential`.
    pub fn with_credential(credential: StoredCredential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Option<StoredCredential>>, CredentialStoreError> {
        self.slot
            .lock()
            .map_err(|_| CredentialStoreError::read("credential slot poisoned"))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Result<Option<StoredCredential>, CredentialStoreError> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, credential: &StoredCredential) -> Result<(), CredentialStoreError> {
        *self.lock()? = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        *self.lock()? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::{AuthToken, SessionMetadata};

    fn credential() -> StoredCredential {
        StoredCredential {
            token: AuthToken::new("tok").expect("valid token"),
            metadata: SessionMetadata::default(),
        }
    }

    #[rstest]
    fn in_memory_store_round_trips_and_clears() {
        let store = InMemoryCredentialStore::default();
        assert!(store.load().expect("load").is_none());

        store.save(&credential()).expect("save");
        assert_eq!(store.load().expect("load"), Some(credential()));

        store.clear().expect("clear");
        assert!(store.load().expect("load").is_none());
    }

    #[rstest]
    fn corrupt_error_formats_message() {
        let err = CredentialStoreError::corrupt("missing token");
        assert_eq!(err.to_string(), "stored credential is corrupt: missing token");
    }
}
