//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_store;
mod navigator;
mod notifier;
mod resource_api;

#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::{CredentialStore, CredentialStoreError, InMemoryCredentialStore};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::{Navigator, Route};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{Notification, NotificationLevel, Notifier};
#[cfg(test)]
pub use resource_api::MockResourceApi;
pub use resource_api::{ApiError, FileUpload, ResourceApi};
