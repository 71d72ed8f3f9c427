//! On-disk representation of the stored credential.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::CredentialStoreError;
use crate::domain::{AuthToken, SessionMetadata, StoredCredential};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StoredCredentialDto {
    pub(super) token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) stored_at: Option<DateTime<Utc>>,
}

impl From<&StoredCredential> for StoredCredentialDto {
    fn from(credential: &StoredCredential) -> Self {
        Self {
            token: credential.token.expose().to_owned(),
            email: credential.metadata.email.clone(),
            role: credential.metadata.role.clone(),
            stored_at: credential.metadata.stored_at,
        }
    }
}

impl TryFrom<StoredCredentialDto> for StoredCredential {
    type Error = CredentialStoreError;

    fn try_from(dto: StoredCredentialDto) -> Result<Self, Self::Error> {
        let token = AuthToken::new(&dto.token)
            .map_err(|error| CredentialStoreError::corrupt(error.to_string()))?;
        Ok(Self {
            token,
            metadata: SessionMetadata {
                email: dto.email,
                role: dto.role,
                stored_at: dto.stored_at,
            },
        })
    }
}
