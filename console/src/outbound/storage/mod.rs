//! File-backed credential store.
//!
//! The credential and its session metadata live in a single JSON document.
//! All file access goes through `cap_std::fs::Dir` handles opened on the
//! document's parent directory.

mod dto;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use self::dto::StoredCredentialDto;
use crate::domain::StoredCredential;
use crate::domain::ports::{CredentialStore, CredentialStoreError};

/// Credential store persisting to one JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    directory: PathBuf,
    file_name: OsString,
}

impl FileCredentialStore {
    /// Create a store writing to `path`.
    ///
    /// # Errors
    ///
    /// Returns `io::ErrorKind::InvalidInput` when `path` has no file name.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "credential path must include a file name",
            )
        })?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self {
            directory,
            file_name: file_name.to_os_string(),
        })
    }

    /// Full path of the credential document.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    fn open_dir(&self) -> io::Result<Dir> {
        Dir::open_ambient_dir(&self.directory, ambient_authority())
    }

    fn file(&self) -> &Path {
        Path::new(&self.file_name)
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<StoredCredential>, CredentialStoreError> {
        let directory = match self.open_dir() {
            Ok(directory) => directory,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(CredentialStoreError::read(error.to_string())),
        };
        let contents = match directory.read_to_string(self.file()) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(CredentialStoreError::read(error.to_string())),
        };
        let dto: StoredCredentialDto = serde_json::from_str(&contents)
            .map_err(|error| CredentialStoreError::corrupt(error.to_string()))?;
        dto.try_into().map(Some)
    }

    fn save(&self, credential: &StoredCredential) -> Result<(), CredentialStoreError> {
        Dir::create_ambient_dir_all(&self.directory, ambient_authority())
            .map_err(|error| CredentialStoreError::write(error.to_string()))?;
        let directory = self
            .open_dir()
            .map_err(|error| CredentialStoreError::write(error.to_string()))?;
        let payload = serde_json::to_vec_pretty(&StoredCredentialDto::from(credential))
            .map_err(|error| CredentialStoreError::write(error.to_string()))?;
        directory
            .write(self.file(), payload)
            .map_err(|error| CredentialStoreError::write(error.to_string()))?;
        debug!(path = %self.path().display(), "credential written");
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        let directory = match self.open_dir() {
            Ok(directory) => directory,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(error) => return Err(CredentialStoreError::write(error.to_string())),
        };
        match directory.remove_file(self.file()) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(CredentialStoreError::write(error.to_string())),
        }
    }
}
