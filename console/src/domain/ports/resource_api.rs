//! Port for the studio REST API.
//!
//! Adapters own transport details only: URL resolution, the bearer header,
//! status mapping, and JSON parsing. Typed decoding of the returned JSON stays
//! in the domain (see [`crate::domain::decode`]).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{ApiPath, AuthToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by REST API adapters.
    pub enum ApiError {
        /// The API answered `401`; the credential is no longer valid.
        Unauthorized => "credential rejected by the API",
        /// The API answered with another non-success status.
        ///
        /// `message` is the human-readable text extracted from the error body
        /// or `HTTP <status>` when none was present.
        Status { status: u16, message: String } => "{message}",
        /// The request could not be sent or the response could not be read.
        Transport { message: String } => "request failed: {message}",
        /// The request did not complete in time.
        Timeout { message: String } => "request timed out: {message}",
        /// The response body was not valid JSON.
        Decode { message: String } => "invalid response payload: {message}",
    }
}

/// A file sent as one part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Form field name, e.g. `photo` or `receipt`.
    pub field: String,
    /// File name reported to the API.
    pub file_name: String,
    /// MIME type of the payload.
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Authenticated JSON access to the REST API.
///
/// Every method sends `Authorization: Bearer <token>`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// `GET` a JSON document. `timeout` overrides the client default.
    async fn get_json(
        &self,
        token: &AuthToken,
        path: &ApiPath,
        timeout: Option<Duration>,
    ) -> Result<Value, ApiError>;

    /// `POST` a JSON body and return the response document.
    async fn post_json(
        &self,
        token: &AuthToken,
        path: &ApiPath,
        body: &Value,
    ) -> Result<Value, ApiError>;

    /// `PATCH` a partial JSON body and return the response document.
    async fn patch_json(
        &self,
        token: &AuthToken,
        path: &ApiPath,
        body: &Value,
    ) -> Result<Value, ApiError>;

    /// `DELETE` a resource.
    async fn delete(&self, token: &AuthToken, path: &ApiPath) -> Result<(), ApiError>;

    /// `POST` a multipart form with one file part.
    async fn upload(
        &self,
        token: &AuthToken,
        path: &ApiPath,
        file: FileUpload,
    ) -> Result<Value, ApiError>;
}
