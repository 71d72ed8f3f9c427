//! Scripted test doubles for the console's outbound ports.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use admin_console::domain::ports::{ApiError, FileUpload, ResourceApi};
use admin_console::domain::{ApiPath, AuthToken};
use async_trait::async_trait;
use serde_json::{Value, json};

/// HTTP verb recorded for each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
    Upload,
}

/// One request observed by [`ScriptedApi`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub token: String,
    pub body: Option<Value>,
}

/// In-process `ResourceApi` answering from a script keyed by verb and path.
///
/// Unscripted `GET`s answer `[]`, other verbs answer `{}`.
#[derive(Debug, Default)]
pub struct ScriptedApi {
    responses: Mutex<HashMap<(Method, String), Result<Value, ApiError>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
    /// Script the outcome for `method` on `path`.
    pub fn respond(&self, method: Method, path: &str, outcome: Result<Value, ApiError>) {
        self.responses
            .lock()
            .expect("responses lock")
            .insert((method, path.to_owned()), outcome);
    }

    /// All calls, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Number of calls made with `method` to `path`.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    fn answer(
        &self,
        method: Method,
        token: &AuthToken,
        path: &ApiPath,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        self.calls.lock().expect("calls lock").push(Call {
            method,
            path: path.as_str().to_owned(),
            token: token.expose().to_owned(),
            body,
        });
        self.responses
            .lock()
            .expect("responses lock")
            .get(&(method, path.as_str().to_owned()))
            .cloned()
            .unwrap_or_else(|| match method {
                Method::Get => Ok(json!([])),
                _ => Ok(json!({})),
            })
    }
}

#[async_trait]
impl ResourceApi for ScriptedApi {
    async fn get_json(
        &self,
        token: &AuthToken,
        path: &ApiPath,
        _timeout: Option<Duration>,
    ) -> Result<Value, ApiError> {
        self.answer(Method::Get, token, path, None)
    }

    async fn post_json(
        &self,
        token: &AuthToken,
        path: &ApiPath,
        body: &Value,
    ) -> Result<Value, ApiError> {
        self.answer(Method::Post, token, path, Some(body.clone()))
    }

    async fn patch_json(
        &self,
        token: &AuthToken,
        path: &ApiPath,
        body: &Value,
    ) -> Result<Value, ApiError> {
        self.answer(Method::Patch, token, path, Some(body.clone()))
    }

    async fn delete(&self, token: &AuthToken, path: &ApiPath) -> Result<(), ApiError> {
        self.answer(Method::Delete, token, path, None).map(|_| ())
    }

    async fn upload(
        &self,
        token: &AuthToken,
        path: &ApiPath,
        file: FileUpload,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "field": file.field,
            "file_name": file.file_name,
            "content_type": file.content_type,
            "size": file.bytes.len(),
        });
        self.answer(Method::Upload, token, path, Some(body))
    }
}
