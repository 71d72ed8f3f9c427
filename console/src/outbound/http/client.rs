//! Reqwest-backed adapter for the studio REST API.
//!
//! This adapter owns transport details only: URL resolution, the bearer and
//! accept headers, per-request timeouts, status mapping, and JSON parsing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use super::dto::ApiErrorBodyDto;
use crate::domain::ports::{ApiError, FileUpload, ResourceApi};
use crate::domain::{ApiPath, AuthToken};

const USER_AGENT: &str = concat!("admin-console/", env!("CARGO_PKG_VERSION"));

/// REST adapter sending authenticated JSON requests against one base URL.
pub struct HttpResourceApi {
    client: Client,
    base_url: Url,
}

impl HttpResourceApi {
    /// Build an adapter whose client applies `timeout` to every request.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Build an adapter around an existing client.
    pub fn with_client(base_url: Url, client: Client) -> Self {
        Self { client, base_url }
    }

    fn url(&self, path: &ApiPath) -> Result<Url, ApiError> {
        resolve_url(&self.base_url, path)
    }

    fn authorised(&self, builder: RequestBuilder, token: &AuthToken) -> RequestBuilder {
        builder
            .bearer_auth(token.expose())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "API response");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_body(body.as_ref())
    }
}

#[async_trait]
impl ResourceApi for HttpResourceApi {
    async fn get_json(
        &self,
        token: &AuthToken,
        path: &ApiPath,
        timeout: Option<Duration>,
    ) -> Result<Value, ApiError> {
        let mut request = self.authorised(self.client.get(self.url(path)?), token);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        self.execute(request).await
    }

    async fn post_json(
        &self,
        token: &AuthToken,
        path: &ApiPath,
        body: &Value,
    ) -> Result<Value, ApiError> {
        let request = self.authorised(self.client.post(self.url(path)?), token).json(body);
        self.execute(request).await
    }

    async fn patch_json(
        &self,
        token: &AuthToken,
        path: &ApiPath,
        body: &Value,
    ) -> Result<Value, ApiError> {
        let request = self
            .authorised(self.client.patch(self.url(path)?), token)
            .json(body);
        self.execute(request).await
    }

    async fn delete(&self, token: &AuthToken, path: &ApiPath) -> Result<(), ApiError> {
        let request = self.authorised(self.client.delete(self.url(path)?), token);
        self.execute(request).await.map(|_| ())
    }

    async fn upload(
        &self,
        token: &AuthToken,
        path: &ApiPath,
        file: FileUpload,
    ) -> Result<Value, ApiError> {
        let form = multipart_form(file)?;
        let request = self
            .authorised(self.client.post(self.url(path)?), token)
            .multipart(form);
        self.execute(request).await
    }
}

fn resolve_url(base_url: &Url, path: &ApiPath) -> Result<Url, ApiError> {
    let joined = format!(
        "{}{}",
        base_url.as_str().trim_end_matches('/'),
        path.as_str()
    );
    Url::parse(&joined)
        .map_err(|error| ApiError::transport(format!("invalid request URL {joined}: {error}")))
}

fn multipart_form(file: FileUpload) -> Result<Form, ApiError> {
    let FileUpload {
        field,
        file_name,
        content_type,
        bytes,
    } = file;
    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(&content_type)
        .map_err(|error| {
            ApiError::transport(format!("invalid content type {content_type}: {error}"))
        })?;
    Ok(Form::new().part(field, part))
}

fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|error| ApiError::decode(format!("invalid JSON payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::timeout(error.to_string())
    } else {
        ApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized;
    }
    let message = serde_json::from_slice::<ApiErrorBodyDto>(body)
        .ok()
        .and_then(ApiErrorBodyDto::into_message)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for status mapping plus a loopback round trip.

    use rstest::rstest;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    #[rstest]
    #[case::error_field(StatusCode::BAD_REQUEST, br#"{"error":"code required"}"#.as_slice(), "code required")]
    #[case::details_field(StatusCode::UNPROCESSABLE_ENTITY, br#"{"details":"x"}"#.as_slice(), "x")]
    #[case::error_wins(StatusCode::CONFLICT, br#"{"error":"taken","details":"code"}"#.as_slice(), "taken")]
    #[case::message_field(StatusCode::NOT_FOUND, br#"{"message":"no such package"}"#.as_slice(), "no such package")]
    #[case::detail_list(StatusCode::BAD_REQUEST, br#"{"details":[{"message":"a"},"b"]}"#.as_slice(), "a; b")]
    #[case::blank_error(StatusCode::BAD_REQUEST, br#"{"error":"  ","details":"y"}"#.as_slice(), "y")]
    #[case::non_json(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>".as_slice(), "HTTP 500")]
    #[case::empty(StatusCode::BAD_GATEWAY, b"".as_slice(), "HTTP 502")]
    fn extracts_error_messages(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, body);
        assert_eq!(
            error,
            ApiError::Status {
                status: status.as_u16(),
                message: expected.to_owned(),
            }
        );
    }

    #[rstest]
    fn unauthorized_ignores_the_body() {
        let error = map_status_error(StatusCode::UNAUTHORIZED, br#"{"error":"expired"}"#);
        assert_eq!(error, ApiError::Unauthorized);
    }

    #[rstest]
    #[case(b"".as_slice(), Value::Null)]
    #[case(b"[1]".as_slice(), serde_json::json!([1]))]
    fn parses_success_bodies(#[case] body: &[u8], #[case] expected: Value) {
        assert_eq!(parse_body(body).expect("valid body"), expected);
    }

    #[rstest]
    fn invalid_success_body_is_a_decode_error() {
        assert!(matches!(
            parse_body(b"{not json"),
            Err(ApiError::Decode { .. })
        ));
    }

    #[rstest]
    #[case("https://studio.test", "https://studio.test/api/packages")]
    #[case("https://studio.test/", "https://studio.test/api/packages")]
    #[case("https://studio.test/admin/", "https://studio.test/admin/api/packages")]
    fn resolves_paths_below_the_base_url(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("base url");
        let url = resolve_url(&base, &ApiPath::api().join("packages")).expect("url");
        assert_eq!(url.as_str(), expected);
    }

    async fn serve_once(status_line: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let addr = listener.local_addr().expect("listener address");
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut chunk = [0_u8; 1024];
            loop {
                let read = socket.read(&mut chunk).await.expect("read request");
                request.extend_from_slice(chunk.get(..read).unwrap_or_default());
                if read == 0 || request.windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            String::from_utf8_lossy(&request).into_owned()
        });
        let url = Url::parse(&format!("http://{addr}")).expect("loopback url");
        (url, handle)
    }

    fn adapter(base_url: Url) -> HttpResourceApi {
        let client = Client::builder().no_proxy().build().expect("client");
        HttpResourceApi::with_client(base_url, client)
    }

    fn token() -> AuthToken {
        AuthToken::new("tok-1").expect("valid token")
    }

    #[tokio::test]
    async fn get_sends_bearer_and_accept_headers() {
        let (url, server) = serve_once("200 OK", r#"{"error":"not a list"}"#).await;

        let payload = adapter(url)
            .get_json(&token(), &ApiPath::api().join("packages"), None)
            .await
            .expect("2xx payload");
        let request = server.await.expect("server task").to_ascii_lowercase();

        assert_eq!(payload, serde_json::json!({"error": "not a list"}));
        assert!(request.starts_with("get /api/packages http/1.1"), "{request}");
        assert!(request.contains("authorization: bearer tok-1"), "{request}");
        assert!(request.contains("accept: application/json"), "{request}");
    }

    #[tokio::test]
    async fn delete_maps_unauthorized() {
        let (url, server) = serve_once("401 Unauthorized", r#"{"error":"expired"}"#).await;

        let error = adapter(url)
            .delete(&token(), &ApiPath::api().join("packages/pkg-1"))
            .await
            .expect_err("401");
        let request = server.await.expect("server task").to_ascii_lowercase();

        assert_eq!(error, ApiError::Unauthorized);
        assert!(request.starts_with("delete /api/packages/pkg-1 "), "{request}");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let addr = listener.local_addr().expect("listener address");
        drop(listener);
        let url = Url::parse(&format!("http://{addr}")).expect("loopback url");

        let error = adapter(url)
            .get_json(&token(), &ApiPath::api().join("classes"), None)
            .await
            .expect_err("connection refused");

        assert!(matches!(error, ApiError::Transport { .. }), "{error:?}");
    }
}
