//! Twitch API client: request construction, dispatch and decoding.
//!
//! # Design
//! `TwitchClient` is configured once through `ClientBuilder` and read-only
//! afterwards, so it can be shared between callers as long as its transport
//! is. Each call is split into three steps:
//!
//! - `build_request` turns an endpoint and `RequestOptions` into an
//!   `HttpRequest` without touching the network;
//! - the configured `Transport` sends it, once;
//! - `parse_response` checks the status and decodes the body.
//!
//! The response (and with it the connection) is owned by `parse_response` and
//! dropped when it returns, whichever branch it returns from.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::options::RequestOptions;
use crate::types::{Channel, Followers};

/// Scheme and host every base path is appended to.
pub const DEFAULT_API_ROOT: &str = "https://api.twitch.tv";

/// Blocking client for the Twitch REST API.
#[derive(Clone)]
pub struct TwitchClient {
    transport: Arc<dyn Transport>,
    client_id: String,
    token: Option<String>,
    api_root: String,
}

impl TwitchClient {
    /// Client with every default: no client id, no token, a `UreqTransport`.
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Fetch a channel by id or name.
    pub fn get_channel(
        &self,
        id: &str,
        options: Option<&RequestOptions>,
    ) -> Result<Channel, ApiError> {
        self.get(&format!("/channels/{id}"), options)
    }

    /// Fetch one page of a channel's followers. Paging is up to the caller,
    /// through `limit`/`offset` or a `cursor` extra.
    pub fn get_followers_for_id(
        &self,
        id: &str,
        options: Option<&RequestOptions>,
    ) -> Result<Followers, ApiError> {
        self.get(&format!("/channels/{id}/follows"), options)
    }

    /// Issue one GET for `endpoint` and decode the JSON body into `T`.
    ///
    /// `endpoint` is the path below the base path, starting with `/`.
    pub fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> Result<T, ApiError> {
        let request = self.build_request(endpoint, options);
        debug!(url = %request.url, "sending GET");

        let response = self.transport.send(&request)?;
        debug!(status = response.status, url = %request.url, "received response");

        self.parse_response(response)
    }

    /// Build the request for `endpoint` without sending it.
    pub fn build_request(&self, endpoint: &str, options: Option<&RequestOptions>) -> HttpRequest {
        let version = options.map(|o| o.version).unwrap_or_default();
        let query = options.map(RequestOptions::query_string).unwrap_or_default();
        let url = format!("{}{}{endpoint}{query}", self.api_root, version.base_path());

        let mut headers = vec![("Accept".to_string(), version.accept_header())];
        if !self.client_id.is_empty() {
            headers.push(("Client-ID".to_string(), self.client_id.clone()));
        }
        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        HttpRequest { url, headers }
    }

    /// Check the status and decode the body. A non-200 response is dropped
    /// without reading its body.
    pub fn parse_response<T: DeserializeOwned>(
        &self,
        mut response: HttpResponse,
    ) -> Result<T, ApiError> {
        if response.status != 200 {
            return Err(ApiError::UnexpectedStatus {
                status: response.status,
            });
        }

        let mut body = Vec::new();
        response.body.read_to_end(&mut body)?;
        trace!(bytes = body.len(), "read response body");

        Ok(serde_json::from_slice(&body)?)
    }
}

impl Default for TwitchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TwitchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitchClient")
            .field("client_id", &self.client_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_root", &self.api_root)
            .finish_non_exhaustive()
    }
}

/// Collects client configuration. Each setter replaces one field, so when a
/// field is set twice the last call wins.
#[derive(Default)]
pub struct ClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    client_id: String,
    token: Option<String>,
    api_root: Option<String>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// OAuth token sent as `Authorization: Bearer <token>`. An empty token
    /// clears it.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = if token.is_empty() { None } else { Some(token) };
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Scheme and host the base paths hang off. Trailing slashes are dropped.
    pub fn api_root(mut self, api_root: &str) -> Self {
        self.api_root = Some(api_root.trim_end_matches('/').to_string());
        self
    }

    pub fn build(self) -> TwitchClient {
        TwitchClient {
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(UreqTransport::default())),
            client_id: self.client_id,
            token: self.token,
            api_root: self
                .api_root
                .unwrap_or_else(|| DEFAULT_API_ROOT.to_string()),
        }
    }
}
