//! API client for communicating with the Willpower Forge REST API.
//!
//! This module provides the `ApiClient` struct. Every outgoing request is
//! built by `ApiClient::request`, which runs it through [`authorize`] so the
//! bearer header is attached in exactly one place.

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::{ApiEnvelope, Credentials, LoginData, Registration};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default API root used when neither config nor environment override it.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Attach `Authorization: Bearer <credential>` when the credential is non-empty.
pub fn authorize(builder: RequestBuilder, credential: &str) -> RequestBuilder {
    if credential.is_empty() {
        builder
    } else {
        builder.header(header::AUTHORIZATION, format!("Bearer {}", credential))
    }
}

/// API client for Willpower Forge.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authorized", &self.token.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client rooted at `base_url` (e.g. `https://host/api/v1`)
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    /// An empty token yields an unauthorized client.
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: (!token.is_empty()).then(|| token.to_string()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authorized(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Build a request against the API root with the bearer header applied.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        authorize(builder, self.token.as_deref().unwrap_or_default())
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request and unwrap the `data` field of the response envelope.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = Self::check_response(builder.send().await?).await?;
        let url = response.url().path().to_string();
        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))?;
        debug!(url = %url, code = envelope.code, "API response");
        envelope
            .data
            .ok_or_else(|| ApiError::InvalidResponse(format!("{}: response has no data", url)))
    }

    /// Send a request whose success body carries nothing we need.
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let response = Self::check_response(builder.send().await?).await?;
        debug!(url = %response.url().path(), status = %response.status(), "API response");
        Ok(())
    }

    pub(crate) fn json_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> RequestBuilder {
        self.request(method, path).json(body)
    }

    // ===== Auth =====

    /// Create an account. The response body is ignored.
    pub async fn register(&self, payload: &Registration) -> Result<(), ApiError> {
        self.send_empty(self.json_request(Method::POST, "/auth/register", payload))
            .await
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginData, ApiError> {
        let data: LoginData = self
            .send(self.json_request(Method::POST, "/auth/login", credentials))
            .await?;
        if data.token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "login response carried an empty token".to_string(),
            ));
        }
        Ok(data)
    }
}
