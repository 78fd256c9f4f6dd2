//! Lucky draw HTTP client implementation.

use reqwest::{Client, StatusCode};
use std::time::Duration;

use lucky_draw_core::{DrawMode, DrawResult};

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, ClearKeysResponse, DrawRequest, DrawResponse, GenerateKeyRequest,
    HealthResponse, KeyResponse,
};

/// Lucky draw API client.
///
/// Provides methods for issuing keys and running draws.
#[derive(Debug, Clone)]
pub struct LuckyDrawClient {
    client: Client,
    base_url: String,
    admin_api_key: Option<String>,
}

impl LuckyDrawClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the lucky draw service (e.g., `"http://lucky-draw:5000"`)
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            admin_api_key: options.admin_api_key,
        })
    }

    /// Issue a key allowing `usage_count` draws.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the count is out of range.
    pub async fn generate_key(&self, usage_count: u32) -> Result<KeyResponse, ClientError> {
        let url = format!("{}/generate_key", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&GenerateKeyRequest { usage_count })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Look up a key. Returns `None` if no live key has this code.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn lookup_key(&self, key: &str) -> Result<Option<KeyResponse>, ClientError> {
        let url = format!("{}/keys/{key}", self.base_url);

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        self.handle_response(response).await.map(Some)
    }

    /// Redeem a key.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidKey` or `ClientError::ExhaustedKey` if the key
    /// cannot be redeemed, or another error if the request fails.
    pub async fn draw(&self, key: &str, mode: DrawMode) -> Result<Vec<DrawResult>, ClientError> {
        let url = format!("{}/draw", self.base_url);
        let request = DrawRequest {
            key: key.to_string(),
            mode,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let body: DrawResponse = self.handle_response(response).await?;
        tracing::debug!(key, %mode, draws = body.results.len(), "Draw completed");
        Ok(body.results)
    }

    /// Delete every key on the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the admin key is rejected.
    pub async fn clear_keys(&self) -> Result<ClearKeysResponse, ClientError> {
        let url = format!("{}/clear_keys", self.base_url);

        let mut request = self.client.get(&url);
        if let Some(api_key) = &self.admin_api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Check service health.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => match api_error.code.as_str() {
                "invalid_key" => Err(ClientError::InvalidKey {
                    message: api_error.error,
                }),
                "exhausted_key" => Err(ClientError::ExhaustedKey {
                    message: api_error.error,
                }),
                _ => Err(ClientError::Api {
                    code: api_error.code,
                    message: api_error.error,
                    status: status.as_u16(),
                }),
            },
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// Admin key sent with `clear_keys`.
    pub admin_api_key: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            admin_api_key: None,
        }
    }
}

impl ClientOptions {
    /// Create options with an admin key.
    #[must_use]
    pub fn with_admin_key(key: impl Into<String>) -> Self {
        Self {
            admin_api_key: Some(key.into()),
            ..Self::default()
        }
    }
}
