//! HTTP client for the shopit search engine.
//!
//! Wraps `reqwest` with engine-specific error handling and typed response
//! deserialization. [`EngineClient`] implements [`ProductSearch`], so the
//! orchestrator can drive either a remote engine or an in-process one.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use shopit_core::engine::validate_request;
use shopit_core::{ClientConfig, Coordinate, ProductSearch, SearchError, SearchMatch};

use crate::error::ClientError;
use crate::types::{ErrorBody, StoreDetail};

pub struct EngineClient {
    client: Client,
    base_url: Url,
}

impl EngineClient {
    /// Creates a client from the loaded client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if the configured URL is not valid.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::with_base_url(&config.api_base_url, config.request_timeout_secs)
    }

    /// Creates a client against an explicit base URL such as
    /// `http://localhost:8080/api` (also used to point at a mock server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("shopit-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Exactly one trailing slash so relative joins append to the path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Calls `GET search` and returns the engine's ranked matches.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] for any non-2xx answer.
    /// - [`ClientError::Deserialize`] if the body is not a match array.
    pub async fn fetch_matches(
        &self,
        product_query: &str,
        origin: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<SearchMatch>, ClientError> {
        let url = self.search_url(product_query, origin, radius_km)?;
        self.request_json(&url).await
    }

    /// Calls `GET stores/{id}` with an optional category filter.
    ///
    /// # Errors
    ///
    /// Same as [`EngineClient::fetch_matches`]; an unknown store is
    /// [`ClientError::UnexpectedStatus`] with status 404.
    pub async fn store_detail(
        &self,
        store_id: i64,
        category: Option<&str>,
    ) -> Result<StoreDetail, ClientError> {
        let mut url = self.join(&format!("stores/{store_id}"))?;
        if let Some(category) = category {
            url.query_pairs_mut().append_pair("category", category);
        }
        self.request_json(&url).await
    }

    pub(crate) fn search_url(
        &self,
        product_query: &str,
        origin: Coordinate,
        radius_km: f64,
    ) -> Result<Url, ClientError> {
        let mut url = self.join("search")?;
        url.query_pairs_mut()
            .append_pair("query", product_query)
            .append_pair("lat", &origin.latitude.to_string())
            .append_pair("lng", &origin.longitude.to_string())
            .append_pair("radius", &radius_km.to_string());
        Ok(url)
    }

    fn join(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Sends a GET request and parses a 2xx body as `T`. Non-2xx bodies are
    /// read for the engine's `error` message.
    async fn request_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ClientError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }
}

impl ProductSearch for EngineClient {
    async fn search(
        &self,
        product_query: &str,
        origin: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<SearchMatch>, SearchError> {
        let product_query = validate_request(product_query, origin, radius_km)?;
        self.fetch_matches(product_query, origin, radius_km)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, query = product_query, "engine request failed");
                SearchError::from(e)
            })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
