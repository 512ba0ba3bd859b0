//! HTTP client for PokeAPI-compatible servers.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use fetchbox_core::{Fetcher, ResourceKey};
use reqwest::StatusCode;
use tracing::debug;

use crate::error::FetchError;
use crate::payload::{Creature, CreatureResponse};

/// Public API root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Client for creature lookups.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub struct PokeClient {
    http: reqwest::Client,
    base_url: String,
    latency: Option<Duration>,
}

impl PokeClient {
    /// Creates a client against [`DEFAULT_BASE_URL`].
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts configuring a client.
    pub fn builder() -> PokeClientBuilder {
        PokeClientBuilder::default()
    }

    /// Fetches a creature by name.
    ///
    /// The name is lowercased before hitting the API, matching the
    /// normalization applied by [`ResourceKey`]. A 404 maps to
    /// [`FetchError::NotFound`], any other non-success status to
    /// [`FetchError::Status`].
    pub async fn creature(&self, name: &str) -> Result<Creature, FetchError> {
        let name = name.to_lowercase();
        self.simulate_latency().await;
        let url = format!("{}/pokemon/{name}", self.base_url);
        debug!(%name, "looking up creature");
        let response = self.http.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound { name });
        }
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
            });
        }
        let payload: CreatureResponse = response.json().await?;
        Ok(payload.into())
    }

    /// Downloads image bytes, typically from a URL taken off
    /// [`Creature::artwork`].
    ///
    /// Pairs with a `ResourceCache<Bytes, FetchError>` to warm artwork
    /// alongside the creature lookup itself.
    pub async fn preload_image(&self, url: &str) -> Result<Bytes, FetchError> {
        debug!(%url, "preloading image");
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
            });
        }
        Ok(response.bytes().await?)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for PokeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for PokeClient {
    type Payload = Creature;
    type Error = FetchError;

    async fn fetch(&self, key: ResourceKey) -> Result<Creature, FetchError> {
        self.creature(key.as_str()).await
    }
}

/// Builder for [`PokeClient`].
#[derive(Debug, Default)]
pub struct PokeClientBuilder {
    http: Option<reqwest::Client>,
    base_url: Option<String>,
    latency: Option<Duration>,
}

impl PokeClientBuilder {
    /// Overrides the API root, e.g. to point at a mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = Some(base_url.trim_end_matches('/').to_owned());
        self
    }

    /// Supplies a preconfigured [`reqwest::Client`].
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Adds an artificial delay before each creature lookup.
    ///
    /// Handy for exercising loading indicators against a fast local
    /// server.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Builds the client.
    pub fn build(self) -> PokeClient {
        PokeClient {
            http: self.http.unwrap_or_default(),
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            latency: self.latency,
        }
    }
}
