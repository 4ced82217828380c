use crate::config::Settings;
use crate::models::{RegistryProject, RegistryVersion};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Errors fetching from the registry. Always recoverable: the mod is skipped.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}

/// Read access to the mod registry.
///
/// Both `id` and slug are valid keys for a project.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn get_project(&self, id: &str) -> Result<RegistryProject, FetchError>;

    /// All versions of a project, unfiltered, in response order.
    async fn get_versions(&self, id: &str) -> Result<Vec<RegistryVersion>, FetchError>;
}

/// [`RegistryClient`] backed by the Modrinth v2 REST API.
#[derive(Debug, Clone)]
pub struct ModrinthClient {
    client: Client,
    api_base: String,
}

impl ModrinthClient {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(default_headers)
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: settings.api_base().to_string(),
        })
    }

    pub fn project_url(&self, id: &str) -> String {
        format!("{}/project/{}", self.api_base, id)
    }

    pub fn versions_url(&self, id: &str) -> String {
        format!("{}/project/{}/version", self.api_base, id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode { url, source })
    }
}

#[async_trait]
impl RegistryClient for ModrinthClient {
    async fn get_project(&self, id: &str) -> Result<RegistryProject, FetchError> {
        self.get_json(self.project_url(id)).await
    }

    async fn get_versions(&self, id: &str) -> Result<Vec<RegistryVersion>, FetchError> {
        self.get_json(self.versions_url(id)).await
    }
}
