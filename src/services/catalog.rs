use crate::config::Settings;
use crate::models::{Edition, PackSet};
use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Settings key path yielding the pack/edition → progress-channel mapping.
const PROGRESS_CHANNELS_PATH: &str = "settings/discord.channels.pack_progress";

/// Mapping from pack id to per-edition display channel ids.
pub type ProgressChannelMap = IndexMap<String, IndexMap<Edition, String>>;

/// Errors from the catalog service.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Catalog returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Read-only catalog capability.
///
/// The engine consumes pack, edition, and version metadata as plain data;
/// nothing downstream depends on the transport. Fetched fresh per
/// invocation; callers wanting a cache add one outside this crate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// All packs, keyed by pack id.
    async fn packs(&self) -> Result<PackSet, CatalogError>;

    /// Every concrete edition the catalog knows about.
    async fn editions(&self) -> Result<Vec<Edition>, CatalogError>;

    /// Known versions for an edition, most-recent first.
    async fn versions(&self, edition: Edition) -> Result<Vec<String>, CatalogError>;

    /// The pack/edition → display-channel mapping.
    async fn progress_channels(&self) -> Result<ProgressChannelMap, CatalogError>;
}

/// HTTP implementation of [`CatalogApi`].
pub struct HttpCatalog {
    http: Client,
    base_url: String,
    fallback_url: String,
}

impl HttpCatalog {
    pub fn new(settings: &Settings) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.api_url.clone(),
            fallback_url: settings.fallback_api_url.clone(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        base: &str,
        path: &str,
    ) -> Result<T, CatalogError> {
        let url = endpoint(base, path);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status { url, status });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn packs(&self) -> Result<PackSet, CatalogError> {
        self.get_json(&self.base_url, "packs/raw").await
    }

    async fn editions(&self) -> Result<Vec<Edition>, CatalogError> {
        self.get_json(&self.base_url, "textures/editions").await
    }

    async fn versions(&self, edition: Edition) -> Result<Vec<String>, CatalogError> {
        self.get_json(&self.base_url, &format!("versions/edition/{edition}"))
            .await
    }

    /// Two-tier fetch: the primary endpoint, then one attempt against the
    /// well-known fallback host. No further retries.
    async fn progress_channels(&self) -> Result<ProgressChannelMap, CatalogError> {
        match self.get_json(&self.base_url, PROGRESS_CHANNELS_PATH).await {
            Ok(map) => Ok(map),
            Err(primary) => {
                tracing::warn!(
                    "Primary progress channel lookup failed ({}), trying fallback",
                    primary
                );
                self.get_json(&self.fallback_url, PROGRESS_CHANNELS_PATH).await
            }
        }
    }
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_with_single_slash() {
        assert_eq!(
            endpoint("https://api.example.net/v2/", "packs/raw"),
            "https://api.example.net/v2/packs/raw"
        );
        assert_eq!(
            endpoint("https://api.example.net/v2", "packs/raw"),
            "https://api.example.net/v2/packs/raw"
        );
    }

    #[test]
    fn test_progress_channel_map_shape() {
        let json = r#"{
            "candidate32x": {
                "java": "123456789",
                "bedrock": "987654321"
            }
        }"#;
        let map: ProgressChannelMap = serde_json::from_str(json).unwrap();
        assert_eq!(
            map.get("candidate32x").unwrap().get(&Edition::Java).unwrap(),
            "123456789"
        );
    }
}
