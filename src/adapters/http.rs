use crate::core::{CatalogEntry, InventoryService, ItemId, StockRecord};
use crate::utils::error::{CartError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Inventory service reached over HTTP.
///
/// Stock lives at `{endpoint}/stock/{id}` and catalog records at
/// `{endpoint}/products/{id}`.
#[derive(Debug, Clone)]
pub struct HttpInventory {
    client: Client,
    endpoint: Url,
}

impl HttpInventory {
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_timeout(endpoint, None)
    }

    pub fn with_timeout(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut endpoint = Url::parse(endpoint).map_err(|e| CartError::InvalidConfigValueError {
            field: "inventory.endpoint".to_string(),
            value: endpoint.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        // join() replaces the last segment unless the path ends with '/'
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn resource_url(&self, resource: &str, id: ItemId) -> Result<Url> {
        self.endpoint
            .join(&format!("{}/{}", resource, id))
            .map_err(|e| CartError::unavailable(id, e))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("Making inventory request to: {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("Inventory response status: {}", response.status());

        let body = response.error_for_status()?.json::<T>().await?;
        Ok(body)
    }
}

#[async_trait]
impl InventoryService for HttpInventory {
    async fn stock(&self, id: ItemId) -> Result<StockRecord> {
        let url = self.resource_url("stock", id)?;
        self.get_json(url).await
    }

    async fn catalog_entry(&self, id: ItemId) -> Result<CatalogEntry> {
        let url = self.resource_url("products", id)?;
        self.get_json(url).await
    }
}
