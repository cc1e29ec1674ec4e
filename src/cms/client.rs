use crate::catalog::Product;
use crate::errors::ServiceError;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{instrument, warn};

/// HTTP client for the CMS content API. Strictly read-only: products,
/// categories and editorial content are owned and mutated by the CMS.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl CmsClient {
    pub fn new(
        base_url: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ServiceError::ExternalServiceError(format!("failed to build CMS client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Fetches a single product by slug. Returns `None` when the CMS has no
    /// such product; transport and decoding failures propagate.
    #[instrument(skip(self))]
    pub async fn get_product(&self, slug: &str) -> Result<Option<Product>, ServiceError> {
        let response = self
            .get(&format!("/products/{}", slug))
            .send()
            .await
            .map_err(|e| {
                warn!(slug = %slug, error = %e, "CMS product fetch failed");
                ServiceError::ExternalServiceError(format!("CMS request failed: {}", e))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response.error_for_status().map_err(|e| {
            ServiceError::ExternalServiceError(format!("CMS returned an error: {}", e))
        })?;

        let product = response.json::<Product>().await.map_err(|e| {
            warn!(slug = %slug, error = %e, "CMS product payload failed to decode");
            ServiceError::ExternalServiceError(format!("CMS payload decode failed: {}", e))
        })?;

        Ok(Some(product))
    }

    /// Fetches the full product listing.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        let response = self
            .get("/products")
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "CMS product listing failed");
                ServiceError::ExternalServiceError(format!("CMS request failed: {}", e))
            })?
            .error_for_status()
            .map_err(|e| {
                ServiceError::ExternalServiceError(format!("CMS returned an error: {}", e))
            })?;

        response.json::<Vec<Product>>().await.map_err(|e| {
            ServiceError::ExternalServiceError(format!("CMS payload decode failed: {}", e))
        })
    }

    /// Fetches a filtered listing by product id.
    #[instrument(skip(self))]
    pub async fn get_products(&self, ids: &[String]) -> Result<Vec<Product>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .get("/products")
            .query(&[("ids", ids.join(","))])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "CMS filtered product fetch failed");
                ServiceError::ExternalServiceError(format!("CMS request failed: {}", e))
            })?
            .error_for_status()
            .map_err(|e| {
                ServiceError::ExternalServiceError(format!("CMS returned an error: {}", e))
            })?;

        response.json::<Vec<Product>>().await.map_err(|e| {
            ServiceError::ExternalServiceError(format!("CMS payload decode failed: {}", e))
        })
    }
}
