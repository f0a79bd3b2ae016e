use std::time::Duration;

use async_trait::async_trait;
use roundup_core::{CatalogClient, CatalogResponse, FeedPage, Locale, RequestParams, Result, Stats};

pub const DEFAULT_API_BASE: &str = "https://roundup-briefs.onrender.com";

const CATALOG_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest-backed catalog client. Both endpoints are read-only GETs;
/// decoding goes through the response-shape shim in `roundup_core`.
pub struct HttpCatalog {
    base: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(CATALOG_TIMEOUT)
            .build()?;
        Ok(Self {
            base: base.into(),
            client,
        })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalog {
    async fn fetch_articles(&self, params: &RequestParams) -> Result<FeedPage> {
        let response = self
            .client
            .get(format!("{}/api/articles", self.base))
            .query(params.pairs())
            .send()
            .await?
            .error_for_status()?;
        let decoded: CatalogResponse = response.json().await?;
        Ok(decoded.into_page())
    }

    async fn fetch_stats(&self, locale: Locale) -> Result<Stats> {
        let stats = self
            .client
            .get(format!("{}/api/stats", self.base))
            .query(&[("locale", locale.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(stats)
    }
}
