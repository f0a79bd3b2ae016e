use std::time::Duration;

use async_trait::async_trait;
use roundup_core::{Error, Result};
use url::Url;

/// Content-extraction proxy prefix; the proxied page comes back as plain
/// HTML-like text.
pub const READER_PREFIX: &str = "https://r.jina.ai/";

/// Hard timeout per page fetch, the pipeline's only cancellation
/// mechanism.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(8);

/// Pass-through fetch of an article's live page markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, link: &str) -> Result<String>;
}

pub struct ReaderProxy {
    client: reqwest::Client,
    prefix: String,
}

impl ReaderProxy {
    pub fn new() -> Result<Self> {
        Self::with_prefix(READER_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            prefix: prefix.into(),
        })
    }
}

#[async_trait]
impl PageFetcher for ReaderProxy {
    async fn fetch_page(&self, link: &str) -> Result<String> {
        Url::parse(link).map_err(|e| Error::InvalidUrl(format!("{link}: {e}")))?;
        let text = self
            .client
            .get(format!("{}{}", self.prefix, link))
            .header(reqwest::header::ACCEPT, "text/html")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_unparsable_links_before_fetching() {
        let proxy = ReaderProxy::new().unwrap();
        let result = proxy.fetch_page("not a url").await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
