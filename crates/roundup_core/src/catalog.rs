use async_trait::async_trait;
use serde::Deserialize;

use crate::types::{Article, Locale, Stats};
use crate::Result;

/// Ordered query parameters for a catalog request, as produced by the
/// query compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// One page of catalog results with the server-reported total.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    pub articles: Vec<Article>,
    pub total: u64,
}

/// Transitional wire shape: the catalog returns either a bare article list
/// or an `{articles, total}` envelope. Normalized here, at the boundary;
/// neither shape leaks further in.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogResponse {
    Envelope { articles: Vec<Article>, total: u64 },
    Bare(Vec<Article>),
}

impl CatalogResponse {
    pub fn into_page(self) -> FeedPage {
        match self {
            CatalogResponse::Envelope { articles, total } => FeedPage { articles, total },
            CatalogResponse::Bare(articles) => {
                let total = articles.len() as u64;
                FeedPage { articles, total }
            }
        }
    }
}

/// Narrow read-only contract to the remote catalog service.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one page of articles for the compiled parameters.
    async fn fetch_articles(&self, params: &RequestParams) -> Result<FeedPage>;

    /// Fetch aggregate counts and the last-refresh timestamp.
    async fn fetch_stats(&self, locale: Locale) -> Result<Stats>;
}
