use async_trait::async_trait;

use crate::types::Article;
use crate::Result;

/// Consumed contract to the persistent bookmark store, keyed by
/// `(user, article link)`. Upsert-to-save, delete-to-unsave, last write
/// wins on duplicate saves. Exercised by the UI layer.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn save(&self, user: &str, article: &Article) -> Result<()>;

    async fn remove(&self, user: &str, link: &str) -> Result<()>;

    async fn is_saved(&self, user: &str, link: &str) -> Result<bool>;
}
