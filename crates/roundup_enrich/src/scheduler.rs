use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::ImageCache;
use crate::extract::extract_preview_image;
use crate::fetch::PageFetcher;

/// At most this many preview fetches in flight at once.
pub const MAX_CONCURRENT: usize = 4;

/// Fills gaps in the image cache for the currently visible links. Each
/// worker fetches one article page and writes its preview image into the
/// cache as it arrives. A link is attempted at most once per session;
/// failures are silent misses.
pub struct EnrichmentScheduler {
    cache: Arc<ImageCache>,
    fetcher: Arc<dyn PageFetcher>,
    semaphore: Arc<Semaphore>,
    attempted: Mutex<HashSet<String>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl EnrichmentScheduler {
    pub fn new(cache: Arc<ImageCache>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_concurrency(cache, fetcher, MAX_CONCURRENT)
    }

    pub fn with_concurrency(
        cache: Arc<ImageCache>,
        fetcher: Arc<dyn PageFetcher>,
        limit: usize,
    ) -> Self {
        Self {
            cache,
            fetcher,
            semaphore: Arc::new(Semaphore::new(limit)),
            attempted: Mutex::new(HashSet::new()),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Queue every visible link that is neither cached nor already
    /// attempted. Safe to call again when the visible set changes:
    /// in-flight fetches keep running, their results stay valid whatever
    /// the current view is.
    pub async fn enqueue(&self, links: &[String]) {
        for link in links {
            if link.is_empty() || self.cache.has(link) {
                continue;
            }
            {
                let mut attempted = self.attempted.lock().await;
                if !attempted.insert(link.clone()) {
                    continue;
                }
            }

            let cache = Arc::clone(&self.cache);
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&self.semaphore);
            let link = link.clone();
            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };
                match fetcher.fetch_page(&link).await {
                    Ok(html) => match extract_preview_image(&html) {
                        Some(image) => cache.put(link, image),
                        None => debug!(%link, "no preview image tag found"),
                    },
                    // timeout, transport error: the link stays uncached
                    Err(err) => debug!(%link, error = %err, "preview fetch failed"),
                }
            });
            self.tasks.lock().await.push(handle);
        }
    }

    /// Await every outstanding fetch. Used by the CLI before printing and
    /// by tests.
    pub async fn drain(&self) {
        loop {
            let batch: Vec<JoinHandle<()>> = {
                let mut tasks = self.tasks.lock().await;
                tasks.drain(..).collect()
            };
            if batch.is_empty() {
                return;
            }
            for handle in batch {
                let _ = handle.await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use roundup_core::{Error, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Tracks how many fetches run at once and how often each link is hit.
    struct CountingFetcher {
        active: AtomicUsize,
        peak: AtomicUsize,
        calls: std::sync::Mutex<Vec<String>>,
        fail: bool,
    }

    impl CountingFetcher {
        fn new(fail: bool) -> Self {
            Self {
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                calls: std::sync::Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl PageFetcher for CountingFetcher {
        async fn fetch_page(&self, link: &str) -> Result<String> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.lock().unwrap().push(link.to_string());
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            if self.fail {
                Err(Error::Catalog("proxy down".to_string()))
            } else {
                Ok(format!(
                    r#"<meta property="og:image" content="https://img.e.com/{}.jpg">"#,
                    link.rsplit('/').next().unwrap_or("x")
                ))
            }
        }
    }

    fn links(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://e.com/{i}")).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn never_more_than_cap_in_flight_and_each_attempted_once() {
        let cache = Arc::new(ImageCache::in_memory());
        let fetcher = Arc::new(CountingFetcher::new(false));
        let scheduler = EnrichmentScheduler::new(cache.clone(), fetcher.clone());

        scheduler.enqueue(&links(10)).await;
        scheduler.drain().await;

        assert!(fetcher.peak.load(Ordering::SeqCst) <= MAX_CONCURRENT);
        let calls = fetcher.calls.lock().unwrap();
        assert_eq!(calls.len(), 10);
        let unique: HashSet<&String> = calls.iter().collect();
        assert_eq!(unique.len(), 10);
        assert_eq!(cache.len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_silent_and_never_retried() {
        let cache = Arc::new(ImageCache::in_memory());
        let fetcher = Arc::new(CountingFetcher::new(true));
        let scheduler = EnrichmentScheduler::new(cache.clone(), fetcher.clone());

        scheduler.enqueue(&links(3)).await;
        scheduler.drain().await;
        assert!(cache.is_empty());

        // the same visible set comes around again
        scheduler.enqueue(&links(3)).await;
        scheduler.drain().await;
        assert_eq!(fetcher.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cached_and_inflight_links_are_skipped() {
        let cache = Arc::new(ImageCache::in_memory());
        cache.put("https://e.com/0", "https://img.e.com/0.jpg");
        let fetcher = Arc::new(CountingFetcher::new(false));
        let scheduler = EnrichmentScheduler::new(cache.clone(), fetcher.clone());

        scheduler.enqueue(&links(5)).await;
        // re-enqueue while the first batch is still in flight
        scheduler.enqueue(&links(5)).await;
        scheduler.drain().await;

        let calls = fetcher.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert!(!calls.contains(&"https://e.com/0".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_links_are_ignored() {
        let cache = Arc::new(ImageCache::in_memory());
        let fetcher = Arc::new(CountingFetcher::new(false));
        let scheduler = EnrichmentScheduler::new(cache.clone(), fetcher.clone());
        scheduler.enqueue(&[String::new()]).await;
        scheduler.drain().await;
        assert!(fetcher.calls.lock().unwrap().is_empty());
    }
}
