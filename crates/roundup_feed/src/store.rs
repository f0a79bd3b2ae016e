use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use roundup_core::{Article, CatalogClient, Locale};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::filters::{FilterState, ViewMode};
use crate::pager::Pager;
use crate::query;
use crate::view::{self, FeedView};

/// Rapid keystrokes in the search box coalesce into one query.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// The one message every catalog failure surfaces as.
pub const SERVICE_UNAVAILABLE: &str = "Service unavailable, try again.";

/// What the view layer reads. Published through a watch channel so every
/// consumer sees a consistent versioned snapshot.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub articles: Vec<Article>,
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub is_filtered: bool,
    pub is_grouped: bool,
    pub page: usize,
    pub total_pages: usize,
}

struct Inner {
    filters: FilterState,
    pager: Pager,
    locale: Locale,
}

/// Owns the authoritative filter state and pagination cursor and drives
/// the fetch lifecycle. All mutation goes through the `set_*` entry
/// points; each bumps a generation counter so a fetch issued for an
/// earlier state can never overwrite results from a later one.
pub struct FeedStore {
    catalog: Arc<dyn CatalogClient>,
    inner: Mutex<Inner>,
    generation: AtomicU64,
    search_generation: AtomicU64,
    tx: watch::Sender<FeedSnapshot>,
}

impl FeedStore {
    pub fn new(catalog: Arc<dyn CatalogClient>, locale: Locale) -> Arc<Self> {
        let (tx, _rx) = watch::channel(FeedSnapshot {
            page: 1,
            total_pages: 1,
            is_grouped: true,
            ..FeedSnapshot::default()
        });
        Arc::new(Self {
            catalog,
            inner: Mutex::new(Inner {
                filters: FilterState::default(),
                pager: Pager::default(),
                locale,
            }),
            generation: AtomicU64::new(0),
            search_generation: AtomicU64::new(0),
            tx,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.tx.borrow().clone()
    }

    pub async fn filters(&self) -> FilterState {
        self.inner.lock().await.filters.clone()
    }

    pub async fn locale(&self) -> Locale {
        self.inner.lock().await.locale
    }

    /// The current page partitioned for display.
    pub fn view(&self) -> FeedView {
        let snap = self.snapshot();
        let mode = if snap.is_grouped {
            ViewMode::Grouped
        } else {
            ViewMode::Flat
        };
        view::partition(&snap.articles, mode)
    }

    /// Whole-object filter update. Resets the cursor to page 1, then
    /// refetches.
    pub async fn set_filters(&self, filters: FilterState) {
        {
            let mut inner = self.inner.lock().await;
            inner.filters = filters;
            inner.pager.reset();
        }
        self.refresh().await;
    }

    pub async fn clear_filters(&self) {
        self.set_filters(FilterState::default()).await;
    }

    /// Move the cursor. Out-of-range requests are ignored without a fetch.
    pub async fn set_page(&self, page: usize) {
        {
            let mut inner = self.inner.lock().await;
            if !inner.pager.set_page(page) {
                debug!(page, "page out of range, ignored");
                return;
            }
        }
        self.refresh().await;
    }

    /// A locale switch resets the filter state to default and the cursor
    /// to page 1, regardless of prior state.
    pub async fn set_locale(&self, locale: Locale) {
        {
            let mut inner = self.inner.lock().await;
            inner.locale = locale;
            inner.filters = FilterState::default();
            inner.pager.reset();
        }
        info!(locale = %locale, "locale switched, filters reset");
        self.refresh().await;
    }

    /// Grouped-section overflow activation: narrow to that one topic,
    /// which flips the view to flat and resets the cursor.
    pub async fn expand_topic(&self, topic: &str) {
        let mut filters = self.filters().await;
        filters.topics = vec![topic.to_string()];
        self.set_filters(filters).await;
    }

    /// Debounced free-text search; a later call supersedes an earlier one
    /// that is still waiting out the delay.
    pub fn search_debounced(self: Arc<Self>, text: String) -> tokio::task::JoinHandle<()> {
        let generation = self.search_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let store = self;
        tokio::spawn(async move {
            tokio::time::sleep(SEARCH_DEBOUNCE).await;
            if store.search_generation.load(Ordering::SeqCst) != generation {
                return;
            }
            let mut filters = store.filters().await;
            filters.search = text;
            store.set_filters(filters).await;
        })
    }

    /// Compile the current state and fetch. A response is applied only if
    /// no later trigger has been issued in the meantime; stale responses
    /// are discarded, not aborted.
    pub async fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (params, is_filtered, is_grouped) = {
            let inner = self.inner.lock().await;
            let mode = inner.filters.view_mode();
            (
                query::compile(&inner.filters, inner.locale, &inner.pager, mode),
                inner.filters.is_filtered(),
                mode == ViewMode::Grouped,
            )
        };

        // a later trigger may already have been issued by the time the
        // state lock is released; its snapshot must not be overwritten
        // with a stale loading one
        if self.generation.load(Ordering::SeqCst) == generation {
            self.tx.send_replace(FeedSnapshot {
                loading: true,
                is_filtered,
                is_grouped,
                ..self.snapshot()
            });
        }

        match self.catalog.fetch_articles(&params).await {
            Ok(page) => {
                let mut inner = self.inner.lock().await;
                if self.generation.load(Ordering::SeqCst) != generation {
                    debug!(generation, "stale response discarded");
                    return;
                }
                inner.pager.set_total(page.total);
                debug!(count = page.articles.len(), total = page.total, "feed updated");
                self.tx.send_replace(FeedSnapshot {
                    articles: page.articles,
                    total: page.total,
                    loading: false,
                    error: None,
                    is_filtered,
                    is_grouped,
                    page: inner.pager.page(),
                    total_pages: inner.pager.total_pages(),
                });
            }
            Err(err) => {
                let inner = self.inner.lock().await;
                if self.generation.load(Ordering::SeqCst) != generation {
                    return;
                }
                warn!(error = %err, "catalog fetch failed");
                self.tx.send_replace(FeedSnapshot {
                    articles: Vec::new(),
                    total: 0,
                    loading: false,
                    error: Some(SERVICE_UNAVAILABLE.to_string()),
                    is_filtered,
                    is_grouped,
                    page: inner.pager.page(),
                    total_pages: inner.pager.total_pages(),
                });
            }
        }
    }
}
