use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use futures::join;
use roundup_core::{CatalogClient, Locale, Result};
use roundup_enrich::{EnrichmentScheduler, ImageCache, ReaderProxy};
use roundup_feed::filters::{FilterState, PaywallMode, TimeRange};
use roundup_feed::http::{HttpCatalog, DEFAULT_API_BASE};
use roundup_feed::store::FeedStore;
use roundup_feed::view::FeedView;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Personalized news-feed client", long_about = None)]
struct Cli {
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    #[arg(long, default_value = "en", help = "Feed locale (en, de)")]
    locale: String,

    /// Topic filter, repeatable (OR semantics)
    #[arg(long)]
    topic: Vec<String>,

    /// Source filter, repeatable (OR semantics)
    #[arg(long)]
    source: Vec<String>,

    #[arg(long, default_value = "")]
    search: String,

    /// Only articles from today
    #[arg(long, conflicts_with_all = ["from", "to"])]
    today: bool,

    #[arg(long, help = "Start of an explicit date range (YYYY-MM-DD)")]
    from: Option<NaiveDate>,

    #[arg(long, help = "End of an explicit date range (YYYY-MM-DD)")]
    to: Option<NaiveDate>,

    #[arg(long, conflicts_with = "paywalled_only")]
    free_only: bool,

    #[arg(long)]
    paywalled_only: bool,

    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Fetch preview images for the current page
    #[arg(long)]
    images: bool,

    #[arg(long, default_value = "roundup_og_images.json")]
    cache_file: PathBuf,

    /// Emit the partitioned view as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn filters(&self) -> FilterState {
        let mut filters = FilterState::default();
        filters.topics = self.topic.clone();
        filters.sources = self.source.clone();
        filters.search = self.search.clone();
        if self.today {
            filters.set_time_range(Some(TimeRange::Today));
        }
        if self.from.is_some() {
            filters.set_date_from(self.from);
        }
        if self.to.is_some() {
            filters.set_date_to(self.to);
        }
        if self.free_only {
            filters.paywall = PaywallMode::FreeOnly;
        } else if self.paywalled_only {
            filters.paywall = PaywallMode::PaywalledOnly;
        }
        filters
    }
}

fn print_view(view: &FeedView, snapshot: &roundup_feed::store::FeedSnapshot) {
    match view {
        FeedView::Grouped(sections) => {
            for section in sections {
                println!("\n== {} ({}) ==", section.topic, section.total_matches);
                for article in &section.articles {
                    println!("  {} - {}", article.source, article.title);
                }
                if section.overflow {
                    println!(
                        "  + {} more (run with --topic \"{}\")",
                        section.total_matches - section.articles.len(),
                        section.topic
                    );
                }
            }
        }
        FeedView::Flat(articles) => {
            for article in articles {
                let marker = if article.is_paywalled { " [paywalled]" } else { "" };
                println!("  {} - {}{}", article.source, article.title, marker);
            }
            println!(
                "\npage {}/{} ({} articles total)",
                snapshot.page, snapshot.total_pages, snapshot.total
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let locale: Locale = cli.locale.parse()?;

    let catalog = Arc::new(HttpCatalog::new(&cli.api_base)?);
    let store = FeedStore::new(catalog.clone(), locale);

    let filters = cli.filters();
    let (_, stats) = join!(store.set_filters(filters), catalog.fetch_stats(locale));
    if let Ok(stats) = stats {
        info!(total = stats.total, "🗞️ catalog reachable");
    }

    if cli.page > 1 {
        store.set_page(cli.page).await;
    }

    let snapshot = store.snapshot();
    if let Some(message) = &snapshot.error {
        eprintln!("{message}");
        return Ok(());
    }
    if snapshot.articles.is_empty() {
        println!("No articles match your filters.");
        if snapshot.is_filtered {
            println!("Run again without filter flags to see everything.");
        }
        return Ok(());
    }

    let view = store.view();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view, &snapshot);
    }

    if cli.images {
        if let Some(parent) = cli.cache_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let cache = Arc::new(ImageCache::load(&cli.cache_file));
        let fetcher = Arc::new(ReaderProxy::new()?);
        let scheduler = EnrichmentScheduler::new(cache.clone(), fetcher);

        let links: Vec<String> = snapshot.articles.iter().map(|a| a.link.clone()).collect();
        info!(count = links.len(), "🖼️ enriching preview images");
        scheduler.enqueue(&links).await;
        scheduler.drain().await;

        let found = links.iter().filter(|l| cache.has(l)).count();
        println!("\npreview images: {found}/{} cached", links.len());
    }

    Ok(())
}
