pub mod cache;
pub mod extract;
pub mod fetch;
pub mod scheduler;

pub use cache::ImageCache;
pub use extract::extract_preview_image;
pub use fetch::{PageFetcher, ReaderProxy, FETCH_TIMEOUT, READER_PREFIX};
pub use scheduler::{EnrichmentScheduler, MAX_CONCURRENT};
