pub mod bookmark;
pub mod catalog;
pub mod error;
pub mod types;

pub use bookmark::BookmarkStore;
pub use catalog::{CatalogClient, CatalogResponse, FeedPage, RequestParams};
pub use error::Error;
pub use types::{Article, Locale, Stats, TOPICS};

pub type Result<T> = std::result::Result<T, Error>;
