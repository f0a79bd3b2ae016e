pub mod filters;
pub mod http;
pub mod pager;
pub mod query;
pub mod session;
pub mod store;
pub mod view;

pub use filters::{FilterState, PaywallMode, TimeRange, ViewMode};
pub use http::HttpCatalog;
pub use pager::{Pager, PAGE_SIZE};
pub use session::{AuthState, SessionGate, User};
pub use store::{FeedSnapshot, FeedStore, SERVICE_UNAVAILABLE};
pub use view::{partition, FeedView, Section, SECTION_PREVIEW};

pub mod prelude {
    pub use crate::filters::{FilterState, ViewMode};
    pub use crate::store::{FeedSnapshot, FeedStore};
    pub use roundup_core::{Article, Error, Result};
}
