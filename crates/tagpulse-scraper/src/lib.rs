pub mod access;
pub mod browser;
pub mod discovery;
pub mod engagement;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod fake;
pub mod login;
pub mod posts;
pub mod selectors;
pub mod strategy;

pub use access::{settle, wait_for_any, ContentAccess, ElementRef};
pub use browser::{BrowserSession, LaunchOptions};
pub use discovery::{discover_tags, extract_tags};
pub use engagement::EngagementSampler;
pub use error::ScraperError;
pub use login::ensure_session;
pub use posts::{read_post_refs, PostRef};
pub use strategy::{parse_count, ElementCount, LabeledCount, Strategy};
