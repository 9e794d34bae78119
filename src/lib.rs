pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod github;
pub mod loc;
pub mod source;
pub mod timeline;

// Re-export commonly used items
pub use cache::TtlCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Result, TimelineError};
pub use source::{HttpSource, RepoSource};
pub use timeline::{TimelineData, TimelineLoader};
