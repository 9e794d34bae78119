// Cache module.
// Holds the most recent aggregation result per key for a bounded time.

pub mod store;

pub use store::{CacheEntry, DEFAULT_TTL, TtlCache};
