//! Response cache for API fetches
//!
//! Maps an opaque cache key (derived from a request's logical identity) to a
//! timestamped JSON payload in the persistent store. Validity is decided per
//! lookup by the caller's [`CachePolicy`]; reads fail open, so a broken store
//! degrades to cache misses and never blocks data loading.

mod response;

pub use response::{CacheEntry, CachePolicy, ResponseCache};
