//! Domain entities for the buffered stream.
//!
//! A stream owns exactly two caches: bytes fetched ahead of the caller
//! (`ReadCache`) and bytes accepted from the caller but not yet sent to the
//! channel (`WriteCache`). At most one of them holds data at any time, which
//! `CacheState` makes explicit.

mod read_cache;
mod write_cache;
mod cache_state;

pub use read_cache::ReadCache;
pub use write_cache::WriteCache;
pub use cache_state::CacheState;
