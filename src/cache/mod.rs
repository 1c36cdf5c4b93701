//! Caching utilities: LRU cache, memoized dispatch, and the null-block pool.

mod lru;
mod memoize;
mod nan_pool;

pub use lru::LruCache;
pub use memoize::{MemoizingDispatcher, MEMOIZER_CAPACITY};
pub use nan_pool::NanBlockPool;
