mod cache;

pub use self::cache::{CacheStoreTrait, DynCacheStore};
