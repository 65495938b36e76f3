pub mod artifacts;
pub mod cache;
pub mod catalog;
pub mod redis;
pub mod similarity;

pub use artifacts::load_artifacts;
pub use cache::{CacheKey, CacheStore, MemoryCache};
pub use catalog::Catalog;
pub use self::redis::{create_redis_client, CacheWriterHandle, RedisCache};
pub use similarity::SimilarityIndex;
