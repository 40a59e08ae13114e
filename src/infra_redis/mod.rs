mod token_blacklist_store_redis;

pub use token_blacklist_store_redis::*;
