mod token_blacklist_store_memory;
mod user_repo_memory;

pub use token_blacklist_store_memory::*;
pub use user_repo_memory::*;
