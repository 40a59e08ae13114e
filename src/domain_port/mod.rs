// store

mod token_blacklist_store;

pub use token_blacklist_store::*;

// repo

mod refresh_version_repo;
mod user_repo;

pub use refresh_version_repo::*;
pub use user_repo::*;
