//! Settings are read once at startup from a TOML file.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
