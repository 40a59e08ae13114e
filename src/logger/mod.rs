//! Process-wide tracing setup plus the macros the rest of the crate logs with.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, info_span, trace, warn};
