//! See `bin/logger_demo.rs` for a binary that exercises filter and format
//! reloading.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
