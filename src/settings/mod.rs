//! See `bin/settings_demo.rs` for a binary that loads and prints settings.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
