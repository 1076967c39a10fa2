// hostmetrics library - Public API

// Re-export error types
pub mod error;
pub use error::{HostMetricsError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod server;
pub mod ui;

// Re-export commonly used types
pub use core::config::{LogRegistry, ServerSettings};

// Initialize logging
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();
    if verbose {
        builder.filter_level(level);
    }
    builder.init();
}
