// Formatting helpers shared by the metrics documents

pub mod formatters;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_epoch_secs, format_size, format_timestamp, now_timestamp};
