// Core business logic module

pub mod config;
pub mod host_metrics;
pub mod log_tailer;
pub mod tunnel;

// Re-export commonly used items
pub use config::{LogRegistry, LogSource, ServerSettings, TunnelSettings};
pub use host_metrics::{CpuSampler, PingProbe};
pub use log_tailer::{tail_lines, TailReader};
