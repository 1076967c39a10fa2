use chrono::{DateTime, Local, TimeZone};

const SIZE_UNITS: [&str; 6] = ["", "K", "M", "G", "T", "P"];

/// Format a byte count with binary prefixes and two decimals (e.g. `1.50KB`).
///
/// Division stops at the `P` tier, so anything past 1024 PB is still
/// reported in PB with a magnitude above 1024.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2}{}B", value, SIZE_UNITS[unit])
}

/// Format a request timestamp (YYYY-MM-DD HH:MM:SS.ffffff, local time)
pub fn format_timestamp(time: DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Format the current local time as a request timestamp
pub fn now_timestamp() -> String {
    format_timestamp(Local::now())
}

/// Format seconds since the Unix epoch as local `YYYY-MM-DD HH:MM:SS`.
pub fn format_epoch_secs(secs: u64) -> String {
    match Local.timestamp_opt(secs as i64, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::new(),
    }
}

/// Round to a fixed number of decimals (percentages, latencies)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
