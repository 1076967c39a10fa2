//! Single-shot ICMP latency probe.
//!
//! Raw ICMP sockets need elevated privileges, so the probe runs the system
//! `ping` binary once and reads the round-trip time from its output.

use std::process::Stdio;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;

use crate::ui::formatters::round_to;

pub const DEFAULT_PROBE_HOST: &str = "google.com";
pub const UNREACHABLE: &str = "Hostname unreachable!";

static RTT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"time\s*[=<]\s*([0-9]+(?:[.,][0-9]+)?)\s*ms").expect("valid RTT regex")
});

#[derive(Debug, Clone)]
pub struct PingProbe {
    timeout: Duration,
}

impl PingProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Round-trip time to `host` in milliseconds, or `None` if it did not answer.
    pub async fn probe(&self, host: &str) -> Option<f64> {
        if !is_probe_target(host) {
            log::warn!("Rejected latency probe target {:?}", host);
            return None;
        }

        let ping = match which::which("ping") {
            Ok(path) => path,
            Err(e) => {
                log::warn!("ping binary not available: {}", e);
                return None;
            }
        };

        let mut cmd = Command::new(ping);
        cmd.args(ping_args(host, self.timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        // ping enforces its own deadline; the outer one covers DNS stalls
        let deadline = self.timeout + Duration::from_secs(1);
        let output = match tokio::time::timeout(deadline, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                log::warn!("Failed to run ping for {}: {}", host, e);
                return None;
            }
            Err(_) => {
                log::debug!("Latency probe to {} timed out", host);
                return None;
            }
        };

        if !output.status.success() {
            log::debug!("ping {} exited with {}", host, output.status);
            return None;
        }

        parse_ping_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Hostnames or IP literals only; anything that could be read as a flag is refused.
fn is_probe_target(host: &str) -> bool {
    !host.is_empty()
        && !host.starts_with('-')
        && host.len() <= 253
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '_'))
}

#[cfg(target_os = "windows")]
fn ping_args(host: &str, timeout: Duration) -> Vec<String> {
    vec![
        "-n".into(),
        "1".into(),
        "-w".into(),
        timeout.as_millis().to_string(),
        host.into(),
    ]
}

#[cfg(target_os = "macos")]
fn ping_args(host: &str, timeout: Duration) -> Vec<String> {
    vec![
        "-c".into(),
        "1".into(),
        "-t".into(),
        timeout.as_secs().max(1).to_string(),
        host.into(),
    ]
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn ping_args(host: &str, timeout: Duration) -> Vec<String> {
    vec![
        "-c".into(),
        "1".into(),
        "-W".into(),
        timeout.as_secs().max(1).to_string(),
        host.into(),
    ]
}

/// Extract the first round-trip time (ms) from ping's output.
pub fn parse_ping_output(output: &str) -> Option<f64> {
    let caps = RTT_PATTERN.captures(output)?;
    caps[1].replace(',', ".").parse().ok()
}

/// Render a probe result the way `/network_info` reports it.
pub fn format_latency(rtt_ms: Option<f64>) -> String {
    match rtt_ms {
        Some(ms) => format!("{:.2}ms", round_to(ms, 2)),
        None => UNREACHABLE.to_string(),
    }
}
