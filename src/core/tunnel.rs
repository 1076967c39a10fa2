//! Optional public exposure through a localtunnel (`lt`) child process.
//!
//! The child prints its assigned public URL on stdout. The URL is handed back
//! through a oneshot channel as soon as it appears; the child keeps running
//! for the lifetime of the server.

use std::process::Stdio;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::oneshot;

use crate::error::{HostMetricsError, Result};

pub const TUNNEL_BINARY: &str = "lt";

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("valid URL regex"));
static SUBDOMAIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w-]+$").expect("valid subdomain regex"));

/// Normalize a requested subdomain; `None` if it is unusable.
pub fn sanitize_subdomain(raw: &str) -> Option<String> {
    let cleaned = raw.trim().replace(['.', ' '], "-");
    if SUBDOMAIN_PATTERN.is_match(&cleaned) {
        Some(cleaned.to_lowercase())
    } else {
        None
    }
}

/// First URL in a line of tunnel output
pub fn find_url(line: &str) -> Option<&str> {
    URL_PATTERN.find(line).map(|m| m.as_str())
}

/// Arguments for `lt`; an unusable subdomain is dropped with a warning.
pub fn tunnel_args(port: u16, subdomain: Option<&str>) -> Vec<String> {
    let mut args = vec!["-p".to_string(), port.to_string()];

    if let Some(raw) = subdomain {
        match sanitize_subdomain(raw) {
            Some(name) => {
                args.push("-s".to_string());
                args.push(name);
            }
            None => log::warn!("Ignoring invalid tunnel subdomain {:?}", raw),
        }
    }

    args
}

/// Start the tunnel for `port`. Resolves to the public URL once `lt` prints it.
///
/// Must be called from inside a Tokio runtime.
pub fn spawn_tunnel(port: u16, subdomain: Option<&str>) -> Result<oneshot::Receiver<String>> {
    let binary = which::which(TUNNEL_BINARY).map_err(|e| {
        HostMetricsError::tunnel(format!(
            "`{}` not found on PATH ({}); install it with `npm install -g localtunnel`",
            TUNNEL_BINARY, e
        ))
    })?;

    let mut child = Command::new(binary)
        .args(tunnel_args(port, subdomain))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            HostMetricsError::tunnel(format!("failed to start {}: {}", TUNNEL_BINARY, e))
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| HostMetricsError::tunnel("tunnel stdout was not captured"))?;

    let (url_tx, url_rx) = oneshot::channel();

    tokio::spawn(async move {
        let mut url_tx = Some(url_tx);
        let mut lines = BufReader::new(stdout).lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    log::debug!("{}: {}", TUNNEL_BINARY, line);
                    if let Some(url) = find_url(&line) {
                        if let Some(tx) = url_tx.take() {
                            let _ = tx.send(url.to_string());
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    log::warn!("Failed to read tunnel output: {}", e);
                    break;
                }
            }
        }

        match child.wait().await {
            Ok(status) => log::warn!("Tunnel process exited with {}", status),
            Err(e) => log::warn!("Failed to wait for tunnel process: {}", e),
        }
    });

    Ok(url_rx)
}
