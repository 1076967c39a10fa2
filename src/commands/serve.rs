//! `hostmetrics` server command.
//!
//! Loads the log registry, primes the CPU sampler and serves the metrics
//! endpoints until Ctrl-C.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::{LogRegistry, ServerSettings, TunnelSettings};
use crate::core::host_metrics::{CpuSampler, PingProbe};
use crate::core::tunnel::spawn_tunnel;
use crate::server::{create_router, AppState};

/// Build settings from parsed command-line arguments
pub fn settings_from_matches(matches: &ArgMatches) -> Result<ServerSettings> {
    let config_path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .context("--config is required")?;

    let mut settings = ServerSettings::new(config_path);

    if let Some(&port) = matches.get_one::<u16>("port") {
        settings.port = port;
    }
    if let Some(&host) = matches.get_one::<IpAddr>("host") {
        settings.host = host;
    }
    if let Some(&secs) = matches.get_one::<u64>("ping-timeout") {
        settings.ping_timeout = Duration::from_secs(secs.max(1));
    }
    if matches.get_flag("tunnel") {
        settings.tunnel = Some(TunnelSettings {
            subdomain: matches.get_one::<String>("subdomain").cloned(),
            url_file: matches.get_one::<PathBuf>("tunnel-url-file").cloned(),
        });
    }

    Ok(settings)
}

/// Execute the server command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let settings = settings_from_matches(matches)?;

    let registry = LogRegistry::load(&settings.config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            settings.config_path.display()
        )
    })?;
    log::info!(
        "Loaded {} log source(s) from {}",
        registry.len(),
        settings.config_path.display()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("hostmetrics-worker")
        .build()
        .context("Failed to start Tokio runtime")?;

    runtime.block_on(run(settings, registry))
}

async fn run(settings: ServerSettings, registry: LogRegistry) -> Result<()> {
    let sampler = CpuSampler::new();
    let probe = PingProbe::new(settings.ping_timeout);
    let app = create_router(AppState::new(registry, sampler, probe));

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!("HTTP server listening on {}", addr);

    if let Some(tunnel) = &settings.tunnel {
        start_tunnel(settings.port, tunnel);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    log::info!("HTTP server stopped");
    Ok(())
}

fn start_tunnel(port: u16, tunnel: &TunnelSettings) {
    let url_rx = match spawn_tunnel(port, tunnel.subdomain.as_deref()) {
        Ok(rx) => rx,
        Err(e) => {
            log::warn!("Continuing without tunnel: {}", e);
            return;
        }
    };

    let url_file = tunnel.url_file.clone();
    tokio::spawn(async move {
        let Ok(url) = url_rx.await else {
            log::warn!("Tunnel exited before reporting a public URL");
            return;
        };
        log::info!("Public URL: {}", url);

        if let Some(path) = url_file {
            if let Err(e) = tokio::fs::write(&path, format!("{}\n", url)).await {
                log::warn!("Failed to write tunnel URL to {}: {}", path.display(), e);
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
