use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::core::host_metrics::{
    collect_cpu_info, collect_disk_info, collect_logs_info, collect_mem_info,
    collect_network_info, collect_process_info, format_latency, CpuInfo, DiskInfo, LogsInfo,
    MemInfo, NetworkInfo, ProcessInfo, DEFAULT_PROBE_HOST,
};
use crate::error::{HostMetricsError, Result};

/// Rows per process listing and lines per log when `length` is absent
pub const DEFAULT_LENGTH: usize = 10;

#[derive(Debug, Deserialize)]
pub struct LengthQuery {
    pub length: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HostnameQuery {
    pub hostname: Option<String>,
}

/// Interpret the `length` query parameter. Missing, empty or malformed values
/// fall back to [`DEFAULT_LENGTH`].
pub fn parse_length(raw: Option<&str>) -> usize {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_LENGTH;
    };

    match raw.parse::<usize>() {
        Ok(length) => length,
        Err(_) => {
            log::warn!(
                "Invalid length parameter {:?}, using default of {}",
                raw,
                DEFAULT_LENGTH
            );
            DEFAULT_LENGTH
        }
    }
}

/// Run a sysinfo/filesystem read off the async workers.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        HostMetricsError::metric_collection(format!("collector task failed: {}", e))
    })
}

pub async fn cpu_info(State(state): State<AppState>) -> Result<Json<CpuInfo>> {
    let sampler = state.sampler.clone();
    let info = blocking(move || collect_cpu_info(&sampler)).await?;
    Ok(Json(info))
}

pub async fn mem_info() -> Result<Json<MemInfo>> {
    Ok(Json(blocking(collect_mem_info).await?))
}

pub async fn disk_info() -> Result<Json<DiskInfo>> {
    Ok(Json(blocking(collect_disk_info).await?))
}

pub async fn network_info(
    State(state): State<AppState>,
    Query(query): Query<HostnameQuery>,
) -> Result<Json<NetworkInfo>> {
    let hostname = query
        .hostname
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| DEFAULT_PROBE_HOST.to_string());

    let (rtt, info) = tokio::join!(state.probe.probe(&hostname), blocking(collect_network_info));

    let mut info = info?;
    info.avg_latency = format_latency(rtt);
    Ok(Json(info))
}

pub async fn process_info(Query(query): Query<LengthQuery>) -> Result<Json<ProcessInfo>> {
    let length = parse_length(query.length.as_deref());
    let info = blocking(move || collect_process_info(length)).await?;
    Ok(Json(info))
}

pub async fn logs_info(
    State(state): State<AppState>,
    Query(query): Query<LengthQuery>,
) -> Result<Json<LogsInfo>> {
    let length = parse_length(query.length.as_deref());
    let registry = state.registry.clone();
    let info = blocking(move || collect_logs_info(&registry, length)).await??;
    Ok(Json(info))
}
