use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use hostmetrics::core::config::LogRegistry;
use hostmetrics::core::host_metrics::{CpuSampler, PingProbe};
use hostmetrics::server::{create_router, AppState};

fn app(registry: LogRegistry) -> Router {
    create_router(AppState::new(
        registry,
        CpuSampler::new(),
        PingProbe::new(Duration::from_secs(1)),
    ))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "{}", content_type);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn keys(value: &Value) -> BTreeSet<String> {
    value.as_object().unwrap().keys().cloned().collect()
}

fn assert_has_keys(value: &Value, expected: &[&str]) {
    let actual = keys(value);
    for key in expected {
        assert!(actual.contains(*key), "missing key {} in {:?}", key, actual);
    }
}

#[tokio::test]
async fn test_cpu_info() {
    let (status, body) = get_json(app(LogRegistry::default()), "/cpu_info").await;

    assert_eq!(status, StatusCode::OK);
    assert_has_keys(
        &body,
        &["host", "timestamp", "cpu_count", "avg_cpu_load", "cpu_load_per_core", "last_boot"],
    );
    let cores = body["cpu_load_per_core"].as_array().unwrap();
    assert_eq!(cores.len() as u64, body["cpu_count"].as_u64().unwrap());
}

#[tokio::test]
async fn test_mem_info() {
    let (status, body) = get_json(app(LogRegistry::default()), "/mem_info").await;

    assert_eq!(status, StatusCode::OK);
    assert_has_keys(
        &body,
        &[
            "timestamp",
            "current_memory_used",
            "current_memory_free",
            "memory_usage_percent",
            "total_available_memory",
        ],
    );
    assert!(body["total_available_memory"].as_str().unwrap().ends_with('B'));
    assert!(body["memory_usage_percent"].is_number());
}

#[tokio::test]
async fn test_disk_info() {
    let (status, body) = get_json(app(LogRegistry::default()), "/disk_info").await;

    assert_eq!(status, StatusCode::OK);
    assert_has_keys(
        &body,
        &[
            "timestamp",
            "total_disk_usage",
            "used_disk_usage",
            "free_disk_usage",
            "percent_disk_usage",
            "disk_num_reads",
            "disk_num_writes",
            "disk_read_bytes",
            "disk_write_bytes",
            "disk_partitions",
            "disk_statistics",
        ],
    );
    for partition in body["disk_partitions"].as_array().unwrap() {
        assert_has_keys(partition, &["device", "mount_point"]);
    }
    for stats in body["disk_statistics"].as_array().unwrap() {
        assert_has_keys(stats, &["device", "read_count", "write_count", "bytes_read", "bytes_written"]);
    }
}

#[tokio::test]
async fn test_network_info_unreachable_host() {
    let (status, body) = get_json(
        app(LogRegistry::default()),
        "/network_info?hostname=nonexistent.invalid",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["avg_latency"], "Hostname unreachable!");
    assert_has_keys(&body, &["timestamp", "nic_data", "net_connections", "connected_users"]);

    for nic in body["nic_data"].as_array().unwrap() {
        assert_has_keys(nic, &["interface", "address", "bytes_sent", "bytes_recv"]);
    }
    for conn in body["net_connections"].as_array().unwrap() {
        assert_has_keys(conn, &["ip", "port", "status"]);
    }
    for user in body["connected_users"].as_array().unwrap() {
        assert_has_keys(user, &["username", "terminal", "host", "start_time"]);
    }
}

#[tokio::test]
async fn test_network_info_loopback_latency() {
    let (status, body) =
        get_json(app(LogRegistry::default()), "/network_info?hostname=127.0.0.1").await;

    assert_eq!(status, StatusCode::OK);
    let latency = body["avg_latency"].as_str().unwrap();
    let pattern = Regex::new(r"^\d+\.\d{2}ms$").unwrap();

    if which::which("ping").is_err() {
        assert_eq!(latency, "Hostname unreachable!");
    } else {
        // ping may lack the privileges for ICMP inside a sandbox
        assert!(
            pattern.is_match(latency) || latency == "Hostname unreachable!",
            "{}",
            latency
        );
    }
}

#[tokio::test]
async fn test_network_info_rejects_flag_like_hostname() {
    let (_, body) = get_json(app(LogRegistry::default()), "/network_info?hostname=-c").await;
    assert_eq!(body["avg_latency"], "Hostname unreachable!");
}

#[tokio::test]
async fn test_process_info_sorted_and_truncated() {
    let (status, body) = get_json(app(LogRegistry::default()), "/process_info?length=3").await;

    assert_eq!(status, StatusCode::OK);
    let list = body["process_list"].as_array().unwrap();
    assert!(!list.is_empty());
    assert!(list.len() <= 3);

    let cpu_times: Vec<f64> = list.iter().map(|p| p["cpu_time"].as_f64().unwrap()).collect();
    assert!(cpu_times.windows(2).all(|w| w[0] >= w[1]), "{:?}", cpu_times);

    for process in list {
        assert_has_keys(process, &["pid", "name", "username", "status", "vms", "cpu_time"]);
    }
}

#[tokio::test]
async fn test_process_info_malformed_length_uses_default() {
    let (status, body) = get_json(app(LogRegistry::default()), "/process_info?length=abc").await;

    assert_eq!(status, StatusCode::OK);
    let list = body["process_list"].as_array().unwrap();
    assert!(!list.is_empty());
    assert!(list.len() <= 10);
}

#[tokio::test]
async fn test_logs_info_tails_each_configured_file() {
    let temp_dir = TempDir::new().unwrap();
    let app_log = temp_dir.path().join("app.log");
    let db_log = temp_dir.path().join("db.log");
    fs::write(&app_log, (1..=20).map(|i| format!("L{}\n", i)).collect::<String>()).unwrap();
    fs::write(&db_log, "only line\n").unwrap();

    let registry = LogRegistry::from_ini(&format!(
        "[Logs]\napp = {}\ndb = {}\n",
        app_log.display(),
        db_log.display()
    ))
    .unwrap();

    let (status, body) = get_json(app(registry), "/logs_info?length=5").await;

    assert_eq!(status, StatusCode::OK);
    let logs = body["config_paths"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["log_name"], app_log.to_string_lossy().as_ref());
    assert_eq!(logs[0]["log_key"], "app");
    assert_eq!(
        logs[0]["log"],
        serde_json::json!(["L20", "L19", "L18", "L17", "L16"])
    );
    assert_eq!(logs[1]["log_name"], db_log.to_string_lossy().as_ref());
    assert_eq!(logs[1]["log_key"], "db");
    assert_eq!(logs[1]["log"], serde_json::json!(["only line"]));
}

#[tokio::test]
async fn test_logs_info_default_length() {
    let temp_dir = TempDir::new().unwrap();
    let log = temp_dir.path().join("app.log");
    fs::write(&log, (1..=30).map(|i| format!("L{}\n", i)).collect::<String>()).unwrap();
    let registry = LogRegistry::from_ini(&format!("[Logs]\napp = {}\n", log.display())).unwrap();

    let (_, body) = get_json(app(registry), "/logs_info").await;
    assert_eq!(body["config_paths"][0]["log"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_logs_info_missing_file_is_server_error() {
    let temp_dir = TempDir::new().unwrap();
    let registry = LogRegistry::from_ini(&format!(
        "[Logs]\ngone = {}\n",
        temp_dir.path().join("gone.log").display()
    ))
    .unwrap();

    let (status, body) = get_json(app(registry), "/logs_info").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("gone.log"));
}

#[tokio::test]
async fn test_logs_info_skips_undecodable_log() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("good.log");
    let bad = temp_dir.path().join("bad.log");
    fs::write(&good, "fine\n").unwrap();
    fs::write(&bad, b"\xff\xfe\xfd\n").unwrap();

    let registry = LogRegistry::from_ini(&format!(
        "[Logs]\nbad = {}\ngood = {}\n",
        bad.display(),
        good.display()
    ))
    .unwrap();

    let (status, body) = get_json(app(registry), "/logs_info").await;

    assert_eq!(status, StatusCode::OK);
    let logs = body["config_paths"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["log_name"], good.to_string_lossy().as_ref());
    assert_eq!(logs[0]["log_key"], "good");
}

#[tokio::test]
async fn test_repeated_calls_keep_the_same_shape() {
    let app = app(LogRegistry::default());

    for uri in ["/cpu_info", "/mem_info", "/disk_info", "/process_info"] {
        let (_, first) = get_json(app.clone(), uri).await;
        let (_, second) = get_json(app.clone(), uri).await;
        assert_eq!(keys(&first), keys(&second), "{}", uri);
    }
}

#[tokio::test]
async fn test_concurrent_requests_to_different_endpoints() {
    let app = app(LogRegistry::default());

    let (cpu, mem, disk, procs, cpu_again) = tokio::join!(
        get_json(app.clone(), "/cpu_info"),
        get_json(app.clone(), "/mem_info"),
        get_json(app.clone(), "/disk_info"),
        get_json(app.clone(), "/process_info?length=2"),
        get_json(app.clone(), "/cpu_info"),
    );

    for (status, _) in [&cpu, &mem, &disk, &procs, &cpu_again] {
        assert_eq!(*status, StatusCode::OK);
    }
    assert!(cpu.1.get("cpu_count").is_some());
    assert!(mem.1.get("current_memory_used").is_some());
    assert!(disk.1.get("disk_partitions").is_some());
    assert!(procs.1["process_list"].as_array().unwrap().len() <= 2);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = app(LogRegistry::default())
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
