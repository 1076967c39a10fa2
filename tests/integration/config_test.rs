use hostmetrics::core::config::LogRegistry;
use hostmetrics::HostMetricsError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_registry_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("hostmetrics.ini");
    fs::write(
        &config_path,
        "[Logs]\nsyslog = /var/log/syslog\nkern = /var/log/kern.log\n",
    )
    .unwrap();

    let registry = LogRegistry::load(&config_path).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.sources()[0].name, "syslog");
    assert_eq!(registry.sources()[1].path, PathBuf::from("/var/log/kern.log"));
}

#[test]
fn test_load_missing_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = LogRegistry::load(&temp_dir.path().join("nope.ini")).unwrap_err();
    assert!(matches!(err, HostMetricsError::Config(_)));
}

#[test]
fn test_load_without_logs_section_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("hostmetrics.ini");
    fs::write(&config_path, "[Server]\nport = 5000\n").unwrap();

    let err = LogRegistry::load(&config_path).unwrap_err();
    assert!(err.to_string().contains("[Logs]"));
}

#[test]
fn test_registry_keeps_file_order() {
    let registry = LogRegistry::from_ini("[Logs]\nzeta = /z\nalpha = /a\nmid = /m\n").unwrap();
    let names: Vec<_> = registry.sources().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}
