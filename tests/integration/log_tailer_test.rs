use hostmetrics::core::log_tailer::tail_lines;
use hostmetrics::HostMetricsError;
use std::fs;
use std::io::Write;
use std::time::Instant;
use tempfile::TempDir;

fn write_numbered_lines(dir: &TempDir, name: &str, count: usize) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let content: String = (1..=count).map(|i| format!("L{}\n", i)).collect();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_last_five_lines_most_recent_first() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_numbered_lines(&temp_dir, "app.log", 20);

    let lines = tail_lines(&path, 5).unwrap();
    assert_eq!(lines, vec!["L20", "L19", "L18", "L17", "L16"]);
}

#[test]
fn test_request_beyond_file_returns_everything_reversed() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_numbered_lines(&temp_dir, "app.log", 20);

    let lines = tail_lines(&path, 100).unwrap();
    let expected: Vec<String> = (1..=20).rev().map(|i| format!("L{}", i)).collect();
    assert_eq!(lines, expected);
}

#[test]
fn test_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.log");
    fs::write(&path, "").unwrap();

    assert!(tail_lines(&path, 10).unwrap().is_empty());
}

#[test]
fn test_zero_lines_requested() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_numbered_lines(&temp_dir, "app.log", 3);

    assert!(tail_lines(&path, 0).unwrap().is_empty());
}

#[test]
fn test_missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = tail_lines(&temp_dir.path().join("missing.log"), 10).unwrap_err();

    assert!(matches!(err, HostMetricsError::LogRead { .. }));
    assert!(err.to_string().contains("missing.log"));
}

#[test]
fn test_invalid_utf8_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("binary.log");
    fs::write(&path, b"ok\n\xff\xfe broken\n").unwrap();

    let err = tail_lines(&path, 10).unwrap_err();
    assert!(matches!(err, HostMetricsError::InvalidUtf8(_)));
}

#[test]
fn test_multibyte_text_survives_block_boundaries() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("unicode.log");
    let content: String = (0..2000).map(|i| format!("événement {} ✓\n", i)).collect();
    fs::write(&path, content).unwrap();

    let lines = tail_lines(&path, 3).unwrap();
    assert_eq!(lines, vec!["événement 1999 ✓", "événement 1998 ✓", "événement 1997 ✓"]);
}

#[test]
fn test_small_tail_of_large_file_is_fast() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("large.log");
    {
        let mut file = std::io::BufWriter::new(fs::File::create(&path).unwrap());
        let line = "x".repeat(120);
        for i in 0..200_000 {
            writeln!(file, "{:07} {}", i, line).unwrap();
        }
    }

    let start = Instant::now();
    let lines = tail_lines(&path, 10).unwrap();
    let elapsed = start.elapsed();

    assert_eq!(lines.len(), 10);
    assert!(lines[0].starts_with("0199999 "));
    // ~25 MB on disk; a forward scan would take far longer than this
    assert!(elapsed.as_millis() < 200, "tail took {:?}", elapsed);
}
