/*!
 * Common test utilities for the trimsubs test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Routes library logs to the test harness; `RUST_LOG=debug` shows them
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates an Avisynth script whose last line keeps frames 0-23 and 48-71
pub fn create_test_script(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"LoadPlugin("ffms2.dll")
FFVideoSource("movie.mkv")
#Trim(0,10)
Trim(0,23)++Trim(48,71)
"#;
    create_test_file(dir, filename, content)
}

/// Creates a sample SRT file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:00,500 --> 00:00:00,800
Inside the first Trim.

2
00:00:01,200 --> 00:00:01,600
Only in the removed part.

3
00:00:02,200 --> 00:00:02,500
Inside the second Trim.
"#;
    create_test_file(dir, filename, content)
}

/// Asserts two millisecond values are within a microsecond
pub fn assert_ms_eq(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {} ms, got {} ms",
        expected,
        actual
    );
}
