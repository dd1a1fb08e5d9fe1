//! End-to-end tests for the `code39-tags` binary.

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

const CATALOG: &str = r#"
[[tag]]
name = "Heritage Cotton Oxford Shirt"
price = 59.99
sku = "RT-482917"
sizes = ["S", "M", "L", "XL"]
color = "White"

[[tag]]
name = "Merino Wool Blazer"
price = 189.99
sku = "RT-194573"

[[tag]]
name = "Performance Running Tee"
price = 34.99
sku = "RT-562839"
"#;

fn bin() -> String {
    std::env::var("CARGO_BIN_EXE_code39-tags").unwrap_or_else(|_| "target/debug/code39-tags".to_string())
}

fn run(args: &[&str]) -> Output {
    Command::new(bin()).args(args).output().expect("Failed to execute command")
}

fn assert_ok(output: &Output) {
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn catalog_file(dir: &TempDir) -> String {
    let path = dir.path().join("catalog.toml");
    fs::write(&path, CATALOG).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_encode_prints_breakdown() {
    let output = run(&["encode", "rt 482917!"]);
    assert_ok(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"RT 482917\""));
    assert!(stdout.contains("*RT 482917*"));
    assert!(stdout.contains("symbols:  11"));
    assert!(stdout.contains("bars:     55"));
}

#[test]
fn test_svg_to_stdout() {
    let output = run(&["svg", "RT-482917", "--width", "200", "--height", "60"]);
    assert_ok(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("<svg width=\"200\" height=\"60\""));
    assert_eq!(stdout.matches("<rect").count(), 55);
}

#[test]
fn test_svg_zero_width_fails() {
    let output = run(&["svg", "RT-482917", "--width", "0"]);
    assert_ne!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("canvas width"));
}

#[test]
fn test_sheet_four_up() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog_file(&dir);
    let out = dir.path().join("sheet.svg");
    let output = run(&["sheet", &catalog, "--layout", "4", "-o", out.to_str().unwrap()]);
    assert_ok(&output);

    let svg = fs::read_to_string(&out).unwrap();
    assert_eq!(svg.matches("class=\"tag\"").count(), 3);
    assert!(svg.contains(">$189.99</text>"));
}

#[test]
fn test_sheet_defaults_to_four_up() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog_file(&dir);
    let output = run(&["sheet", &catalog]);
    assert_ok(&output);

    // 3 cards of 220 + 2 gaps of 16 in a single row
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("<svg width=\"692\" height=\"197\""), "{stdout}");
}

#[test]
fn test_sheet_rejects_bad_layout() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog_file(&dir);
    let output = run(&["sheet", &catalog, "--layout", "3"]);
    assert_ne!(output.status.code(), Some(0));
}

#[test]
fn test_epl_job_with_config() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog_file(&dir);
    let config = dir.path().join("printer.toml");
    fs::write(&config, "darkness = 11\nspeed = 3\nnative_barcode = true\n").unwrap();
    let out = dir.path().join("job.epl");

    let output = run(&[
        "epl",
        &catalog,
        "--config",
        config.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ]);
    assert_ok(&output);

    let job = String::from_utf8(fs::read(&out).unwrap()).unwrap();
    assert_eq!(job.matches("D11\r\n").count(), 3);
    assert_eq!(job.matches("S3\r\n").count(), 3);
    assert_eq!(job.matches("P1\r\n").count(), 3);
    assert!(job.contains(",3,2,5,60,N,\"RT-194573\""));
}

#[test]
fn test_epl_missing_catalog() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("job.epl");
    let output = run(&["epl", "/nonexistent/catalog.toml", "-o", out.to_str().unwrap()]);
    assert_ne!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("loading catalog"));
    assert!(!out.exists());
}

#[test]
fn test_invalid_config_reports_key() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog_file(&dir);
    let config = dir.path().join("printer.toml");
    fs::write(&config, "speed = 12\n").unwrap();
    let output = run(&["sheet", &catalog, "--config", config.to_str().unwrap()]);
    assert_ne!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("speed"));
}
