mod common;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct PixelBox {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct FractionBox {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct StepTiming {
    name: String,
    time_ms: u64,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct LocateResponse<B> {
    count: usize,
    space: String,
    boxes: Vec<B>,
    crop_offset: u32,
    original_width: u32,
    original_height: u32,
    cropped_width: u32,
    cropped_height: u32,
    total_time_ms: u64,
    steps: Vec<StepTiming>,
    glyph_files: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_digit-locator"))
        .args(args)
        .args(["--log-level", "error"])
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run digit-locator")
}

fn write_fixture(dir: &Path, name: &str, img: &image::RgbImage) -> String {
    let path = dir.join(name);
    img.save(&path).expect("Failed to write fixture");
    path.to_string_lossy().into_owned()
}

fn parse_stdout<B: for<'de> Deserialize<'de>>(output: &Output) -> LocateResponse<B> {
    assert!(
        output.status.success(),
        "digit-locator failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Failed to parse report")
}

fn parse_stderr(output: &Output) -> ErrorResponse {
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr
        .lines()
        .rev()
        .find(|l| l.starts_with('{'))
        .expect("No JSON error body on stderr");
    serde_json::from_str(line).expect("Failed to parse error body")
}

#[test]
fn test_locates_column_and_writes_glyphs() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "column.png", &common::glyph_column());
    let glyph_dir = dir.path().join("glyphs");

    let output = run_cli(&[
        input.as_str(),
        "--crop-fraction",
        "0",
        "--coordinates",
        "cropped",
        "--glyph-dir",
        glyph_dir.to_str().unwrap(),
    ]);
    let report: LocateResponse<PixelBox> = parse_stdout(&output);

    assert_eq!(report.count, 3);
    assert_eq!(report.space, "cropped");
    assert_eq!(report.crop_offset, 0);
    assert!(report.boxes.windows(2).all(|w| w[0].y < w[1].y));
    assert_eq!(report.glyph_files.len(), 3);
    for path in &report.glyph_files {
        let glyph = image::open(path).expect("glyph png").to_luma8();
        assert_eq!(glyph.dimensions(), (28, 28));
    }

    let step_names: Vec<&str> = report.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(step_names.first(), Some(&"crop"));
    assert_eq!(step_names.last(), Some(&"glyphs"));
}

#[test]
fn test_normalized_coordinates_include_crop_offset() {
    let dir = tempfile::tempdir().unwrap();
    let mut img = common::blank(560, 280);
    for y in common::COLUMN_YS {
        common::draw_zero(&mut img, 260, y);
    }
    let input = write_fixture(dir.path(), "wide.png", &img);

    let output = run_cli(&[input.as_str(), "--coordinates", "normalized"]);
    let report: LocateResponse<FractionBox> = parse_stdout(&output);

    assert_eq!(report.crop_offset, 140);
    assert_eq!(report.count, 3);
    for b in &report.boxes {
        assert!((b.x - 260.0 / 560.0).abs() < 0.01, "{:?}", b);
    }
}

#[test]
fn test_blank_image_reports_zero_boxes() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "blank.png", &common::blank(200, 200));

    let output = run_cli(&[input.as_str()]);
    let report: LocateResponse<PixelBox> = parse_stdout(&output);

    assert_eq!(report.count, 0);
    assert!(report.boxes.is_empty());
    assert_eq!(report.space, "original");
}

#[test]
fn test_config_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "column.png", &common::glyph_column());
    let config = dir.path().join("config.json");
    std::fs::write(
        &config,
        r#"{ "crop": { "margin_fraction": 0.0 }, "glyph": { "size": 20 } }"#,
    )
    .unwrap();
    let glyph_dir = dir.path().join("glyphs");

    let output = run_cli(&[
        input.as_str(),
        "--config",
        config.to_str().unwrap(),
        "--glyph-dir",
        glyph_dir.to_str().unwrap(),
    ]);
    let report: LocateResponse<PixelBox> = parse_stdout(&output);

    assert_eq!(report.count, 3);
    let glyph = image::open(&report.glyph_files[0]).unwrap();
    assert_eq!((glyph.width(), glyph.height()), (20, 20));
}

#[test]
fn test_invalid_config_is_rejected_before_processing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "column.png", &common::glyph_column());

    let output = run_cli(&[input.as_str(), "--block-size", "40"]);
    let body = parse_stderr(&output);

    assert_eq!(body.code, "INVALID_CONFIG");
    assert!(body.error.contains("block_size"));
}

#[test]
fn test_missing_image_is_reported() {
    let output = run_cli(&["/nonexistent/digits.png"]);
    let body = parse_stderr(&output);

    assert_eq!(body.code, "INTERNAL_ERROR");
    assert!(body.error.contains("Failed to load image"));
}

#[test]
fn test_unknown_coordinate_space_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "blank.png", &common::blank(50, 50));

    let output = run_cli(&[input.as_str(), "--coordinates", "pixels"]);
    let body = parse_stderr(&output);

    assert!(body.error.contains("pixels"));
}
