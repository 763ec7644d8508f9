//! Machine-readable output tests for the beastcp CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestFixture;
use serde_json::Value;
use std::fs;

fn parse_stdout(output: &[u8]) -> Value {
    let stdout = String::from_utf8(output.to_vec()).unwrap();
    serde_json::from_str(stdout.trim()).unwrap()
}

#[test]
fn test_json_single_file() {
    let fx = TestFixture::new();
    let src = fx.src.path().join("a.txt");
    fs::write(&src, "hello").unwrap();

    let output = cargo_bin_cmd!("beastcp")
        .args(["--output", "json"])
        .arg(&src)
        .arg(fx.dst.path().join("a.txt"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let value = parse_stdout(&output.stdout);
    assert_eq!(value["schema_version"], "1.0");
    assert_eq!(value["effective_config"]["threads"], 4);
    assert_eq!(value["effective_config"]["verify"], true);
    assert_eq!(value["summary"]["files_copied"], 1);
    assert_eq!(value["items"][0]["outcome"], "copied");
    assert_eq!(value["items"][0]["bytes_copied"], 5);
    assert_eq!(value["items"][0]["verified"], true);
}

#[test]
fn test_json_directory_items_in_order() {
    let fx = TestFixture::new();
    fx.create_files(3, 100);
    let target = fx.target();
    fs::create_dir_all(&target).unwrap();
    fs::copy(
        fx.src.path().join("file01.bin"),
        target.join("file01.bin"),
    )
    .unwrap();

    let output = cargo_bin_cmd!("beastcp")
        .args(["--output", "json", "-f"])
        .arg(fx.src.path())
        .arg(&target)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value = parse_stdout(&output.stdout);
    let items = value["items"].as_array().unwrap();
    let outcomes: Vec<&str> = items.iter().map(|i| i["outcome"].as_str().unwrap()).collect();
    assert_eq!(outcomes, vec!["copied", "skipped", "copied"]);
    assert!(items[1]["source"].as_str().unwrap().ends_with("file01.bin"));
    assert_eq!(value["summary"]["files_processed"], 3);
    assert_eq!(value["summary"]["files_skipped"], 1);
}

#[test]
fn test_json_reports_failures_and_exits_nonzero() {
    let fx = TestFixture::new();
    fx.create_files(2, 100);
    let target = fx.target();
    fs::create_dir_all(target.join("file00.bin")).unwrap();

    let output = cargo_bin_cmd!("beastcp")
        .args(["--output", "json", "-f"])
        .arg(fx.src.path())
        .arg(&target)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value = parse_stdout(&output.stdout);
    assert_eq!(value["summary"]["files_failed"], 1);
    assert_eq!(value["items"][0]["outcome"], "failed");
    assert_eq!(value["items"][0]["error_code"], "invalid_input");
    assert_eq!(value["items"][1]["outcome"], "copied");
}
