//! Error handling integration tests for the beastcp CLI.
//!
//! These tests verify proper error handling behaviors:
//! - An existing destination is refused without `--force`
//! - A missing source is reported before anything is written
//! - Every failed file of a directory copy is listed

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestFixture;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_existing_destination_refused_without_force() {
    let fx = TestFixture::new();
    let src = fx.src.path().join("a.txt");
    let dst = fx.dst.path().join("a.txt");
    fs::write(&src, "new").unwrap();
    fs::write(&dst, "old").unwrap();

    cargo_bin_cmd!("beastcp")
        .arg("-q")
        .arg(&src)
        .arg(&dst)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[destination_exists]"))
        .stderr(predicate::str::contains("--force"));

    fx.assert_file_content(&dst, b"old");
}

#[test]
fn test_existing_destination_dir_refused_without_force() {
    let fx = TestFixture::new();
    fx.create_files(3, 10);

    // The destination tempdir itself already exists
    cargo_bin_cmd!("beastcp")
        .arg("-q")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[destination_exists]"));

    assert!(fs::read_dir(fx.dst.path()).unwrap().next().is_none());
}

#[test]
fn test_source_not_found() {
    let fx = TestFixture::new();

    cargo_bin_cmd!("beastcp")
        .arg(fx.src.path().join("nope"))
        .arg(fx.target())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[source_not_found]"));

    assert!(!fx.target().exists());
}

#[test]
fn test_missing_destination_argument_is_usage_error() {
    let fx = TestFixture::new();

    cargo_bin_cmd!("beastcp")
        .arg(fx.src.path())
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_file_onto_directory_fails() {
    let fx = TestFixture::new();
    let src = fx.src.path().join("a.txt");
    fs::write(&src, "content").unwrap();
    let dst = fx.dst.path().join("occupied");
    fs::create_dir(&dst).unwrap();
    fs::write(dst.join("inside.txt"), "keep me").unwrap();

    cargo_bin_cmd!("beastcp")
        .args(["-q", "-f"])
        .arg(&src)
        .arg(&dst)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[invalid_input]"))
        .stderr(predicate::str::contains("is a directory"));

    fx.assert_file_content(&dst.join("inside.txt"), b"keep me");
}

/// Siblings still complete when some files fail, and every failure is listed.
#[test]
fn test_directory_copy_lists_every_failure() {
    let fx = TestFixture::new();
    fx.create_files(6, 1000);

    // Occupy two destination paths with directories
    let target = fx.target();
    fs::create_dir_all(target.join("file01.bin")).unwrap();
    fs::create_dir_all(target.join("file04.bin")).unwrap();

    cargo_bin_cmd!("beastcp")
        .args(["-q", "-f", "-t", "3"])
        .arg(fx.src.path())
        .arg(&target)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[partial_copy]"))
        .stderr(predicate::str::contains("Failed to copy 2 of 6 files"))
        .stderr(predicate::str::contains("failed:").count(2))
        .stderr(predicate::str::contains("file01.bin"))
        .stderr(predicate::str::contains("file04.bin"));

    for i in [0, 2, 3, 5] {
        let name = format!("file{:02}.bin", i);
        assert_eq!(
            fs::read(target.join(&name)).unwrap(),
            fs::read(fx.src.path().join(&name)).unwrap()
        );
    }
}

#[cfg(unix)]
#[test]
fn test_unreadable_source_file_reports_permission_denied() {
    use std::os::unix::fs::PermissionsExt;

    let fx = TestFixture::new();
    let src = fx.src.path().join("secret.txt");
    fs::write(&src, "secret").unwrap();
    fs::set_permissions(&src, fs::Permissions::from_mode(0o000)).unwrap();

    // Root bypasses permission checks
    if fs::read(&src).is_ok() {
        return;
    }

    cargo_bin_cmd!("beastcp")
        .arg("-q")
        .arg(&src)
        .arg(fx.dst.path().join("secret.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[permission_denied]"));
}
