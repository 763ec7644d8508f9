//! Resumable copy integration tests for the beastcp CLI.
//!
//! An interrupted run leaves some destination files complete and some cut
//! short. Re-running with `--force` must finish the cut-short ones from
//! their current length and leave the complete ones untouched.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, patterned, snapshot};
use predicates::prelude::*;
use std::fs;

/// Simulate an interrupted run: some files complete, some truncated, some missing.
#[test]
fn test_resume_interrupted_directory_copy() {
    let fx = TestFixture::new();
    fx.create_files(10, 64 * 1024);

    let target = fx.target();
    fs::create_dir_all(&target).unwrap();
    for i in 0..4 {
        let name = format!("file{:02}.bin", i);
        fs::copy(fx.src.path().join(&name), target.join(&name)).unwrap();
    }
    for i in 4..7 {
        let name = format!("file{:02}.bin", i);
        let full = fs::read(fx.src.path().join(&name)).unwrap();
        fs::write(target.join(&name), &full[..1000 * i]).unwrap();
    }

    cargo_bin_cmd!("beastcp")
        .args(["-q", "-f"])
        .arg(fx.src.path())
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Done: 10 files processed (6 copied, 4 skipped",
        ));

    assert_eq!(snapshot(fx.src.path()), snapshot(&target));
}

#[test]
fn test_resume_single_file_appends_remainder() {
    let fx = TestFixture::new();
    let src = fx.src.path().join("big.bin");
    let dst = fx.dst.path().join("big.bin");
    let data = patterned(100_000, 9);
    fs::write(&src, &data).unwrap();
    fs::write(&dst, &data[..10_000]).unwrap();

    cargo_bin_cmd!("beastcp")
        .args(["-q", "-f"])
        .arg(&src)
        .arg(&dst)
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 copied, 0 skipped"));

    fx.assert_file_content(&dst, &data);
}

#[test]
fn test_second_run_skips_everything() {
    let fx = TestFixture::new();
    fx.create_nested_structure(2, 3);

    cargo_bin_cmd!("beastcp")
        .arg("-q")
        .arg(fx.src.path())
        .arg(fx.target())
        .assert()
        .success();

    let before = snapshot(&fx.target());

    cargo_bin_cmd!("beastcp")
        .args(["-q", "-f"])
        .arg(fx.src.path())
        .arg(fx.target())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Done: 6 files processed (0 copied, 6 skipped, 0 B)",
        ));

    assert_eq!(before, snapshot(&fx.target()));
}

/// A same-size destination is accepted on size alone, even when its bytes differ.
#[test]
fn test_complete_size_skips_without_reading() {
    let fx = TestFixture::new();
    let src = fx.src.path().join("a.txt");
    let dst = fx.dst.path().join("a.txt");
    fs::write(&src, "aaaa").unwrap();
    fs::write(&dst, "bbbb").unwrap();

    cargo_bin_cmd!("beastcp")
        .args(["-q", "-f"])
        .arg(&src)
        .arg(&dst)
        .assert()
        .success()
        .stdout(predicate::str::contains("(0 copied, 1 skipped"));

    fx.assert_file_content(&dst, b"bbbb");
}

#[test]
fn test_verify_existing_catches_bad_complete_file() {
    let fx = TestFixture::new();
    let src = fx.src.path().join("a.txt");
    let dst = fx.dst.path().join("a.txt");
    fs::write(&src, "aaaa").unwrap();
    fs::write(&dst, "bbbb").unwrap();

    cargo_bin_cmd!("beastcp")
        .args(["-q", "-f", "--verify-existing"])
        .arg(&src)
        .arg(&dst)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[hash_mismatch]"));
}

#[test]
fn test_no_resume_rewrites_from_scratch() {
    let fx = TestFixture::new();
    let src = fx.src.path().join("a.txt");
    let dst = fx.dst.path().join("a.txt");
    fs::write(&src, "fresh").unwrap();
    fs::write(&dst, "stale and longer").unwrap();

    cargo_bin_cmd!("beastcp")
        .args(["-q", "-f", "--no-resume"])
        .arg(&src)
        .arg(&dst)
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 copied, 0 skipped, 5 B)"));

    fx.assert_file_content(&dst, b"fresh");
}

/// A bad prefix is appended to, then caught by verification; the file is kept.
#[test]
fn test_resume_onto_bad_prefix_fails_verification() {
    let fx = TestFixture::new();
    let src = fx.src.path().join("data.bin");
    let dst = fx.dst.path().join("data.bin");
    let data = patterned(50_000, 1);
    fs::write(&src, &data).unwrap();
    let mut prefix = data[..20_000].to_vec();
    prefix[100] ^= 0xff;
    fs::write(&dst, &prefix).unwrap();

    cargo_bin_cmd!("beastcp")
        .args(["-q", "-f"])
        .arg(&src)
        .arg(&dst)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[hash_mismatch]"))
        .stderr(predicate::str::contains("data.bin"));

    assert_eq!(fs::metadata(&dst).unwrap().len(), 50_000);
}
