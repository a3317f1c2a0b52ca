mod common;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("rwa-dash").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("rwa-dash"));
}

#[test]
fn render_writes_every_chart() {
    let data = tempdir().unwrap();
    common::write_all(data.path());
    let out = data.path().join("out");

    let mut cmd = Command::cargo_bin("rwa-dash").unwrap();
    cmd.arg("render")
        .arg("--data-dir")
        .arg(data.path())
        .arg("--out-dir")
        .arg(&out);
    cmd.assert().success().stderr(predicate::str::contains("Wrote macro"));

    for stem in ["gauge", "macro", "asset_shares", "chains", "protocols", "yield"] {
        assert!(out.join(format!("{stem}.svg")).is_file(), "missing {stem}.svg");
    }
}

#[test]
fn render_with_interaction_flags() {
    let data = tempdir().unwrap();
    common::write_all(data.path());
    let out = data.path().join("out");

    let mut cmd = Command::cargo_bin("rwa-dash").unwrap();
    cmd.args(["render", "--chart", "asset-shares", "--zoom", "2", "--pan-days", "-5"])
        .args(["--focus", "Treasury", "--hover", "2024-02-29"])
        .arg("--data-dir")
        .arg(data.path())
        .arg("--out-dir")
        .arg(&out);
    cmd.assert().success();

    let svg = std::fs::read_to_string(out.join("asset_shares.svg")).unwrap();
    assert!(svg.contains("Total RWA TVL"));
}

#[test]
fn focus_leaves_toggle_legends_alone() {
    let data = tempdir().unwrap();
    common::write_all(data.path());
    let out = data.path().join("out");

    let mut cmd = Command::cargo_bin("rwa-dash").unwrap();
    cmd.args(["render", "--chart", "macro", "--focus", "stable", "--hover", "2024-02-29"])
        .arg("--data-dir")
        .arg(data.path())
        .arg("--out-dir")
        .arg(&out);
    cmd.assert().success();

    let svg = std::fs::read_to_string(out.join("macro.svg")).unwrap();
    assert!(svg.contains("Stablecoins: $140B"));
    assert!(svg.contains("RWA TVL: $9.00B"));
}

#[test]
fn render_reports_missing_sources() {
    let data = tempdir().unwrap();
    let out = data.path().join("out");

    let mut cmd = Command::cargo_bin("rwa-dash").unwrap();
    cmd.args(["render", "--chart", "macro,gauge"])
        .arg("--data-dir")
        .arg(data.path())
        .arg("--out-dir")
        .arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Skipped macro"))
        .stderr(predicate::str::contains("1 chart(s) could not be loaded"));
    // the gauge still renders its error caption
    assert!(out.join("gauge.svg").is_file());
}

#[test]
fn unknown_chart_is_rejected() {
    let data = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("rwa-dash").unwrap();
    cmd.args(["render", "--chart", "pie"]).arg("--data-dir").arg(data.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown chart: pie"));
}

#[test]
fn gauge_prints_reading_and_caption() {
    let data = tempdir().unwrap();
    common::write_all(data.path());

    let mut cmd = Command::cargo_bin("rwa-dash").unwrap();
    cmd.arg("gauge").arg("--data-dir").arg(data.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("latest=4  min=-2  max=4"))
        .stdout(predicate::str::contains("band=Expansion"))
        .stdout(predicate::str::contains("As of 2024-03-31"));
}

#[test]
fn stats_lists_series() {
    let data = tempdir().unwrap();
    common::write_all(data.path());

    let mut cmd = Command::cargo_bin("rwa-dash").unwrap();
    cmd.args(["stats", "--chart", "macro"]).arg("--data-dir").arg(data.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("macro • rwa_tvl  count=4 missing=0"))
        .stdout(predicate::str::contains("last=12000000000"));
}
