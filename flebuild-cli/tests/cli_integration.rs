// flebuild-cli/tests/cli_integration.rs
//
// Runs the flebuild binary against a temp workspace with a shell script
// standing in for FLEcli. The script fails for any source named `b.fle`.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::error::Error;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

fn flebuild_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("flebuild").expect("Failed to find flebuild binary");
    cmd.current_dir(dir)
        .env_remove("FLEBUILD_SOURCE_DIR")
        .env_remove("FLEBUILD_OUTPUT_DIR")
        .env_remove("FLEBUILD_CONVERTER")
        .env_remove("FLEBUILD_JOBS");
    cmd
}

/// Temp dir holding `src/`, the fake converter, and (after a build) `out/`.
fn workspace(sources: &[&str]) -> Result<(TempDir, PathBuf), Box<dyn Error>> {
    let dir = tempdir()?;
    let src = dir.path().join("src");
    fs::create_dir_all(&src)?;
    for name in sources {
        fs::write(src.join(name), "mycall N0CALL\n40m cw\n0930 1ABC\n")?;
    }

    let converter = dir.path().join("fake-flecli");
    fs::write(
        &converter,
        r#"#!/bin/sh
[ "$1" = "adif" ] && [ "$2" = "-o" ] || exit 64
case "$3" in
  *b.fle) echo "Error: $3 line 3: invalid time" >&2; exit 3 ;;
esac
cp "$3" "$4"
"#,
    )?;
    fs::set_permissions(&converter, fs::Permissions::from_mode(0o755))?;
    Ok((dir, converter))
}

#[test]
fn test_build_is_silent_on_success() -> Result<(), Box<dyn Error>> {
    let (dir, converter) = workspace(&["fieldday.fle"])?;

    flebuild_cmd(dir.path())
        .arg("--converter")
        .arg(&converter)
        .assert()
        .success()
        .stdout("");

    let target = dir.path().join("out").join("fieldday.adi");
    assert!(target.exists());
    assert_eq!(
        fs::read(&target)?,
        fs::read(dir.path().join("src").join("fieldday.fle"))?
    );
    Ok(())
}

#[test]
fn test_failed_conversion_names_the_logbook() -> Result<(), Box<dyn Error>> {
    let (dir, converter) = workspace(&["a.fle", "b.fle"])?;

    flebuild_cmd(dir.path())
        .arg("build")
        .arg("--converter")
        .arg(&converter)
        .assert()
        .code(1)
        .stderr(contains("b.fle").and(contains("invalid time")));

    assert!(dir.path().join("out").join("a.adi").exists());
    assert!(!dir.path().join("out").join("b.adi").exists());
    Ok(())
}

#[test]
fn test_missing_converter_fails_before_creating_output() -> Result<(), Box<dyn Error>> {
    let (dir, _) = workspace(&["fieldday.fle"])?;

    flebuild_cmd(dir.path())
        .arg("--converter")
        .arg("surely-not-an-installed-flecli")
        .assert()
        .code(2)
        .stderr(contains("surely-not-an-installed-flecli"));

    assert!(!dir.path().join("out").exists());
    Ok(())
}

#[test]
fn test_clean_twice_succeeds() -> Result<(), Box<dyn Error>> {
    let (dir, converter) = workspace(&["fieldday.fle"])?;

    flebuild_cmd(dir.path())
        .arg("--converter")
        .arg(&converter)
        .assert()
        .success();
    assert!(dir.path().join("out").exists());

    flebuild_cmd(dir.path()).arg("clean").assert().success();
    assert!(!dir.path().join("out").exists());
    assert!(dir.path().join("src").join("fieldday.fle").exists());

    flebuild_cmd(dir.path()).arg("clean").assert().success();
    Ok(())
}

#[test]
fn test_clean_refuses_to_remove_sources() -> Result<(), Box<dyn Error>> {
    let (dir, _) = workspace(&["fieldday.fle"])?;

    for output_dir in ["./src", "."] {
        flebuild_cmd(dir.path())
            .args(["clean", "--output-dir", output_dir])
            .assert()
            .code(2)
            .stderr(contains("output_dir"));
        assert!(dir.path().join("src").join("fieldday.fle").exists());
    }
    Ok(())
}

#[test]
fn test_status_reports_pending_work() -> Result<(), Box<dyn Error>> {
    let (dir, converter) = workspace(&["fieldday.fle"])?;

    flebuild_cmd(dir.path())
        .arg("status")
        .assert()
        .code(1)
        .stdout(contains("missing").and(contains("fieldday.fle")));

    flebuild_cmd(dir.path())
        .arg("--converter")
        .arg(&converter)
        .assert()
        .success();

    flebuild_cmd(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("up-to-date"));
    Ok(())
}

#[test]
fn test_dry_run_prints_commands_without_converting() -> Result<(), Box<dyn Error>> {
    let (dir, _) = workspace(&["fieldday.fle"])?;

    flebuild_cmd(dir.path())
        .args(["build", "--dry-run", "--converter", "FLEcli"])
        .assert()
        .success()
        .stdout(contains("FLEcli adif -o").and(contains("fieldday.adi")));

    assert!(!dir.path().join("out").exists());
    Ok(())
}

#[test]
fn test_zero_jobs_is_rejected() -> Result<(), Box<dyn Error>> {
    let (dir, converter) = workspace(&["fieldday.fle"])?;

    flebuild_cmd(dir.path())
        .args(["build", "--jobs", "0"])
        .arg("--converter")
        .arg(&converter)
        .assert()
        .code(2);

    assert!(!dir.path().join("out").exists());
    Ok(())
}

#[test]
fn test_malformed_jobs_env_is_rejected_with_or_without_build() -> Result<(), Box<dyn Error>> {
    let (dir, converter) = workspace(&["fieldday.fle"])?;

    for args in [&[][..], &["build"][..]] {
        flebuild_cmd(dir.path())
            .env("FLEBUILD_JOBS", "lots")
            .args(args)
            .arg("--converter")
            .arg(&converter)
            .assert()
            .code(2)
            .stderr(contains("lots"));
    }

    assert!(!dir.path().join("out").exists());
    Ok(())
}

#[test]
fn test_progress_json_emits_events() -> Result<(), Box<dyn Error>> {
    let (dir, converter) = workspace(&["fieldday.fle"])?;

    flebuild_cmd(dir.path())
        .arg("--progress-json")
        .arg("--converter")
        .arg(&converter)
        .assert()
        .success()
        .stdout(contains("\"type\"").and(contains("fieldday.fle")));
    Ok(())
}

#[test]
fn test_invalid_arguments() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    flebuild_cmd(dir.path())
        .arg("--no-such-flag")
        .assert()
        .failure()
        .stderr(contains("unexpected argument"));
    Ok(())
}
