use std::process::Command;

use pretty_assertions::assert_eq;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_qa-results-template"))
}

#[test]
fn failure_prints_one_error_line() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("missing/dir/out.xlsx");
    let out = cli().arg("--output").arg(&target).output().unwrap();

    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1, "{stdout}");
    assert!(stdout.starts_with("Error: "), "{stdout}");
    assert_eq!(String::from_utf8(out.stderr).unwrap(), "");
}

#[test]
fn success_prints_the_summary() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.xlsx");
    let out = cli().arg("--output").arg(&target).output().unwrap();

    assert!(out.status.success());
    assert!(target.exists());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Total de hojas: 3"), "{stdout}");
    assert!(stdout.contains("Smoke Tests configurados: 5"), "{stdout}");
}
