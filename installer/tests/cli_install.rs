//! CLI tests for the `nodecg-io` binary.
//!
//! Spawns the binary and checks exit codes and user-facing output.

use std::process::Command;

use installer::exit_codes;
use installer::test_support::HostFixture;

fn nodecg_io() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_nodecg-io"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn outside_a_host_exits_with_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = nodecg_io()
        .current_dir(temp.path())
        .args(["install", "--version", "0.2"])
        .output()
        .expect("run nodecg-io install");

    assert_eq!(output.status.code(), Some(exit_codes::NOT_FOUND));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("couldn't find a nodecg installation"), "{stderr}");
}

#[test]
fn uninstall_without_install_is_ok() {
    let host = HostFixture::new();

    let output = nodecg_io()
        .current_dir(host.cwd())
        .arg("uninstall")
        .output()
        .expect("run nodecg-io uninstall");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Nothing to uninstall"));
}

#[test]
fn install_without_a_version_fails_on_fresh_host() {
    let host = HostFixture::new();
    let before = host.snapshot();

    let status = nodecg_io()
        .current_dir(host.cwd())
        .arg("install")
        .status()
        .expect("run nodecg-io install");

    assert_eq!(status.code(), Some(exit_codes::FAILED));
    assert_eq!(host.snapshot(), before);
}

#[test]
fn uninstall_failure_names_the_uninstall() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = nodecg_io()
        .current_dir(temp.path())
        .arg("uninstall")
        .output()
        .expect("run nodecg-io uninstall");

    assert_eq!(output.status.code(), Some(exit_codes::NOT_FOUND));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error while uninstalling nodecg-io:"), "{stderr}");
}
