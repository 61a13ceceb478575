use std::{path::Path, process::Command};

use insta::assert_snapshot;
use tempfile::tempdir;

const BUFFERLIST_PATH: &str = env!("CARGO_BIN_EXE_bufferlist");

const SESSION: &str = "\
/home/me/proj/src/main.rs
/home/me/proj/src/lib.rs\tcurrent
/home/me/proj/README.md
/etc/hosts
";

fn run_show(session: &Path, args: &[&str]) -> String {
    let output = Command::new(BUFFERLIST_PATH)
        .args(["--color", "never", "show"])
        .arg(session)
        .args(args)
        .output()
        .expect("Couldn't start bufferlist");

    assert!(
        output.status.success(),
        "bufferlist failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("bufferlist printed invalid UTF-8")
}

#[test]
fn show_reveals_current_document() {
    let dir = tempdir().unwrap();
    let session = dir.path().join("default.session");
    fs_err::write(&session, SESSION).unwrap();

    assert_snapshot!(run_show(&session, &[]), @r"
    /
      etc
      home/me/proj
        src
          lib.rs [current]
          main.rs
        README.md
    ");
}

#[test]
fn show_expand_all_with_options_file() {
    let dir = tempdir().unwrap();
    let session = dir.path().join("default.session");
    fs_err::write(&session, SESSION).unwrap();
    let options = dir.path().join("bufferlist.toml");
    fs_err::write(&options, "leafLabel = \"fullPath\"\n").unwrap();

    let options = options.to_str().unwrap();
    assert_snapshot!(run_show(&session, &["--expand-all", "--options", options]), @r"
    /
      etc
        /etc/hosts
      home/me/proj
        src
          /home/me/proj/src/lib.rs [current]
          /home/me/proj/src/main.rs
        /home/me/proj/README.md
    ");
}

#[test]
fn show_missing_session_fails() {
    let dir = tempdir().unwrap();

    let output = Command::new(BUFFERLIST_PATH)
        .args(["--color", "never", "show"])
        .arg(dir.path().join("nope.session"))
        .output()
        .expect("Couldn't start bufferlist");

    assert!(!output.status.success());
}

#[test]
fn completions() {
    let output = Command::new(BUFFERLIST_PATH)
        .args(["completions", "bash"])
        .output()
        .expect("Couldn't start bufferlist");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("bufferlist"));
}
