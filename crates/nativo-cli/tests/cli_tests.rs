//! End-to-end runs of the `nativo` binary.

use serde_json::json;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use nativo_metadata::test_fixtures::{CORE_LIBRARY, hello_program};

fn nativo(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nativo"))
        .args(args)
        .current_dir(cwd)
        .env_remove("NATIVO_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("binary runs")
}

fn write_hello(dir: &Path) {
    let mut types = CORE_LIBRARY.clone();
    types.push(hello_program(0));
    let text = serde_json::to_string(&json!({ "name": "Hello", "types": types })).unwrap();
    fs::write(dir.join("Hello.json"), text).unwrap();
}

#[test]
fn no_arguments_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = nativo(&[], dir.path());
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn two_arguments_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    write_hello(dir.path());
    let out = nativo(&["Hello.json", "Hello.json"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.path().join("Hello.cpp").exists());
}

#[test]
fn missing_file_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = nativo(&["--pretty", "false", "Missing.json"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("error: assembly 'Missing.json'"));
}

#[test]
fn translates_next_to_the_input() {
    let dir = tempfile::tempdir().unwrap();
    write_hello(dir.path());
    let out = nativo(&["Hello.json"], dir.path());
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("[+] processing roughly"));
    assert!(stdout.contains("header characters!"));

    let source = fs::read_to_string(dir.path().join("Hello.cpp")).unwrap();
    assert!(source.starts_with("#include \"Hello.hpp\""));
    assert!(source.ends_with("int main() {\n    return App_Program::Main();\n}\n"));
    assert!(dir.path().join("Hello.hpp").is_file());
}

#[test]
fn quiet_run_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_hello(dir.path());
    let out = nativo(&["-q", "-j", "2", "Hello.json"], dir.path());
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
}

#[test]
fn malformed_metadata_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Bad.json"), "not json").unwrap();
    let out = nativo(&["Bad.json"], dir.path());
    assert_eq!(out.status.code(), Some(2));
    assert!(!dir.path().join("Bad.hpp").exists());
}
