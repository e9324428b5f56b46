#![allow(dead_code)]

use assert_cmd::cargo_bin;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;

/// A fixed user id so request files can reference the user they create.
pub const USER_ID: &str = "1f0f8a9e-5b7d-4c9a-9a55-0d6e4a2b9c3f";

pub fn create_user(name: &str) -> Value {
    serde_json::json!({
        "op": "create_user",
        "id": USER_ID,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
    })
}

pub fn requests_file(requests: &[Value]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for request in requests {
        writeln!(file, "{request}").unwrap();
    }
    file
}

/// Runs the binary over a request file and parses one response per line.
pub fn run(file: &NamedTempFile) -> Vec<Value> {
    run_args(file.path(), &[])
}

pub fn run_args(input: &Path, extra_args: &[&str]) -> Vec<Value> {
    let mut cmd = Command::new(cargo_bin!("paylane"));
    cmd.arg(input);
    for arg in extra_args {
        cmd.arg(arg);
    }
    let output = cmd.output().expect("failed to execute command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout)
        .expect("stdout is not UTF-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("response line is not JSON"))
        .collect()
}
