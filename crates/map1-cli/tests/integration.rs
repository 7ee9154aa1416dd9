//! Integration tests for CLI commands.

use std::io::Write;
use std::process::Command;
use tempfile::TempDir;

const WORKED_VECTOR_ID: &str =
    "map1:3fe8cedb14c67bdd9d974819386a7a3f9d5c6edffaf458c41dd0b2441753c21d";

fn write_input(dir: &TempDir, name: &str, contents: &[u8]) -> String {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path.to_string_lossy().to_string()
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--bin", "map1", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    let success = output.status.success();

    (success, stdout, stderr)
}

#[test]
fn test_id_command() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "descriptor.json", br#"{"b":"2","a":"1"}"#);

    let (success, stdout, _) = run_cli(&["id", &path]);
    assert!(success);
    assert_eq!(stdout.trim(), WORKED_VECTOR_ID);
}

#[test]
fn test_id_is_insensitive_to_source_key_order() {
    let dir = TempDir::new().unwrap();
    let sorted = write_input(&dir, "sorted.json", br#"{"a":"1","b":"2"}"#);
    let reversed = write_input(&dir, "reversed.json", br#"{"b":"2","a":"1"}"#);

    let (_, out_sorted, _) = run_cli(&["id", &sorted]);
    let (_, out_reversed, _) = run_cli(&["id", &reversed]);
    assert_eq!(out_sorted, out_reversed);
}

#[test]
fn test_id_json_output() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "descriptor.json", br#"{"a":"1"}"#);

    let (success, stdout, _) = run_cli(&["id", &path, "--json"]);
    assert!(success);
    let record: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(record["projection"], "full");
    assert!(record["identifier"].as_str().unwrap().starts_with("map1:"));
}

#[test]
fn test_id_with_bind_pointer() {
    let dir = TempDir::new().unwrap();
    let full = write_input(&dir, "full.json", br#"{"a":{"x":"1","y":"2"},"b":"keep"}"#);
    let subset = write_input(&dir, "subset.json", br#"{"a":{"x":"1"}}"#);

    let (success, bound, _) = run_cli(&["id", &full, "--bind", "/a/x"]);
    assert!(success);
    let (_, direct, _) = run_cli(&["id", &subset]);
    assert_eq!(bound, direct);
}

#[test]
fn test_id_rejects_duplicate_keys() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "dup.json", br#"{"a":1,"a":2}"#);

    let (success, _, stderr) = run_cli(&["id", &path]);
    assert!(!success);
    assert!(stderr.contains("duplicate-key"));
}

#[test]
fn test_canon_then_verify_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "descriptor.json", br#"{"b":"2","a":"1"}"#);

    let (success, encoded, _) = run_cli(&["canon", &path]);
    assert!(success);

    let canon_path = write_input(&dir, "canonical.b64", encoded.trim().as_bytes());
    let (success, stdout, _) = run_cli(&["verify", &canon_path, "--expect", WORKED_VECTOR_ID]);
    assert!(success);
    assert_eq!(stdout.trim(), WORKED_VECTOR_ID);
}

#[test]
fn test_verify_rejects_wrong_expectation() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "descriptor.json", br#"{"b":"2","a":"1"}"#);
    let (_, encoded, _) = run_cli(&["canon", &path]);

    let canon_path = write_input(&dir, "canonical.b64", encoded.trim().as_bytes());
    let wrong = "map1:0000000000000000000000000000000000000000000000000000000000000000";
    let (success, _, _) = run_cli(&["verify", &canon_path, "--expect", wrong]);
    assert!(!success);
}

#[test]
fn test_verify_rejects_corrupted_bytes() {
    let dir = TempDir::new().unwrap();
    // Valid base64, but not canonical bytes.
    let path = write_input(&dir, "bogus.b64", b"bm90LWEtaGVhZGVy");

    let (success, _, stderr) = run_cli(&["verify", &path]);
    assert!(!success);
    assert!(stderr.contains("malformed-header"));
}
