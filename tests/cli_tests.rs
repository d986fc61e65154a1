// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI integration tests.
//!
//! These tests run the actual robomsg binary and verify its behavior.

use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

/// Get the path to the built robomsg binary
fn robomsg_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    // The test binary is in target/debug/deps/
    // The robomsg binary is in target/debug/
    path.pop(); // deps
    path.pop(); // debug or release
    path.push("robomsg");
    path
}

/// Get the path to a test fixture file
fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Scratch file unique to this test process
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("robomsg-cli-{}-{name}", std::process::id()))
}

/// Run robomsg with arguments
fn run(args: &[&str]) -> Output {
    let bin = robomsg_bin();
    Command::new(&bin)
        .args(args)
        .output()
        .unwrap_or_else(|_| panic!("Failed to run {:?}", bin))
}

/// Run robomsg and assert success
fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "Command failed: {:?}\nstdout: {}\nstderr: {}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run robomsg and assert failure
fn run_err(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        !output.status.success(),
        "Command should have failed but succeeded: {:?}",
        args
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn status_msg() -> String {
    fixture_path("Status.msg").to_string_lossy().into_owned()
}

fn status_json() -> String {
    fixture_path("status.json").to_string_lossy().into_owned()
}

/// Encode the status fixture into a temp file and return its path
fn encode_status(name: &str) -> PathBuf {
    let out = temp_path(name);
    run_ok(&[
        "encode",
        &status_msg(),
        &status_json(),
        "-o",
        out.to_str().unwrap(),
    ]);
    out
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let output = run_ok(&["--help"]);
    assert!(output.contains("ROS1 message codec toolkit"));
    assert!(output.contains("schema"));
    assert!(output.contains("encode"));
    assert!(output.contains("decode"));
    assert!(output.contains("size"));
}

#[test]
fn test_cli_version() {
    let output = run_ok(&["--version"]);
    assert!(output.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_command_fails() {
    run_err(&["frobnicate"]);
}

// ============================================================================
// Schema Commands
// ============================================================================

#[test]
fn test_schema_show() {
    let output = run_ok(&["schema", "show", &status_msg()]);
    assert!(output.contains("MSG: std_msgs/Header"));
    assert!(output.contains("float32[] readings"));
    assert!(output.contains("uint8 ERROR=2"));
}

#[test]
fn test_schema_show_json() {
    let output = run_ok(&["schema", "show", &status_msg(), "--json"]);
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    let types = json.as_array().unwrap();
    assert_eq!(types.len(), 2);
    assert_eq!(types[1]["name"], "std_msgs/Header");
}

#[test]
fn test_schema_plan() {
    let output = run_ok(&["schema", "plan", &status_msg(), "--type", "diag/Status"]);
    assert!(output.contains("Codec for 'diag/Status' (2 types)"));
    assert!(output.contains("Layout for 'std_msgs/Header' (variable)"));
    assert!(output.contains("readings"));
}

#[test]
fn test_schema_invalid_definition() {
    let path = temp_path("bad.msg");
    fs::write(&path, "pkg/Missing thing\n").unwrap();
    let stderr = run_err(&["schema", "plan", path.to_str().unwrap()]);
    assert!(stderr.contains("Error:"));
    let _ = fs::remove_file(path);
}

// ============================================================================
// Encode / Decode / Size
// ============================================================================

#[test]
fn test_encode_hex() {
    let output = run_ok(&["encode", &status_msg(), &status_json(), "--hex"]);
    // seq = 3
    assert!(output.trim().starts_with("03000000"));
    // 4 + 8 + (4 + 4) + 1 + (4 + 3) + (4 + 8)
    assert_eq!(output.trim().len(), 40 * 2);
}

#[test]
fn test_encode_then_size() {
    let bin = encode_status("size.bin");
    let output = run_ok(&["size", &status_msg(), bin.to_str().unwrap()]);
    assert_eq!(output.trim(), "40");
    let _ = fs::remove_file(bin);
}

#[test]
fn test_decode_whole_message() {
    let bin = encode_status("decode.bin");
    let output = run_ok(&["decode", &status_msg(), bin.to_str().unwrap()]);
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["header"]["frame_id"], "base");
    assert_eq!(json["header"]["stamp"]["sec"], 10);
    assert_eq!(json["level"], 2);
    assert_eq!(json["readings"][1], 2.5);
    let _ = fs::remove_file(bin);
}

#[test]
fn test_decode_single_field() {
    let bin = encode_status("field.bin");
    let output = run_ok(&[
        "decode",
        &status_msg(),
        bin.to_str().unwrap(),
        "--field",
        "message",
    ]);
    assert_eq!(output.trim(), "\"hot\"");
    let _ = fs::remove_file(bin);
}

#[test]
fn test_decode_with_offset() {
    let bin = encode_status("offset.bin");
    let mut padded = vec![0xffu8; 7];
    padded.extend(fs::read(&bin).unwrap());
    padded.extend([0xee; 3]);
    let shifted = temp_path("offset-padded.bin");
    fs::write(&shifted, &padded).unwrap();

    let output = run_ok(&[
        "decode",
        &status_msg(),
        shifted.to_str().unwrap(),
        "--offset",
        "7",
        "--length",
        "40",
        "--field",
        "level",
    ]);
    assert_eq!(output.trim(), "2");

    let _ = fs::remove_file(bin);
    let _ = fs::remove_file(shifted);
}

#[test]
fn test_decode_hex_input() {
    let hex_out = temp_path("status.hex");
    run_ok(&[
        "encode",
        &status_msg(),
        &status_json(),
        "--hex",
        "-o",
        hex_out.to_str().unwrap(),
    ]);
    let output = run_ok(&[
        "decode",
        &status_msg(),
        hex_out.to_str().unwrap(),
        "--hex",
        "--field",
        "readings",
    ]);
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json, serde_json::json!([1.5, 2.5]));
    let _ = fs::remove_file(hex_out);
}

#[test]
fn test_decode_unknown_field_fails() {
    let bin = encode_status("unknown.bin");
    let stderr = run_err(&[
        "decode",
        &status_msg(),
        bin.to_str().unwrap(),
        "--field",
        "nope",
    ]);
    assert!(stderr.contains("nope"));
    let _ = fs::remove_file(bin);
}

#[test]
fn test_encode_type_mismatch_fails() {
    let path = temp_path("mismatch.json");
    fs::write(&path, r#"{"header": {"seq": 1, "stamp": {"sec": 0, "nsec": 0}, "frame_id": ""}, "level": "high", "message": "", "readings": []}"#).unwrap();
    let stderr = run_err(&["encode", &status_msg(), path.to_str().unwrap()]);
    assert!(stderr.contains("Error:"));
    let _ = fs::remove_file(path);
}

#[test]
fn test_size_of_truncated_input_fails() {
    let bin = encode_status("truncated.bin");
    let bytes = fs::read(&bin).unwrap();
    fs::write(&bin, &bytes[..bytes.len() - 1]).unwrap();
    run_err(&["size", &status_msg(), bin.to_str().unwrap()]);
    let _ = fs::remove_file(bin);
}
