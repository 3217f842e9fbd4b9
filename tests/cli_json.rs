#![allow(missing_docs)]

use std::io::Write;
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::NamedTempFile;

#[test]
fn walk_applies_stock_routines_in_order() {
	let doc = write_doc(&json!({"user": "ada", "password": "x", "meta": {"token": "t", "id": 7}}));

	let json = run_json(&[
		"walk",
		&doc.path().display().to_string(),
		"--delete-key",
		"password",
		"--rename-key",
		"user=login",
		"--redact-key",
		"token",
		"--upper-keys",
	]);

	assert_eq!(json, json!({"LOGIN": "ada", "META": {"TOKEN": "[redacted]", "ID": 7}}));
}

#[test]
fn walk_respects_max_depth() {
	let doc = write_doc(&json!({"a": {"b": {"c": 1}}}));

	let json = run_json(&["walk", &doc.path().display().to_string(), "--max-depth", "0", "--upper-keys", "--compact"]);
	assert_eq!(json, json!({"A": {"b": {"c": 1}}}));
}

#[test]
fn nodes_json_lists_visited_positions() {
	let doc = write_doc(&json!({"list": [1, "two"], "flag": false}));

	let json = run_json(&["nodes", &doc.path().display().to_string(), "--json"]);
	assert_eq!(json["count"], 4);
	let nodes = json["nodes"].as_array().expect("nodes array");
	assert!(nodes.iter().any(|node| node["kind"] == "seq_element" && node["type"] == "i64" && node["depth"] == 1));
	assert!(nodes.iter().any(|node| node["kind"] == "map_entry" && node["key"] == "list" && node["value"].is_null()));
	assert!(nodes.iter().any(|node| node["kind"] == "map_entry" && node["key"] == "flag" && node["value"] == "false"));
}

#[test]
fn bad_rename_spec_fails() {
	let doc = write_doc(&json!({"a": 1}));

	let output = run(&["walk", &doc.path().display().to_string(), "--rename-key", "missing-separator"]);
	assert!(!output.status.success(), "command should fail");
	assert!(String::from_utf8_lossy(&output.stderr).contains("invalid rename spec"));
}

fn write_doc(value: &Value) -> NamedTempFile {
	let mut file = NamedTempFile::new().expect("temp file");
	write!(file, "{value}").expect("write document");
	file
}

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_treewalk")).args(args).output().expect("command executes")
}

fn run_json(args: &[&str]) -> Value {
	let output = run(args);
	assert!(
		output.status.success(),
		"command should succeed: {}",
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}
