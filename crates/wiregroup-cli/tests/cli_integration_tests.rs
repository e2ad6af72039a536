//! CLI integration tests
//!
//! Drive the `wiregroup` binary over a corpus written to a temp directory.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

fn status_doc(ping_id: &str, time_type: &str) -> Value {
    json!({
        "types": {"i64": "native", "varint": "native"},
        "status": {"toServer": {"types": {
            "packet_ping_start": ["container", []],
            "packet_ping": ["container", [{"name": "time", "type": time_type}]],
            "packet": ["container", [
                {"name": "name", "type": ["mapper", {"type": "varint", "mappings": {
                    "0x00": "ping_start", ping_id: "ping"
                }}]},
                {"name": "params", "type": ["switch", {"compareTo": "name", "fields": {
                    "ping_start": "packet_ping_start",
                    "ping": "packet_ping"
                }}]}
            ]]
        }}}
    })
}

fn write_version(root: &Path, name: &str, version: u32, protocol: Value) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("version.json"),
        json!({"version": version, "minecraftVersion": name}).to_string(),
    )
    .unwrap();
    fs::write(dir.join("protocol.json"), protocol.to_string()).unwrap();
}

/// Workspace with a three-version corpus and a slot configuration
fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("pc");
    write_version(&data, "1.7.2", 4, status_doc("0x01", "i64"));
    write_version(&data, "1.8", 47, status_doc("0x01", "varint"));
    write_version(&data, "1.9", 107, status_doc("0x02", "varint"));
    fs::write(
        dir.path().join("slots.toml"),
        "min_version = 4\n\n[packets.c2s]\nstatus = [\"ping\"]\n",
    )
    .unwrap();
    dir
}

fn wiregroup(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wiregroup"))
        .current_dir(dir.path())
        .args(args)
        .args(["--data-dir", "pc", "--slots", "slots.toml"])
        .env_remove("WIREGROUP_GENERATOR_KEY")
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_cli_run_writes_manifest() {
    // Given: a corpus where ping changes its field type in 1.8 and its id in 1.9
    let dir = workspace();

    // When: `wiregroup run` without a generator
    let output = wiregroup(&dir, &["run"]);

    // Then: the run succeeds and reports gaps
    assert!(
        output.status.success(),
        "Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0 generated, 0 existing, 2 gaps"), "{}", stdout);

    // And: the manifest groups 47 and 107 under one representative with two ids
    let text = fs::read_to_string(dir.path().join("packets.toml")).unwrap();
    let manifest: toml::Table = toml::from_str(&text).unwrap();
    let ints = |v: &toml::Value| -> Vec<i64> {
        v.as_array()
            .unwrap()
            .iter()
            .filter_map(toml::Value::as_integer)
            .collect()
    };
    let ping = &manifest["c2s"]["status"]["ping"];
    assert_eq!(ints(&manifest["versions"]), vec![4, 47, 107]);
    assert_eq!(ints(&ping["4"]["1"]), vec![4]);
    assert_eq!(ints(&ping["47"]["1"]), vec![47]);
    assert_eq!(ints(&ping["47"]["2"]), vec![107]);
}

#[cfg(unix)]
#[test]
fn test_cli_run_with_generator_writes_artifacts() {
    let dir = workspace();

    let output = wiregroup(
        &dir,
        &[
            "run",
            "--generator",
            "sh",
            "--generator-arg=-c",
            "--generator-arg=cat > /dev/null; echo '// generated'",
        ],
    );

    assert!(
        output.status.success(),
        "Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(dir.path().join("generated/c2s/status/ping/v4.rs").is_file());
    assert!(dir.path().join("generated/c2s/status/ping/v47.rs").is_file());
    assert!(!dir.path().join("generated/c2s/status/ping/v107.rs").exists());
}

#[test]
fn test_cli_check_detects_stale_manifest() {
    let dir = workspace();
    assert!(wiregroup(&dir, &["run"]).status.success());

    // Fresh manifest passes
    let output = wiregroup(&dir, &["check"]);
    assert!(
        output.status.success(),
        "Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // A hand edit is detected
    let path = dir.path().join("packets.toml");
    let mut text = fs::read_to_string(&path).unwrap();
    text.push_str("\n[c2s.status.ping.999]\n");
    fs::write(&path, text).unwrap();

    let output = wiregroup(&dir, &["check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_MANIFEST_STALE"));
}

#[test]
fn test_cli_untracked_json() {
    let dir = workspace();

    let output = wiregroup(&dir, &["untracked", "--json"]);

    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report.as_array().unwrap().len(), 1);
    assert_eq!(report[0]["packet"], "ping_start");
    assert_eq!(report[0]["first_version"], 4);
    assert_eq!(report[0]["direction"], "c2s");
}

#[test]
fn test_cli_invalid_config_fails() {
    let dir = workspace();
    fs::write(dir.path().join("slots.toml"), "min_version = 4\ntypes = [\"a.b\"]\n").unwrap();

    let output = wiregroup(&dir, &["run"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_INVALID_CONFIG"));
    assert!(!dir.path().join("packets.toml").exists());
}
